//! Commands accepted by the writer thread.

use census_core::types::FileRecord;

/// A command sent to the batch writer.
#[derive(Debug)]
pub enum BatchCommand {
    /// Records to append, in enumeration order.
    InsertRecords(Vec<FileRecord>),
    /// Flush the buffer and stop the thread.
    Shutdown,
}
