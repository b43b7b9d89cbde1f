//! Dedicated writer thread owning the index write connection.
//!
//! Records are buffered until `batch_size` is reached, the channel stays
//! quiet for `BATCH_RECV_TIMEOUT_MS`, or the writer is shut down. Each flush
//! is one transaction. Records are stored in the order they were sent.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use census_core::constants::{BATCH_CHANNEL_CAPACITY, BATCH_RECV_TIMEOUT_MS};
use census_core::errors::StorageError;
use census_core::types::FileRecord;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use super::commands::BatchCommand;
use crate::store::IndexStore;

/// Counters reported when the writer finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub records_written: u64,
    pub batches_committed: u64,
}

type WriterResult = Result<(IndexStore, WriteStats), StorageError>;

/// Handle to the writer thread.
pub struct BatchWriter {
    tx: Option<Sender<BatchCommand>>,
    handle: Option<JoinHandle<WriterResult>>,
}

impl BatchWriter {
    /// Move `store` onto a new writer thread.
    pub fn spawn(store: IndexStore, batch_size: usize) -> Self {
        let (tx, rx) = bounded(BATCH_CHANNEL_CAPACITY);
        let batch_size = batch_size.max(1);
        let handle = thread::Builder::new()
            .name("census-writer".to_string())
            .spawn(move || writer_loop(store, rx, batch_size));

        match handle {
            Ok(handle) => Self {
                tx: Some(tx),
                handle: Some(handle),
            },
            Err(e) => {
                // No thread: every send reports the writer as gone.
                tracing::error!(error = %e, "failed to spawn batch writer thread");
                Self {
                    tx: None,
                    handle: None,
                }
            }
        }
    }

    /// Queue records for insertion. Blocks while the channel is full.
    pub fn send(&self, records: Vec<FileRecord>) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        let tx = self.tx.as_ref().ok_or(StorageError::WriterDisconnected)?;
        tx.send(BatchCommand::InsertRecords(records))
            .map_err(|_| StorageError::WriterDisconnected)
    }

    /// Flush pending records, stop the thread and hand the store back.
    ///
    /// If the thread stopped early, this returns the error that stopped it.
    pub fn finish(mut self) -> WriterResult {
        if let Some(tx) = self.tx.take() {
            // Fails only if the thread already exited; join reports why.
            let _ = tx.send(BatchCommand::Shutdown);
        }
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or(Err(StorageError::WriterDisconnected)),
            None => Err(StorageError::WriterDisconnected),
        }
    }
}

impl Drop for BatchWriter {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(BatchCommand::Shutdown);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn writer_loop(
    mut store: IndexStore,
    rx: Receiver<BatchCommand>,
    batch_size: usize,
) -> WriterResult {
    let mut buffer: Vec<FileRecord> = Vec::with_capacity(batch_size);
    let mut stats = WriteStats::default();
    let timeout = Duration::from_millis(BATCH_RECV_TIMEOUT_MS);

    loop {
        match rx.recv_timeout(timeout) {
            Ok(BatchCommand::InsertRecords(records)) => {
                buffer.extend(records);
                if buffer.len() >= batch_size {
                    flush(&mut store, &mut buffer, &mut stats)?;
                }
            }
            Ok(BatchCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                flush(&mut store, &mut buffer, &mut stats)?;
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                flush(&mut store, &mut buffer, &mut stats)?;
            }
        }
    }

    tracing::debug!(
        records = stats.records_written,
        batches = stats.batches_committed,
        "batch writer finished"
    );
    Ok((store, stats))
}

fn flush(
    store: &mut IndexStore,
    buffer: &mut Vec<FileRecord>,
    stats: &mut WriteStats,
) -> Result<(), StorageError> {
    if buffer.is_empty() {
        return Ok(());
    }
    store.append_records(buffer)?;
    stats.records_written += buffer.len() as u64;
    stats.batches_committed += 1;
    tracing::debug!(records = buffer.len(), "committed batch");
    buffer.clear();
    Ok(())
}
