//! CensusEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing an indexing run.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. The trait requires `Send + Sync`
/// because progress is reported from the pipeline while hashing runs on a
/// worker pool.
pub trait CensusEventHandler: Send + Sync {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_files_discovered(&self, _event: &FilesDiscoveredEvent) {}
    fn on_scan_progress(&self, _event: &ScanProgressEvent) {}
    fn on_file_skipped(&self, _event: &FileSkippedEvent) {}
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {}
    fn on_scan_error(&self, _event: &ScanErrorEvent) {}
}

/// Handler that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHandler;

impl CensusEventHandler for NoOpHandler {}
