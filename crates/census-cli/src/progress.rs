//! Console progress on stderr.

use std::io::Write;

use census_core::events::{
    CensusEventHandler, FileSkippedEvent, FilesDiscoveredEvent, ScanCompleteEvent,
    ScanProgressEvent, ScanStartedEvent,
};

/// Prints scan progress to stderr so stdout stays the report.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn new() -> Self {
        Self
    }
}

impl CensusEventHandler for ConsoleProgress {
    fn on_scan_started(&self, event: &ScanStartedEvent) {
        eprintln!("Creating DB file - {}", event.index_path.display());
        eprintln!("Scanning dir for files - {}", event.root.display());
    }

    fn on_files_discovered(&self, event: &FilesDiscoveredEvent) {
        eprintln!("Found {} files to process", event.total);
    }

    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\rProcessed [{}/{}]", event.processed, event.total);
        let _ = err.flush();
    }

    fn on_file_skipped(&self, event: &FileSkippedEvent) {
        eprintln!("\r{}", skip_line(event));
    }

    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {
        eprintln!();
    }
}

/// The reason already names the path.
fn skip_line(event: &FileSkippedEvent) -> String {
    format!("FAIL {}", event.reason)
}
