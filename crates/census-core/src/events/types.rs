//! Event payload types.

use std::path::PathBuf;

/// Payload for `on_scan_started`.
#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub root: PathBuf,
    pub index_path: PathBuf,
}

/// Payload for `on_files_discovered`.
#[derive(Debug, Clone)]
pub struct FilesDiscoveredEvent {
    pub total: usize,
    pub discovery_ms: u64,
}

/// Payload for `on_scan_progress`.
#[derive(Debug, Clone)]
pub struct ScanProgressEvent {
    pub processed: usize,
    pub total: usize,
    pub bytes_processed: u64,
}

/// Payload for `on_file_skipped`.
#[derive(Debug, Clone)]
pub struct FileSkippedEvent {
    pub path: PathBuf,
    pub reason: String,
}

/// Payload for `on_scan_complete`.
#[derive(Debug, Clone)]
pub struct ScanCompleteEvent {
    pub files_found: usize,
    pub files_recorded: usize,
    pub files_skipped: usize,
    pub bytes_processed: u64,
    pub duration_ms: u64,
}

/// Payload for `on_scan_error`.
#[derive(Debug, Clone)]
pub struct ScanErrorEvent {
    pub message: String,
}
