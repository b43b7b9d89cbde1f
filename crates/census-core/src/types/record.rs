//! Persisted record types: one `ScanMetadata` and many `FileRecord`s per index.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::HashAlgorithm;

/// Fingerprint of one regular file as captured at scan time.
///
/// `(content_hash, size)` is the content-identity key used across indexes.
/// Timestamps are seconds since the Unix epoch exactly as the filesystem
/// reported them. `file_name` is for display and may be lossy; `path` is
/// exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub file_name: String,
    pub content_hash: String,
    pub size: u64,
    pub created_at: f64,
    pub modified_at: f64,
    pub accessed_at: f64,
}

/// Scan boundaries and provenance of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub scan_root: PathBuf,
    pub started_at: f64,
    /// `None` while the scan is running; an index is sealed once this is set.
    pub completed_at: Option<f64>,
    pub hash_algorithm: HashAlgorithm,
}

impl ScanMetadata {
    pub fn is_sealed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Wall-clock duration of the scan, if sealed.
    pub fn duration_secs(&self) -> Option<f64> {
        self.completed_at.map(|end| end - self.started_at)
    }
}
