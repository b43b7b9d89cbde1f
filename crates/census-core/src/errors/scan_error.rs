//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, CensusErrorCode};

/// Errors that can occur while walking a tree or fingerprinting a file.
///
/// `NotADirectory` is fatal; the per-file variants are absorbed by the
/// indexing pipeline and counted as skipped.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Not a regular, readable file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Path is not valid UTF-8: {path}")]
    NonUtf8Path { path: PathBuf },

    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Whether the pipeline skips the file and continues.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::NotAFile { .. } | Self::NonUtf8Path { .. } | Self::Io { .. }
        )
    }
}

impl CensusErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotADirectory { .. } => error_code::NOT_A_DIRECTORY,
            Self::NotAFile { .. } => error_code::NOT_A_FILE,
            Self::Cancelled => error_code::CANCELLED,
            _ => error_code::SCAN_ERROR,
        }
    }
}
