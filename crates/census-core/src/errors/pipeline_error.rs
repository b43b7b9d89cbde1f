//! Pipeline errors.

use super::error_code::{self, CensusErrorCode};
use super::{ConfigError, ScanError, StorageError};

/// Errors that abort an indexing run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build hashing thread pool: {message}")]
    ThreadPool { message: String },

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl CensusErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::ThreadPool { .. } => error_code::PIPELINE_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn wrapped_errors_keep_their_code() {
        let err = PipelineError::from(ScanError::NotADirectory {
            path: PathBuf::from("/nope"),
        });
        assert_eq!(err.error_code(), error_code::NOT_A_DIRECTORY);
        assert!(err.coded_message().starts_with("[NOT_A_DIRECTORY] "));
    }

    #[test]
    fn storage_codes_are_specific() {
        let err = PipelineError::from(StorageError::DuplicatePath {
            path: PathBuf::from("/a"),
        });
        assert_eq!(err.error_code(), error_code::DUPLICATE_PATH);
    }
}
