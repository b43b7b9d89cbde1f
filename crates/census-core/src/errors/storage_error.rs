//! Storage-layer errors for SQLite operations.

use std::path::PathBuf;

use super::error_code::{self, CensusErrorCode};

/// Errors raised by the index store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("duplicate path in index: {path}")]
    DuplicatePath { path: PathBuf },

    #[error("invalid record for {path}: {message}")]
    InvalidRecord { path: PathBuf, message: String },

    #[error("not a valid index: {path} ({reason})")]
    NotAnIndex { path: PathBuf, reason: String },

    #[error("index lifecycle violation: {message}")]
    Lifecycle { message: String },

    #[error("batch writer disconnected")]
    WriterDisconnected,
}

impl CensusErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicatePath { .. } => error_code::DUPLICATE_PATH,
            Self::NotAnIndex { .. } => error_code::NOT_AN_INDEX,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::Lifecycle { .. } => error_code::LIFECYCLE_ERROR,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
