//! Shared helpers for query modules.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use census_core::errors::StorageError;
use census_core::types::paths;
use rusqlite::types::Type;

/// Wrap a rusqlite error.
pub fn sqlite_error(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Whether `e` is a UNIQUE or PRIMARY KEY violation. CHECK and NOT NULL
/// failures share the primary code and are not matched.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
                && matches!(
                    err.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
    )
}

/// Paths are stored as BLOBs of their raw bytes.
pub fn path_to_blob(path: &Path) -> Result<Cow<'_, [u8]>, StorageError> {
    paths::path_bytes(path).ok_or_else(|| StorageError::InvalidRecord {
        path: path.to_path_buf(),
        message: "path has no byte form on this platform".to_string(),
    })
}

/// Decode a stored path BLOB in column `idx`.
pub fn blob_to_path(idx: usize, bytes: Vec<u8>) -> rusqlite::Result<PathBuf> {
    paths::path_from_bytes(bytes).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Blob,
            "stored path is not a valid path on this platform".into(),
        )
    })
}

/// Convert a stored size back to `u64`.
pub fn size_from_sql(idx: usize, size: i64) -> rusqlite::Result<u64> {
    u64::try_from(size).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, size))
}

/// Collect rows of decoded paths.
pub fn collect_paths(
    rows: impl Iterator<Item = rusqlite::Result<PathBuf>>,
) -> Result<Vec<PathBuf>, StorageError> {
    rows.map(|row| row.map_err(sqlite_error)).collect()
}
