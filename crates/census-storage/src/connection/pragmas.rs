//! PRAGMA configuration applied to index connections.
//!
//! Writers run in WAL mode with NORMAL sync while a scan is in progress;
//! sealing folds the WAL back into the main file and switches to a rollback
//! journal so a finished index is a single file.

use census_core::errors::StorageError;
use rusqlite::Connection;

/// Apply performance pragmas to a writable connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("failed to apply pragmas: {e}"),
    })
}

/// Apply read-only pragmas to a read connection.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = -64000;
        PRAGMA mmap_size = 268435456;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("failed to apply read pragmas: {e}"),
    })
}

/// Checkpoint the WAL and switch to a rollback journal.
pub fn finalize_journal(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA wal_checkpoint(TRUNCATE);
        PRAGMA journal_mode = DELETE;
        ",
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("failed to finalize journal: {e}"),
    })
}

/// Current journal mode, lowercased.
pub fn journal_mode(conn: &Connection) -> Result<String, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(mode.to_ascii_lowercase())
}
