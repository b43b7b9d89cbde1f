//! Queries for the scan_meta table (key/value scan boundaries).

use census_core::errors::StorageError;
use census_core::types::{HashAlgorithm, ScanMetadata};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, OptionalExtension, ToSql};

use super::util::{blob_to_path, sqlite_error};

pub const KEY_SCAN_ROOT: &str = "scan_root";
pub const KEY_STARTED_AT: &str = "started_at";
pub const KEY_COMPLETED_AT: &str = "completed_at";
pub const KEY_HASH_ALGORITHM: &str = "hash_algorithm";

/// Insert one key. Fails if the key already exists.
pub fn insert_value(conn: &Connection, key: &str, value: &dyn ToSql) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO scan_meta (key, value) VALUES (?1, ?2)",
        params![key, value],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

/// Read one key from the schema `schema` (`main` or an attached alias).
pub fn get_value<T: FromSql>(
    conn: &Connection,
    schema: &str,
    key: &str,
) -> Result<Option<T>, StorageError> {
    conn.query_row(
        &format!("SELECT value FROM {schema}.scan_meta WHERE key = ?1"),
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(sqlite_error)
}

/// Write the start record of a scan.
pub fn write_start(
    conn: &Connection,
    scan_root: &[u8],
    started_at: f64,
    algorithm: HashAlgorithm,
) -> Result<(), StorageError> {
    insert_value(conn, KEY_SCAN_ROOT, &scan_root)?;
    insert_value(conn, KEY_STARTED_AT, &started_at.to_string())?;
    insert_value(conn, KEY_HASH_ALGORITHM, &algorithm.as_str())
}

/// Write the end timestamp: the sealing flag.
pub fn write_end(conn: &Connection, completed_at: f64) -> Result<(), StorageError> {
    insert_value(conn, KEY_COMPLETED_AT, &completed_at.to_string())
}

/// Load the scan metadata of `schema`. `None` when no scan was started.
pub fn load(conn: &Connection, schema: &str) -> Result<Option<ScanMetadata>, StorageError> {
    let Some(scan_root) = get_value::<Vec<u8>>(conn, schema, KEY_SCAN_ROOT)? else {
        return Ok(None);
    };
    let started_at = match get_value::<String>(conn, schema, KEY_STARTED_AT)? {
        Some(raw) => parse_timestamp(KEY_STARTED_AT, &raw)?,
        None => return Err(corrupt(KEY_STARTED_AT, "missing")),
    };
    let completed_at = get_value::<String>(conn, schema, KEY_COMPLETED_AT)?
        .map(|raw| parse_timestamp(KEY_COMPLETED_AT, &raw))
        .transpose()?;
    // Artifacts written before the algorithm was recorded used the default.
    let hash_algorithm = match get_value::<String>(conn, schema, KEY_HASH_ALGORITHM)? {
        Some(raw) => raw
            .parse::<HashAlgorithm>()
            .map_err(|e| corrupt(KEY_HASH_ALGORITHM, &e.to_string()))?,
        None => HashAlgorithm::default(),
    };

    let scan_root =
        blob_to_path(0, scan_root).map_err(|e| corrupt(KEY_SCAN_ROOT, &e.to_string()))?;
    Ok(Some(ScanMetadata {
        scan_root,
        started_at,
        completed_at,
        hash_algorithm,
    }))
}

fn parse_timestamp(key: &str, raw: &str) -> Result<f64, StorageError> {
    raw.parse::<f64>()
        .map_err(|e| corrupt(key, &format!("'{raw}' is not a timestamp: {e}")))
}

fn corrupt(key: &str, message: &str) -> StorageError {
    StorageError::SqliteError {
        message: format!("scan_meta.{key}: {message}"),
    }
}
