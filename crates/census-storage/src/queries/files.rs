//! file_index CRUD queries.

use std::path::Path;

use census_core::errors::StorageError;
use census_core::types::FileRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::util::{blob_to_path, is_unique_violation, path_to_blob, size_from_sql, sqlite_error};

const RECORD_COLUMNS: &str =
    "path, file_name, content_hash, size, created_at, modified_at, accessed_at";

/// Insert one record. `rel_path` is the record's path relative to the scan
/// root in stored byte form.
pub fn insert_record(
    conn: &Connection,
    record: &FileRecord,
    rel_path: &[u8],
) -> Result<(), StorageError> {
    let path = path_to_blob(&record.path)?;
    let path: &[u8] = &path;
    let size = i64::try_from(record.size).map_err(|_| StorageError::InvalidRecord {
        path: record.path.clone(),
        message: format!("size {} does not fit in an INTEGER column", record.size),
    })?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO file_index
                (path, rel_path, file_name, content_hash, size, created_at, modified_at, accessed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(sqlite_error)?;

    stmt.execute(params![
        path,
        rel_path,
        record.file_name,
        record.content_hash,
        size,
        record.created_at,
        record.modified_at,
        record.accessed_at,
    ])
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::DuplicatePath {
                path: record.path.clone(),
            }
        } else {
            sqlite_error(e)
        }
    })?;
    Ok(())
}

/// Number of records.
pub fn count(conn: &Connection) -> Result<u64, StorageError> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM file_index", [], |row| row.get(0))
        .map_err(sqlite_error)?;
    Ok(n.max(0) as u64)
}

/// All records in insertion order.
pub fn load_all(conn: &Connection) -> Result<Vec<FileRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {RECORD_COLUMNS} FROM file_index ORDER BY seq"
        ))
        .map_err(sqlite_error)?;

    let rows = stmt.query_map([], map_record).map_err(sqlite_error)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_error)?);
    }
    Ok(result)
}

/// Look up a record by absolute path.
pub fn get_by_path(conn: &Connection, path: &Path) -> Result<Option<FileRecord>, StorageError> {
    let Ok(bytes) = path_to_blob(path) else {
        return Ok(None);
    };
    let bytes: &[u8] = &bytes;
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM file_index WHERE path = ?1"),
        params![bytes],
        map_record,
    )
    .optional()
    .map_err(sqlite_error)
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        path: blob_to_path(0, row.get(0)?)?,
        file_name: row.get(1)?,
        content_hash: row.get(2)?,
        size: size_from_sql(3, row.get(3)?)?,
        created_at: row.get(4)?,
        modified_at: row.get(5)?,
        accessed_at: row.get(6)?,
    })
}
