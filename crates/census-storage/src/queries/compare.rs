//! Cross-index difference queries over two attached indexes.
//!
//! Schema names cannot be bound as parameters, so they are interpolated from
//! the closed `IndexAlias` set only.

use std::path::PathBuf;

use census_core::errors::StorageError;
use rusqlite::Connection;

use super::util::{blob_to_path, collect_paths, sqlite_error};
use crate::attached::IndexAlias;

/// Number of records in the attached index `alias`.
pub fn count_in(conn: &Connection, alias: IndexAlias) -> Result<u64, StorageError> {
    let n: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM {}.file_index", alias.as_str()),
            [],
            |row| row.get(0),
        )
        .map_err(sqlite_error)?;
    Ok(n.max(0) as u64)
}

/// Paths of `left` whose `(content_hash, size)` has no match in `right`,
/// in `left`'s insertion order.
pub fn content_only_in(
    conn: &Connection,
    left: IndexAlias,
    right: IndexAlias,
) -> Result<Vec<PathBuf>, StorageError> {
    let sql = format!(
        "SELECT l.path FROM {left}.file_index AS l
         WHERE NOT EXISTS (
             SELECT 1 FROM {right}.file_index AS r
             WHERE r.content_hash = l.content_hash AND r.size = l.size
         )
         ORDER BY l.seq",
        left = left.as_str(),
        right = right.as_str(),
    );
    query_paths(conn, &sql)
}

/// Paths of `left` whose root-relative path has no match in `right`,
/// in `left`'s insertion order.
pub fn path_only_in(
    conn: &Connection,
    left: IndexAlias,
    right: IndexAlias,
) -> Result<Vec<PathBuf>, StorageError> {
    let sql = format!(
        "SELECT l.path FROM {left}.file_index AS l
         WHERE NOT EXISTS (
             SELECT 1 FROM {right}.file_index AS r
             WHERE r.rel_path = l.rel_path
         )
         ORDER BY l.seq",
        left = left.as_str(),
        right = right.as_str(),
    );
    query_paths(conn, &sql)
}

fn query_paths(conn: &Connection, sql: &str) -> Result<Vec<PathBuf>, StorageError> {
    let mut stmt = conn.prepare(sql).map_err(sqlite_error)?;
    let rows = stmt
        .query_map([], |row| blob_to_path(0, row.get(0)?))
        .map_err(sqlite_error)?;
    collect_paths(rows)
}
