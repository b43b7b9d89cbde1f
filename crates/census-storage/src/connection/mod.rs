//! Connection management: one writable connection per artifact under
//! construction, read-only connections for sealed artifacts.

pub mod pragmas;
pub mod writer;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use census_core::constants::INDEX_SIDECAR_SUFFIXES;
use census_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use self::pragmas::{apply_pragmas, apply_read_pragmas};
use crate::migrations;
use crate::queries::util::sqlite_error;

/// Open (creating if needed) a writable artifact, apply pragmas, run migrations.
pub fn open_writable(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
        message: format!("open {}: {e}", path.display()),
    })?;
    apply_pragmas(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Open an existing artifact read-only. Never creates the file.
pub fn open_read_only(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(sqlite_error)?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}

/// Paths of the journal files SQLite may place next to `path`.
pub fn sidecar_paths(path: &Path) -> Vec<PathBuf> {
    INDEX_SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = OsString::from(path.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        })
        .collect()
}

/// Delete an artifact and its sidecars. Missing files are not an error.
pub fn remove_artifact(path: &Path) -> Result<(), StorageError> {
    for target in std::iter::once(path.to_path_buf()).chain(sidecar_paths(path)) {
        match std::fs::remove_file(&target) {
            Ok(()) => tracing::debug!(path = %target.display(), "removed previous artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::SqliteError {
                    message: format!("failed to remove {}: {e}", target.display()),
                })
            }
        }
    }
    Ok(())
}

/// SQLite URI opening `path` read-only, for use with `ATTACH`.
pub fn read_only_uri(path: &Path) -> String {
    let raw = path.to_string_lossy();
    #[cfg(windows)]
    let raw = {
        let forward = raw.replace('\\', "/");
        if forward.as_bytes().get(1) == Some(&b':') {
            std::borrow::Cow::Owned(format!("/{forward}"))
        } else {
            std::borrow::Cow::Owned(forward)
        }
    };

    let mut uri = String::with_capacity(raw.len() + 16);
    uri.push_str("file:");
    for ch in raw.chars() {
        match ch {
            '%' => uri.push_str("%25"),
            '?' => uri.push_str("%3f"),
            '#' => uri.push_str("%23"),
            _ => uri.push(ch),
        }
    }
    uri.push_str("?mode=ro");
    uri
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecars_append_suffix_to_full_name() {
        let sidecars = sidecar_paths(Path::new("/tmp/file_index.db"));
        assert_eq!(sidecars[0], PathBuf::from("/tmp/file_index.db-journal"));
        assert_eq!(sidecars[1], PathBuf::from("/tmp/file_index.db-wal"));
        assert_eq!(sidecars[2], PathBuf::from("/tmp/file_index.db-shm"));
    }

    #[cfg(unix)]
    #[test]
    fn uri_escapes_reserved_characters() {
        assert_eq!(
            read_only_uri(Path::new("/data/100%/what?#.db")),
            "file:/data/100%25/what%3f%23.db?mode=ro"
        );
    }

    #[test]
    fn removing_missing_artifact_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        remove_artifact(&dir.path().join("absent.db")).unwrap();
    }
}
