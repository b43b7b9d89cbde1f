//! Two sealed indexes attached to one scratch connection.

use std::path::{Path, PathBuf};

use census_core::errors::StorageError;
use census_core::types::ScanMetadata;
use rusqlite::{params, Connection};

use crate::connection::read_only_uri;
use crate::queries::util::sqlite_error;
use crate::queries::{compare, scan_meta};
use crate::store::IndexStore;

/// Schema alias of an attached index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexAlias {
    A,
    B,
}

impl IndexAlias {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// An in-memory connection with index A attached as `a` and index B as `b`,
/// both read-only. The same artifact may be attached under both aliases.
#[derive(Debug)]
pub struct AttachedPair {
    conn: Connection,
    path_a: PathBuf,
    path_b: PathBuf,
    meta_a: ScanMetadata,
    meta_b: ScanMetadata,
}

impl AttachedPair {
    /// Validate and attach both indexes. A failure names the offending input.
    pub fn open(path_a: &Path, path_b: &Path) -> Result<Self, StorageError> {
        let meta_a = validated_metadata(path_a)?;
        let meta_b = validated_metadata(path_b)?;

        let conn = Connection::open_in_memory().map_err(sqlite_error)?;
        for (alias, path) in [(IndexAlias::A, path_a), (IndexAlias::B, path_b)] {
            conn.execute(
                &format!("ATTACH DATABASE ?1 AS {}", alias.as_str()),
                params![read_only_uri(path)],
            )
            .map_err(|e| StorageError::NotAnIndex {
                path: path.to_path_buf(),
                reason: format!("attach failed: {e}"),
            })?;
        }
        conn.execute_batch("PRAGMA query_only = ON;")
            .map_err(sqlite_error)?;

        tracing::debug!(
            a = %path_a.display(),
            b = %path_b.display(),
            "attached index pair"
        );

        Ok(Self {
            conn,
            path_a: path_a.to_path_buf(),
            path_b: path_b.to_path_buf(),
            meta_a,
            meta_b,
        })
    }

    pub fn path(&self, alias: IndexAlias) -> &Path {
        match alias {
            IndexAlias::A => &self.path_a,
            IndexAlias::B => &self.path_b,
        }
    }

    pub fn metadata(&self, alias: IndexAlias) -> &ScanMetadata {
        match alias {
            IndexAlias::A => &self.meta_a,
            IndexAlias::B => &self.meta_b,
        }
    }

    /// Record count of one side.
    pub fn count(&self, alias: IndexAlias) -> Result<u64, StorageError> {
        compare::count_in(&self.conn, alias)
    }

    /// Paths of `left` whose content has no match on the other side.
    pub fn content_only_in(&self, left: IndexAlias) -> Result<Vec<PathBuf>, StorageError> {
        compare::content_only_in(&self.conn, left, left.other())
    }

    /// Paths of `left` whose relative path has no match on the other side.
    pub fn path_only_in(&self, left: IndexAlias) -> Result<Vec<PathBuf>, StorageError> {
        compare::path_only_in(&self.conn, left, left.other())
    }

    /// Re-read the metadata of an attached side from the scratch connection.
    pub fn attached_metadata(&self, alias: IndexAlias) -> Result<Option<ScanMetadata>, StorageError> {
        scan_meta::load(&self.conn, alias.as_str())
    }
}

fn validated_metadata(path: &Path) -> Result<ScanMetadata, StorageError> {
    let store = IndexStore::open(path)?;
    store.metadata()?.ok_or_else(|| StorageError::NotAnIndex {
        path: path.to_path_buf(),
        reason: "missing scan metadata".to_string(),
    })
}
