//! `IndexStore`: lifecycle of one index artifact.
//!
//! A store is either writable (returned by [`IndexStore::create`], owned by
//! exactly one indexing run) or read-only (returned by [`IndexStore::open`],
//! only for sealed artifacts). The end timestamp is the sealing flag.

use std::path::{Path, PathBuf};

use census_core::errors::StorageError;
use census_core::types::{paths, FileRecord, HashAlgorithm, ScanMetadata};
use rusqlite::Connection;

use crate::connection::pragmas::finalize_journal;
use crate::connection::writer::with_immediate_transaction;
use crate::connection::{open_read_only, open_writable, remove_artifact};
use crate::migrations::{self, LATEST_VERSION};
use crate::queries::util::path_to_blob;
use crate::queries::{files, scan_meta};

#[derive(Debug)]
enum Phase {
    /// Created, start record not yet written.
    Empty,
    /// Start record written; accepting records.
    Open { scan_root: PathBuf, started_at: f64 },
    /// End record written.
    Sealed,
    /// Opened read-only from a sealed artifact.
    ReadOnly,
}

/// Handle to a single index artifact.
#[derive(Debug)]
pub struct IndexStore {
    conn: Connection,
    path: PathBuf,
    phase: Phase,
}

impl IndexStore {
    /// Destroy whatever exists at `path` (artifact and sidecars) and
    /// initialize an empty index.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        remove_artifact(path)?;
        let conn = open_writable(path)?;
        tracing::debug!(path = %path.display(), "created index");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            phase: Phase::Empty,
        })
    }

    /// Open a sealed index read-only.
    ///
    /// Fails with `NotAnIndex` when the file is absent, is not a SQLite
    /// database, lacks the index schema, or was never sealed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if !path.is_file() {
            return Err(not_an_index(path, "file does not exist"));
        }
        let conn = open_read_only(path).map_err(|e| not_an_index(path, &e.to_string()))?;

        let version =
            migrations::current_version(&conn).map_err(|e| not_an_index(path, &e.to_string()))?;
        if version == 0 {
            return Err(not_an_index(path, "missing index schema"));
        }
        if version > LATEST_VERSION {
            return Err(not_an_index(
                path,
                &format!("unsupported schema version {version}"),
            ));
        }

        let meta = scan_meta::load(&conn, "main").map_err(|e| not_an_index(path, &e.to_string()))?;
        match meta {
            None => return Err(not_an_index(path, "missing scan metadata")),
            Some(meta) if !meta.is_sealed() => {
                return Err(not_an_index(path, "index was never sealed"))
            }
            Some(_) => {}
        }

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            phase: Phase::ReadOnly,
        })
    }

    /// Path of the artifact on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the end record has been written (or the store was opened
    /// from a sealed artifact).
    pub fn is_sealed(&self) -> bool {
        matches!(self.phase, Phase::Sealed | Phase::ReadOnly)
    }

    /// Record the scan root, start time and hash algorithm. Exactly once.
    pub fn write_metadata_start(
        &mut self,
        scan_root: &Path,
        started_at: f64,
        algorithm: HashAlgorithm,
    ) -> Result<(), StorageError> {
        if !matches!(self.phase, Phase::Empty) {
            return Err(lifecycle(format!(
                "start metadata already written or store not writable: {}",
                self.path.display()
            )));
        }
        let root = path_to_blob(scan_root)?;
        with_immediate_transaction(&self.conn, |tx| {
            scan_meta::write_start(tx, &root, started_at, algorithm)
        })?;
        self.phase = Phase::Open {
            scan_root: scan_root.to_path_buf(),
            started_at,
        };
        Ok(())
    }

    /// Append one record.
    pub fn append_record(&mut self, record: &FileRecord) -> Result<(), StorageError> {
        self.append_records(std::slice::from_ref(record))
    }

    /// Append records in one transaction. Either all are stored or none.
    pub fn append_records(&mut self, records: &[FileRecord]) -> Result<(), StorageError> {
        let Phase::Open { scan_root, .. } = &self.phase else {
            return Err(lifecycle(format!(
                "records can only be appended between start and end metadata: {}",
                self.path.display()
            )));
        };
        if records.is_empty() {
            return Ok(());
        }
        with_immediate_transaction(&self.conn, |tx| {
            for record in records {
                let rel_path = paths::relative_path(scan_root, &record.path).ok_or_else(|| {
                    StorageError::InvalidRecord {
                        path: record.path.clone(),
                        message: format!("not under scan root {}", scan_root.display()),
                    }
                })?;
                files::insert_record(tx, record, &rel_path)?;
            }
            Ok(())
        })
    }

    /// Write the end timestamp and fold the journal into the main file.
    ///
    /// `completed_at` earlier than the start time (wall clock stepped back)
    /// is clamped to the start time.
    pub fn write_metadata_end(&mut self, completed_at: f64) -> Result<(), StorageError> {
        let Phase::Open { started_at, .. } = self.phase else {
            return Err(lifecycle(format!(
                "end metadata requires an open scan: {}",
                self.path.display()
            )));
        };
        let completed_at = completed_at.max(started_at);
        with_immediate_transaction(&self.conn, |tx| scan_meta::write_end(tx, completed_at))?;
        finalize_journal(&self.conn)?;
        self.phase = Phase::Sealed;
        tracing::debug!(path = %self.path.display(), "sealed index");
        Ok(())
    }

    /// Write the end metadata and reopen the artifact read-only.
    pub fn seal(mut self, completed_at: f64) -> Result<Self, StorageError> {
        self.write_metadata_end(completed_at)?;
        let path = self.path.clone();
        drop(self);
        Self::open(&path)
    }

    /// Number of records stored.
    pub fn count(&self) -> Result<u64, StorageError> {
        files::count(&self.conn)
    }

    /// Scan metadata, `None` before the start record is written.
    pub fn metadata(&self) -> Result<Option<ScanMetadata>, StorageError> {
        scan_meta::load(&self.conn, "main")
    }

    /// All records in insertion order.
    pub fn records(&self) -> Result<Vec<FileRecord>, StorageError> {
        files::load_all(&self.conn)
    }

    /// The record for an absolute path, if present.
    pub fn get(&self, path: &Path) -> Result<Option<FileRecord>, StorageError> {
        files::get_by_path(&self.conn, path)
    }
}

fn not_an_index(path: &Path, reason: &str) -> StorageError {
    StorageError::NotAnIndex {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn lifecycle(message: String) -> StorageError {
    StorageError::Lifecycle { message }
}
