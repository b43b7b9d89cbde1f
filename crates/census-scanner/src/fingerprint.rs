//! Per-file fingerprinting: metadata capture plus a streamed content hash.

use std::fs::{self, File, Metadata};
use std::path::Path;

use census_core::errors::ScanError;
use census_core::types::paths;
use census_core::types::timestamp::system_time_secs;
use census_core::types::{FileRecord, HashAlgorithm};

use crate::hasher::hash_reader;

/// Produces a `FileRecord` for one regular file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fingerprinter {
    algorithm: HashAlgorithm,
}

impl Fingerprinter {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Fingerprint `path`.
    ///
    /// `NotAFile` if the path is not a regular readable file at the moment
    /// of access (vanished, replaced, permission denied); `Io` if reading
    /// fails midway; `NonUtf8Path` where the platform has no byte form for
    /// the path. On unix names that are not UTF-8 are fingerprinted and
    /// `file_name` holds their lossy display form. Size and timestamps come
    /// from the open handle, so they describe the same file whose bytes were
    /// hashed.
    pub fn fingerprint(&self, path: &Path) -> Result<FileRecord, ScanError> {
        let not_a_file = || ScanError::NotAFile {
            path: path.to_path_buf(),
        };

        let link_meta = fs::symlink_metadata(path).map_err(|_| not_a_file())?;
        if !link_meta.file_type().is_file() {
            return Err(not_a_file());
        }
        if paths::path_bytes(path).is_none() {
            return Err(ScanError::NonUtf8Path {
                path: path.to_path_buf(),
            });
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file = File::open(path).map_err(|_| not_a_file())?;
        let meta = file.metadata().map_err(|_| not_a_file())?;
        if !meta.is_file() {
            return Err(not_a_file());
        }
        let (created_at, modified_at, accessed_at) = timestamps(&meta);

        let (content_hash, bytes_read) =
            hash_reader(self.algorithm, file).map_err(|source| ScanError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes_read != meta.len() {
            tracing::debug!(
                path = %path.display(),
                expected = meta.len(),
                read = bytes_read,
                "file size changed while hashing"
            );
        }

        Ok(FileRecord {
            path: path.to_path_buf(),
            file_name,
            content_hash,
            size: bytes_read,
            created_at,
            modified_at,
            accessed_at,
        })
    }
}

fn timestamps(meta: &Metadata) -> (f64, f64, f64) {
    let modified = meta.modified().map(system_time_secs).unwrap_or(0.0);
    let accessed = meta.accessed().map(system_time_secs).unwrap_or(modified);
    let created = meta
        .created()
        .map(system_time_secs)
        .ok()
        .or_else(|| change_time(meta))
        .unwrap_or(modified);
    (created, modified, accessed)
}

#[cfg(unix)]
fn change_time(meta: &Metadata) -> Option<f64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ctime() as f64 + meta.ctime_nsec() as f64 / 1e9)
}

#[cfg(not(unix))]
fn change_time(_meta: &Metadata) -> Option<f64> {
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::hasher::hash_bytes;

    #[test]
    fn records_size_hash_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"aaa").unwrap();

        let rec = Fingerprinter::default().fingerprint(&path).unwrap();
        assert_eq!(rec.path, path);
        assert_eq!(rec.file_name, "data.bin");
        assert_eq!(rec.size, 3);
        assert_eq!(rec.content_hash, hash_bytes(HashAlgorithm::Xxh3, b"aaa"));
        assert!(rec.modified_at > 0.0);
    }

    #[test]
    fn empty_file_is_fingerprinted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        let rec = Fingerprinter::new(HashAlgorithm::Blake3).fingerprint(&path).unwrap();
        assert_eq!(rec.size, 0);
        assert_eq!(rec.content_hash.len(), 64);
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Fingerprinter::default().fingerprint(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::NotAFile { .. }));
    }

    #[test]
    fn vanished_file_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Fingerprinter::default()
            .fingerprint(&dir.path().join("gone"))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotAFile { .. }));
        assert!(err.is_per_file());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::write(&target, b"x").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        let err = Fingerprinter::default().fingerprint(&link).unwrap_err();
        assert!(matches!(err, ScanError::NotAFile { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_name_is_fingerprinted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"bad\xff"));
        fs::write(&path, b"bbb").unwrap();
        let rec = Fingerprinter::default().fingerprint(&path).unwrap();
        assert_eq!(rec.path, path);
        assert_eq!(rec.file_name, "bad\u{fffd}");
        assert_eq!(rec.size, 3);
    }

    #[test]
    fn modified_time_matches_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, b"t").unwrap();
        let expected = system_time_secs(fs::metadata(&path).unwrap().modified().unwrap());
        let rec = Fingerprinter::default().fingerprint(&path).unwrap();
        assert_eq!(rec.modified_at, expected);
    }
}
