//! Results of an indexing run and of a comparison.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of one indexing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub scan_root: PathBuf,
    pub index_path: PathBuf,
    /// Regular files enumerated by the walker.
    pub files_found: usize,
    /// Records actually stored, as counted by the store after sealing.
    pub files_recorded: u64,
    /// Files dropped by soft per-file failures.
    pub files_skipped: usize,
    pub bytes_processed: u64,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl IndexSummary {
    /// Whether the stored count disagrees with the number of files found.
    pub fn has_discrepancy(&self) -> bool {
        self.files_found as u64 != self.files_recorded
    }

    /// Throughput over the whole run. Zero for an instantaneous run.
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Differences of index A relative to index B. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub index_a: PathBuf,
    pub index_b: PathBuf,
    pub root_a: PathBuf,
    pub root_b: PathBuf,
    pub total_a: u64,
    pub total_b: u64,
    /// `total_a - total_b`.
    pub difference: i64,
    /// Paths of A whose `(content_hash, size)` has no match in B.
    #[serde(serialize_with = "lossy_paths::serialize")]
    pub content_only_in_a: Vec<PathBuf>,
    /// Paths of A whose root-relative path has no match in B.
    #[serde(serialize_with = "lossy_paths::serialize")]
    pub path_only_in_a: Vec<PathBuf>,
}

impl ComparisonResult {
    pub fn is_identical(&self) -> bool {
        self.difference == 0 && self.content_only_in_a.is_empty() && self.path_only_in_a.is_empty()
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Indexed paths need not be UTF-8; reports carry their display form.
mod lossy_paths {
    use std::path::PathBuf;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(paths: &[PathBuf], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(found: usize, recorded: u64, millis: u64) -> IndexSummary {
        IndexSummary {
            scan_root: PathBuf::from("/r"),
            index_path: PathBuf::from("/r/file_index.db"),
            files_found: found,
            files_recorded: recorded,
            files_skipped: found.saturating_sub(recorded as usize),
            bytes_processed: 2_000,
            elapsed: Duration::from_millis(millis),
        }
    }

    #[test]
    fn discrepancy_flag() {
        assert!(!summary(3, 3, 10).has_discrepancy());
        assert!(summary(3, 2, 10).has_discrepancy());
    }

    #[test]
    fn throughput_guards_zero_elapsed() {
        assert_eq!(summary(1, 1, 0).bytes_per_second(), 0.0);
        assert_eq!(summary(1, 1, 500).bytes_per_second(), 4_000.0);
    }

    #[test]
    fn elapsed_serializes_as_millis() {
        let json = serde_json::to_value(summary(1, 1, 1_234)).unwrap();
        assert_eq!(json["elapsed"], 1_234);
        let back: IndexSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back.elapsed, Duration::from_millis(1_234));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_difference_paths_serialize_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let odd = PathBuf::from("/r").join(OsStr::from_bytes(b"bad\xff"));
        let result = ComparisonResult {
            index_a: PathBuf::from("/r/file_index.db"),
            index_b: PathBuf::from("/s/file_index.db"),
            root_a: PathBuf::from("/r"),
            root_b: PathBuf::from("/s"),
            total_a: 1,
            total_b: 0,
            difference: 1,
            content_only_in_a: vec![odd.clone()],
            path_only_in_a: vec![odd],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content_only_in_a"][0], "/r/bad\u{fffd}");
        assert_eq!(json["path_only_in_a"][0], "/r/bad\u{fffd}");
    }
}
