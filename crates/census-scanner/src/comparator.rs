//! Comparator: set differences between two sealed indexes.
//!
//! Both indexes are attached read-only to one scratch connection and the
//! differences are computed by `NOT EXISTS` queries, so memory use does not
//! grow with index size. The scanned filesystem is never consulted.

use std::path::Path;

use census_core::errors::CompareError;
use census_storage::{AttachedPair, IndexAlias};

use crate::types::ComparisonResult;

/// Two validated, attached indexes.
#[derive(Debug)]
pub struct Comparator {
    pair: AttachedPair,
}

impl Comparator {
    /// Open both indexes. Either failing to open is reported as `NotAnIndex`
    /// naming that input, before any comparison work.
    pub fn open(index_a: &Path, index_b: &Path) -> Result<Self, CompareError> {
        let pair = AttachedPair::open(index_a, index_b)?;
        let left = pair.metadata(IndexAlias::A).hash_algorithm;
        let right = pair.metadata(IndexAlias::B).hash_algorithm;
        if left != right {
            return Err(CompareError::IncompatibleHashAlgorithm { left, right });
        }
        Ok(Self { pair })
    }

    /// Compare A against B.
    pub fn compare(&self) -> Result<ComparisonResult, CompareError> {
        self.compare_from(IndexAlias::A)
    }

    /// The reverse comparison, B against A, over the same attachment.
    pub fn compare_reverse(&self) -> Result<ComparisonResult, CompareError> {
        self.compare_from(IndexAlias::B)
    }

    fn compare_from(&self, left: IndexAlias) -> Result<ComparisonResult, CompareError> {
        let right = left.other();
        let total_a = self.pair.count(left)?;
        let total_b = self.pair.count(right)?;
        let content_only_in_a = self.pair.content_only_in(left)?;
        let path_only_in_a = self.pair.path_only_in(left)?;

        tracing::info!(
            total_a,
            total_b,
            content_differences = content_only_in_a.len(),
            path_differences = path_only_in_a.len(),
            "comparison complete"
        );

        Ok(ComparisonResult {
            index_a: self.pair.path(left).to_path_buf(),
            index_b: self.pair.path(right).to_path_buf(),
            root_a: self.pair.metadata(left).scan_root.clone(),
            root_b: self.pair.metadata(right).scan_root.clone(),
            total_a,
            total_b,
            difference: total_a as i64 - total_b as i64,
            content_only_in_a,
            path_only_in_a,
        })
    }
}

/// Open and compare in one step.
pub fn compare(index_a: &Path, index_b: &Path) -> Result<ComparisonResult, CompareError> {
    Comparator::open(index_a, index_b)?.compare()
}
