//! Comparator errors.

use super::error_code::{self, CensusErrorCode};
use super::StorageError;
use crate::types::HashAlgorithm;

/// Errors that can occur while comparing two indexes.
/// There is no partial-comparison mode: any of these aborts the comparison.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("indexes were built with different hash algorithms: A uses {left}, B uses {right}")]
    IncompatibleHashAlgorithm {
        left: HashAlgorithm,
        right: HashAlgorithm,
    },
}

impl CensusErrorCode for CompareError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::IncompatibleHashAlgorithm { .. } => error_code::INCOMPATIBLE_INDEXES,
        }
    }
}
