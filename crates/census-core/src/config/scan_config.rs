//! Scan configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THREADS;
use crate::types::HashAlgorithm;

/// Configuration for the walker and fingerprinter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Hashing threads. 0 = one per available core. Default: 0.
    pub threads: Option<usize>,
    /// Content hash function. Default: xxh3.
    pub hash_algorithm: Option<HashAlgorithm>,
    /// Glob patterns (relative to the scan root) excluded from the walk.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ScanConfig {
    /// Returns the effective thread count, resolving 0 to the detected parallelism.
    pub fn effective_threads(&self) -> usize {
        match self.threads.unwrap_or(DEFAULT_THREADS) {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    /// Returns the effective hash algorithm, defaulting to xxh3.
    pub fn effective_hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm.unwrap_or_default()
    }
}
