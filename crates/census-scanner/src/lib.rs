//! census-scanner: builds indexes and compares them.
//!
//! The walker enumerates regular files, the fingerprinter hashes each one,
//! and the `Indexer` drives both into a `census_storage::IndexStore` through
//! a single writer thread. The `Comparator` reads two sealed indexes and never
//! touches the scanned filesystem.

pub mod comparator;
pub mod fingerprint;
pub mod hasher;
pub mod pipeline;
pub mod types;
pub mod walker;

pub use comparator::Comparator;
pub use fingerprint::Fingerprinter;
pub use pipeline::Indexer;
pub use types::{ComparisonResult, IndexSummary};
pub use walker::Walker;
