//! Shared data types: file records, scan metadata, hashing and path helpers.

pub mod collections;
pub mod hash_algorithm;
pub mod paths;
pub mod record;
pub mod timestamp;

pub use hash_algorithm::HashAlgorithm;
pub use record::{FileRecord, ScanMetadata};
