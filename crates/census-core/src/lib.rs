//! census-core: shared foundation for the census file indexer.
//!
//! Holds the record types persisted by `census-storage`, the error enums of
//! every subsystem, layered configuration, scan events and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;
