//! census-storage: the index store.
//!
//! One SQLite file per scan. `IndexStore` owns the lifecycle of a single
//! artifact (create, populate, seal, reopen read-only); `BatchWriter` moves a
//! writable store onto a dedicated thread so the scanner can feed it over a
//! channel; `AttachedPair` attaches two sealed artifacts to one scratch
//! connection for cross-index queries.

pub mod attached;
pub mod batch;
pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use attached::{AttachedPair, IndexAlias};
pub use batch::BatchWriter;
pub use store::IndexStore;
