//! Shared constants for the census indexer.

/// File name of the index artifact written under the scanned root.
pub const DEFAULT_INDEX_FILE_NAME: &str = "file_index.db";

/// Suffixes SQLite appends to the artifact path for its journal files.
pub const INDEX_SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Default number of hashing threads (0 = auto-detect).
pub const DEFAULT_THREADS: usize = 0;

/// Upper bound accepted for `scan.threads`.
pub const MAX_THREADS: usize = 512;

/// Read buffer used when streaming file content through the hasher.
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Records per write transaction, also the fan-out chunk size.
pub const BATCH_WRITE_SIZE: usize = 500;

/// Batch writer channel capacity (in commands).
pub const BATCH_CHANNEL_CAPACITY: usize = 64;

/// Batch writer recv timeout in milliseconds.
pub const BATCH_RECV_TIMEOUT_MS: u64 = 100;

/// Project-level config file looked up in the scanned root.
pub const PROJECT_CONFIG_FILE: &str = "census.toml";

/// Environment variable carrying the tracing filter.
pub const LOG_ENV_VAR: &str = "CENSUS_LOG";
