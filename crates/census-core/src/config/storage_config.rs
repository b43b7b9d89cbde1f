//! Storage configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{BATCH_WRITE_SIZE, DEFAULT_INDEX_FILE_NAME};

/// Configuration for the index artifact and its writer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// File name of the artifact created under the scanned root. Default: file_index.db.
    pub index_file_name: Option<String>,
    /// Records per write transaction. Default: 500.
    pub batch_size: Option<usize>,
}

impl StorageConfig {
    pub fn effective_index_file_name(&self) -> &str {
        self.index_file_name
            .as_deref()
            .unwrap_or(DEFAULT_INDEX_FILE_NAME)
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(BATCH_WRITE_SIZE)
    }
}
