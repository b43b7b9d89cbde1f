//! CensusErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable code string that
/// front ends print alongside the message.
pub trait CensusErrorCode {
    /// Returns the error code string (e.g., "NOT_AN_INDEX").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const NOT_A_DIRECTORY: &str = "NOT_A_DIRECTORY";
pub const NOT_A_FILE: &str = "NOT_A_FILE";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const CANCELLED: &str = "CANCELLED";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DUPLICATE_PATH: &str = "DUPLICATE_PATH";
pub const NOT_AN_INDEX: &str = "NOT_AN_INDEX";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const LIFECYCLE_ERROR: &str = "LIFECYCLE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INCOMPATIBLE_INDEXES: &str = "INCOMPATIBLE_INDEXES";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
