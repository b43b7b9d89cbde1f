//! Error handling for census.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod compare_error;
pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod scan_error;
pub mod storage_error;

pub use compare_error::CompareError;
pub use config_error::ConfigError;
pub use error_code::CensusErrorCode;
pub use pipeline_error::PipelineError;
pub use scan_error::ScanError;
pub use storage_error::StorageError;
