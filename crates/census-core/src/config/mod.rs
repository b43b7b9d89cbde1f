//! Configuration system for census.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod census_config;
pub mod scan_config;
pub mod storage_config;

pub use census_config::{CensusConfig, CliOverrides};
pub use scan_config::ScanConfig;
pub use storage_config::StorageConfig;
