//! Top-level census configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ScanConfig, StorageConfig};
use crate::constants::{MAX_THREADS, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;
use crate::types::HashAlgorithm;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CENSUS_*`)
/// 3. Project config (`census.toml` in the scanned root)
/// 4. User config (`~/.census/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CensusConfig {
    pub scan: ScanConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scan_threads: Option<usize>,
    pub hash_algorithm: Option<HashAlgorithm>,
    /// Appended to the configured exclude list.
    pub exclude: Vec<String>,
    pub index_file_name: Option<String>,
}

impl CensusConfig {
    /// Load configuration with layered resolution for a scan of `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        // Unreadable user config is not fatal.
                        tracing::warn!(error = %e, "ignoring user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.is_file() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: CensusConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CensusConfig) -> Result<(), ConfigError> {
        if let Some(threads) = config.scan.threads {
            if threads > MAX_THREADS {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.threads".to_string(),
                    message: format!("must be at most {MAX_THREADS}"),
                });
            }
        }
        if let Some(ref name) = config.storage.index_file_name {
            let is_plain_name = Path::new(name)
                .file_name()
                .is_some_and(|f| f == name.as_str());
            if name.is_empty() || !is_plain_name {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.index_file_name".to_string(),
                    message: "must be a bare file name without directories".to_string(),
                });
            }
        }
        if config.storage.batch_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.census/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".census").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CensusConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CensusConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a value.
    fn merge(base: &mut CensusConfig, other: &CensusConfig) {
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.hash_algorithm.is_some() {
            base.scan.hash_algorithm = other.scan.hash_algorithm;
        }
        if !other.scan.exclude.is_empty() {
            base.scan.exclude = other.scan.exclude.clone();
        }
        if other.storage.index_file_name.is_some() {
            base.storage.index_file_name = other.storage.index_file_name.clone();
        }
        if other.storage.batch_size.is_some() {
            base.storage.batch_size = other.storage.batch_size;
        }
    }

    /// Apply environment variable overrides.
    /// Unparsable values are ignored.
    fn apply_env_overrides(config: &mut CensusConfig) {
        if let Ok(val) = std::env::var("CENSUS_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CENSUS_SCAN_HASH_ALGORITHM") {
            if let Ok(v) = val.parse::<HashAlgorithm>() {
                config.scan.hash_algorithm = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CENSUS_STORAGE_INDEX_FILE_NAME") {
            config.storage.index_file_name = Some(val);
        }
        if let Ok(val) = std::env::var("CENSUS_STORAGE_BATCH_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.storage.batch_size = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CensusConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.hash_algorithm {
            config.scan.hash_algorithm = Some(v);
        }
        config.scan.exclude.extend(cli.exclude.iter().cloned());
        if let Some(ref v) = cli.index_file_name {
            config.storage.index_file_name = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
