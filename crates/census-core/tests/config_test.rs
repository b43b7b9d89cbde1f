//! Tests for the census configuration system.

use std::sync::Mutex;

use census_core::config::{CensusConfig, CliOverrides};
use census_core::constants::{BATCH_WRITE_SIZE, DEFAULT_INDEX_FILE_NAME};
use census_core::errors::ConfigError;
use census_core::types::HashAlgorithm;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all CENSUS_ env vars to prevent cross-test contamination.
fn clear_census_env_vars() {
    for key in [
        "CENSUS_SCAN_THREADS",
        "CENSUS_SCAN_HASH_ALGORITHM",
        "CENSUS_STORAGE_INDEX_FILE_NAME",
        "CENSUS_STORAGE_BATCH_SIZE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn layered_resolution_cli_over_env_over_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_census_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("census.toml"),
        r#"
[scan]
threads = 2
hash_algorithm = "blake3"
exclude = ["*.tmp"]

[storage]
batch_size = 50
"#,
    )
    .unwrap();

    std::env::set_var("CENSUS_SCAN_THREADS", "6");
    std::env::set_var("CENSUS_STORAGE_BATCH_SIZE", "75");

    let cli = CliOverrides {
        scan_threads: Some(3),
        exclude: vec!["cache/**".to_string()],
        ..Default::default()
    };

    let config = CensusConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats env and project
    assert_eq!(config.scan.threads, Some(3));
    // Env beats project
    assert_eq!(config.storage.batch_size, Some(75));
    // Project value survives where nothing overrides it
    assert_eq!(config.scan.effective_hash_algorithm(), HashAlgorithm::Blake3);
    // CLI excludes extend the configured list
    assert_eq!(config.scan.exclude, vec!["*.tmp".to_string(), "cache/**".to_string()]);

    clear_census_env_vars();
}

#[test]
fn missing_project_config_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_census_env_vars();

    let dir = tempdir();
    let config = CensusConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.storage.effective_index_file_name(), DEFAULT_INDEX_FILE_NAME);
    assert_eq!(config.storage.effective_batch_size(), BATCH_WRITE_SIZE);
    assert_eq!(config.scan.effective_hash_algorithm(), HashAlgorithm::Xxh3);
    assert!(config.scan.effective_threads() >= 1);
    assert!(config.scan.exclude.is_empty());
}

#[test]
fn invalid_env_values_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_census_env_vars();

    std::env::set_var("CENSUS_SCAN_THREADS", "lots");
    std::env::set_var("CENSUS_SCAN_HASH_ALGORITHM", "md5");

    let dir = tempdir();
    let config = CensusConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.scan.threads, None);
    assert_eq!(config.scan.hash_algorithm, None);

    clear_census_env_vars();
}

#[test]
fn malformed_project_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_census_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("census.toml"), "[scan\nthreads = ").unwrap();

    let err = CensusConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn unknown_hash_algorithm_in_toml_is_rejected() {
    let err = CensusConfig::from_toml("[scan]\nhash_algorithm = \"md5\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn index_file_name_must_be_a_bare_name() {
    let err = CensusConfig::from_toml("[storage]\nindex_file_name = \"sub/dir.db\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "storage.index_file_name"));

    let err = CensusConfig::from_toml("[storage]\nindex_file_name = \"\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));

    let ok = CensusConfig::from_toml("[storage]\nindex_file_name = \"scan.db\"\n").unwrap();
    assert_eq!(ok.storage.effective_index_file_name(), "scan.db");
}

#[test]
fn zero_batch_size_is_rejected() {
    let err = CensusConfig::from_toml("[storage]\nbatch_size = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "storage.batch_size"));
}

#[test]
fn unknown_keys_are_ignored() {
    let config = CensusConfig::from_toml("[scan]\nthreads = 4\nfuture_option = true\n").unwrap();
    assert_eq!(config.scan.threads, Some(4));
}

#[test]
fn toml_roundtrip_preserves_values() {
    let config = CensusConfig::from_toml(
        "[scan]\nthreads = 8\nhash_algorithm = \"blake3\"\n[storage]\nindex_file_name = \"x.db\"\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let reparsed = CensusConfig::from_toml(&rendered).unwrap();
    assert_eq!(reparsed.scan.threads, Some(8));
    assert_eq!(reparsed.scan.hash_algorithm, Some(HashAlgorithm::Blake3));
    assert_eq!(reparsed.storage.index_file_name.as_deref(), Some("x.db"));
}
