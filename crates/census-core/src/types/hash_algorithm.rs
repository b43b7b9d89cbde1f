//! Content hash algorithms supported by the fingerprinter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The function used to derive a record's `content_hash`.
///
/// The algorithm name is persisted with every index so two indexes built with
/// different functions are never compared for content identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// XXH3 128-bit, rendered as 32 lowercase hex characters.
    #[default]
    Xxh3,
    /// BLAKE3 256-bit, rendered as 64 lowercase hex characters.
    Blake3,
}

impl HashAlgorithm {
    /// Stable name stored in the index metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Xxh3 => "xxh3",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Length of the hex digest this algorithm produces.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Xxh3 => 32,
            HashAlgorithm::Blake3 => 64,
        }
    }

    pub fn all() -> &'static [HashAlgorithm] {
        &[HashAlgorithm::Xxh3, HashAlgorithm::Blake3]
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xxh3" => Ok(HashAlgorithm::Xxh3),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(ConfigError::InvalidValue {
                field: "scan.hash_algorithm".to_string(),
                message: format!("unknown hash algorithm '{other}' (expected xxh3 or blake3)"),
            }),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("XXH3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Xxh3);
        assert_eq!(" blake3 ".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn name_roundtrips() {
        for algo in HashAlgorithm::all() {
            assert_eq!(algo.as_str().parse::<HashAlgorithm>().unwrap(), *algo);
        }
    }
}
