//! Sandbox configuration.

use std::path::Path;

use rhizome_harness_core::KeySetPolicy;
use serde::Deserialize;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for a [`Sandbox`](crate::Sandbox).
///
/// ```toml
/// key_sets = "exact"
/// chunk_name = "program"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    /// Record key-set comparison used by the `equal` intrinsic.
    pub key_sets: KeySetPolicy,
    /// Chunk name shown in Lua error messages.
    pub chunk_name: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            key_sets: KeySetPolicy::default(),
            chunk_name: "harness".to_string(),
        }
    }
}

impl SandboxConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SandboxConfig::from_toml("").unwrap();
        assert_eq!(config, SandboxConfig::default());
        assert_eq!(config.key_sets, KeySetPolicy::Legacy);
        assert_eq!(config.chunk_name, "harness");
    }

    #[test]
    fn test_exact_key_sets() {
        let config = SandboxConfig::from_toml("key_sets = \"exact\"").unwrap();
        assert_eq!(config.key_sets, KeySetPolicy::Exact);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            SandboxConfig::from_toml("timeout = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SandboxConfig::load("/nonexistent/harness.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}
