//! Configuration for mapping runs

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a row-level error does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort on the first row error; the graph is left untouched
    #[default]
    FailFast,
    /// Skip failing rows and report every one of them
    Lenient,
}

/// Configuration for a [`Mapping`](crate::Mapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Row-level error policy
    pub error_policy: ErrorPolicy,

    /// Rows pulled from the source per bounded batch
    pub chunk_size: usize,

    /// Expand the rows of a chunk in parallel
    pub parallel: bool,

    /// Worker threads for parallel expansion (0 = rayon default)
    pub max_threads: usize,
}

impl MappingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Whether row errors are collected instead of aborting
    pub fn is_lenient(&self) -> bool {
        self.error_policy == ErrorPolicy::Lenient
    }
}

impl Default for MappingConfig {
    /// Fail-fast, parallel, 1024-row chunks
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::FailFast,
            chunk_size: 1024,
            parallel: true,
            max_threads: 0,
        }
    }
}

impl MappingConfig {
    /// Strict preset: fail fast on the first bad row
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient preset: skip and report bad rows, larger batches
    pub fn lenient() -> Self {
        Self {
            error_policy: ErrorPolicy::Lenient,
            chunk_size: 4096,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MappingConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_lenient());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(MappingConfig::strict().validate().is_ok());
        let lenient = MappingConfig::lenient();
        assert!(lenient.validate().is_ok());
        assert!(lenient.is_lenient());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = MappingConfig {
            chunk_size: 0,
            ..MappingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MappingConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = MappingConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = MappingConfig::from_toml("error_policy = \"lenient\"\n").unwrap();
        assert_eq!(parsed.error_policy, ErrorPolicy::Lenient);
        assert_eq!(parsed.chunk_size, 1024);
        assert!(parsed.parallel);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.toml");
        std::fs::write(&path, "chunk_size = 16\nparallel = false\n").unwrap();

        let config = MappingConfig::from_file(&path).unwrap();
        assert_eq!(config.chunk_size, 16);
        assert!(!config.parallel);

        std::fs::write(&path, "chunk_size = 0\n").unwrap();
        assert!(MappingConfig::from_file(&path).is_err());
    }
}
