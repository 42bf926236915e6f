//! User configuration read from `~/.relmark/config.toml`

use std::path::{Path, PathBuf};

use relmark_core::RelevanceLevel;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level highlighted when the picker opens
    pub default_level: RelevanceLevel,
    /// `tracing` filter used when `RELMARK_LOG` is unset
    pub log_filter: String,
    pub sidebar_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_level: RelevanceLevel::Neutral,
            log_filter: "relmark=info".to_string(),
            sidebar_width: 32,
        }
    }
}

impl Config {
    /// Load from `config_path`; a missing file gives the defaults
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn load(relmark_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_from_path(relmark_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "default_level = \"high\"\n").unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_level, RelevanceLevel::High);
        assert_eq!(config.log_filter, "relmark=info");
        assert_eq!(config.sidebar_width, 32);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "default_level = \"urgent\"\n").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
