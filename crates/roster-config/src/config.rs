use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use roster_types::MAX_USERS;

use crate::paths::get_config_path;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// How `created_at` is filled in for new records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timestamps {
    /// Every record gets the same placeholder instant.
    #[default]
    Fixed,
    /// Records are stamped with the current UTC time.
    Now,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default = "default_debug_enabled")]
    pub debug_enabled: bool,
    #[serde(default = "default_max_users")]
    pub max_users: usize,
    #[serde(default)]
    pub timestamps: Timestamps,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            api_endpoint: default_api_endpoint(),
            debug_enabled: default_debug_enabled(),
            max_users: default_max_users(),
            timestamps: Timestamps::default(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:///users.db".to_string()
}

fn default_api_endpoint() -> String {
    "https://api.example.com".to_string()
}

fn default_debug_enabled() -> bool {
    true
}

fn default_max_users() -> usize {
    MAX_USERS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.registry.database_url, "sqlite:///users.db");
        assert_eq!(config.registry.api_endpoint, "https://api.example.com");
        assert!(config.registry.debug_enabled);
        assert_eq!(config.registry.max_users, 1000);
        assert_eq!(config.registry.timestamps, Timestamps::Fixed);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[registry]\nmax_users = 5\ntimestamps = \"now\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.registry.max_users, 5);
        assert_eq!(config.registry.timestamps, Timestamps::Now);
        assert_eq!(config.registry.database_url, "sqlite:///users.db");
        assert!(config.registry.debug_enabled);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.registry.debug_enabled = false;

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[registry\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
