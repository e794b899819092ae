//! Configuration management for the Schema Registry
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-registry.toml)
//! - Environment variables (SCHEMA_REGISTRY__*)
//!
//! ## Example config file (schema-registry.toml):
//! ```toml
//! [registry]
//! schemas_dir = "./schemas"
//! context_id = "ingest"
//!
//! [listeners]
//! logging = true
//! metrics = true
//!
//! [logging]
//! log_successes = false
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::registry::DEFAULT_CONTEXT_ID;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistrySection,

    /// Which built-in listeners a context gets
    #[serde(default)]
    pub listeners: ListenerConfig,

    /// Logging listener settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Directory of JSON Schema files to register at startup
    #[serde(default)]
    pub schemas_dir: Option<PathBuf>,

    /// Label for contexts created by the CLI
    #[serde(default = "default_context_id")]
    pub context_id: String,
}

/// Built-in listener toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_true")]
    pub logging: bool,

    #[serde(default = "default_true")]
    pub metrics: bool,
}

/// Logging listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log successful validations at info level (debug otherwise)
    #[serde(default = "default_true")]
    pub log_successes: bool,
}

fn default_true() -> bool {
    true
}

fn default_context_id() -> String {
    DEFAULT_CONTEXT_ID.to_string()
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            schemas_dir: None,
            context_id: default_context_id(),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            logging: true,
            metrics: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_successes: true }
    }
}

impl RegistryConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-registry.toml",
            ".schema-registry.toml",
            "config/schema-registry.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schema-registry", "schema-registry") {
            let xdg_config = config_dir.config_dir().join("schema-registry.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_REGISTRY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_toml()?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> std::io::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.registry.context_id, "schema_validation");
        assert!(config.registry.schemas_dir.is_none());
        assert!(config.listeners.logging);
        assert!(config.listeners.metrics);
        assert!(config.logging.log_successes);
    }

    #[test]
    fn test_serialize_config() {
        let toml_str = RegistryConfig::default().to_toml().unwrap();
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("[listeners]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[registry]\nschemas_dir = \"schemas\"\ncontext_id = \"ingest\"\n\n[listeners]\nmetrics = false\n",
        )
        .unwrap();

        let config = RegistryConfig::load_from(Some(path.as_path())).unwrap();
        assert_eq!(config.registry.context_id, "ingest");
        assert_eq!(config.registry.schemas_dir, Some(PathBuf::from("schemas")));
        assert!(!config.listeners.metrics);
        assert!(config.listeners.logging);
        assert!(config.logging.log_successes);
    }

    #[test]
    fn test_env_overrides_listener_toggle() {
        std::env::set_var("SCHEMA_REGISTRY__LISTENERS__METRICS", "false");
        let loaded = RegistryConfig::load();
        std::env::remove_var("SCHEMA_REGISTRY__LISTENERS__METRICS");

        let config = loaded.unwrap();
        assert!(!config.listeners.metrics);
        assert!(config.listeners.logging);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempdir().unwrap();
        let err = RegistryConfig::load_from(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, crate::error::RegistryError::Config(_)));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut config = RegistryConfig::default();
        config.logging.log_successes = false;
        config.save(&path).unwrap();

        let loaded = RegistryConfig::load_from(Some(path.as_path())).unwrap();
        assert!(!loaded.logging.log_successes);
    }
}
