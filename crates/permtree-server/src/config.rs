//! Configuration management for permtree.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use permtree_server::config::AppConfig;
//!
//! // Load from file with env overrides
//! let config = AppConfig::load("permtree.yaml")?;
//!
//! // Or load from environment only
//! let config = AppConfig::from_env()?;
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use permtree_domain::GrantCacheConfig;

/// Environment variable prefix; `PERMTREE_CACHE__ENABLED` maps to
/// `cache.enabled`.
const ENV_PREFIX: &str = "PERMTREE";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Grant cache settings
    #[serde(default)]
    pub cache: CacheSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend type. Only "memory" is available.
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Inventory snapshot loaded at startup. The command line flag wins
    /// when both are set.
    pub snapshot_path: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            snapshot_path: None,
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

/// Grant cache settings.
///
/// ```yaml
/// cache:
///   enabled: true
///   max_capacity: 10000
///   ttl_secs: 60
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CacheSettings {
    /// Environment variable: `PERMTREE_CACHE__ENABLED`
    #[serde(default)]
    pub enabled: bool,

    /// Maximum number of cached grant sets.
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,

    /// Time-to-live of a cached grant set, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_cache_ttl() -> u64 {
    60
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> GrantCacheConfig {
        GrantCacheConfig::default()
            .with_enabled(self.enabled)
            .with_max_capacity(self.max_capacity)
            .with_ttl(Duration::from_secs(self.ttl_secs))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl AppConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `PERMTREE_` and use `__` as
    /// separator, e.g. `PERMTREE_LOGGING__LEVEL=debug` overrides
    /// `logging.level`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(environment())
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(environment())
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_backends = ["memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be one of: {:?}, got: {}",
                    valid_backends, self.storage.backend
                ),
            });
        }

        if self
            .storage
            .snapshot_path
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "storage.snapshot_path cannot be empty".to_string(),
            });
        }

        if self.cache.enabled && self.cache.max_capacity == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "cache.max_capacity must be greater than 0 when the cache is enabled"
                    .to_string(),
            });
        }
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "cache.ttl_secs must be greater than 0 when the cache is enabled"
                    .to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
