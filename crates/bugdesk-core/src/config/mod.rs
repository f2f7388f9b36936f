//! Configuration types for the Bugdesk client.
//!
//! Configuration is a single YAML file (`bugdesk.yaml`). Every section is
//! optional; missing values fall back to the defaults below.
//!
//! # Resolution order
//!
//! 1. An explicit path (the CLI's `--config`)
//! 2. `BUGDESK_CONFIG`
//! 3. `./bugdesk.yaml` if it exists
//! 4. Built-in defaults
//!
//! `BUGDESK_API_URL` overrides `api.base_url` after the file is loaded.

pub mod api;
pub mod notifications;

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use notifications::NotificationsConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "BUGDESK_CONFIG";

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "BUGDESK_API_URL";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bugdesk.yaml";

/// Complete Bugdesk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BugdeskConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the current session is persisted.
    #[serde(default)]
    pub session: SessionConfig,

    /// Push-notification settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted session and notification permission.
    #[serde(default = "default_session_directory")]
    pub directory: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: default_session_directory(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "bugdesk_client=debug").
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

fn default_session_directory() -> PathBuf {
    PathBuf::from(".bugdesk")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BugdeskConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load configuration, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match resolve_config_path(explicit) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(url) = env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api.base_url = url;
            config.validate()?;
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Config("api.base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}
