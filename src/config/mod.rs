//! Configuration module for wallify
//!
//! Manages the catalog endpoint, API key and session timings. Settings are
//! layered: built-in defaults, then `~/.config/wallify/config.toml`, then
//! `WALLIFY_*` environment variables (e.g. `WALLIFY_API_KEY`).
//!
//! Writes go through [`WallifyConfig::load_file_only`] so that values which
//! only come from the environment are never persisted.

mod setup;

pub use setup::first_time_setup;

use crate::gateway::DEFAULT_ENDPOINT;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Quiet window for search text, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Per-request timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Prefix of the environment variables that override the file
const ENV_PREFIX: &str = "WALLIFY";

/// Keys accepted by `get_value` / `set_value`
pub const KEYS: [&str; 5] = [
    "api_key",
    "endpoint",
    "debounce_ms",
    "request_timeout_secs",
    "quiet",
];

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WallifyConfig {
    /// Catalog API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Catalog endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Quiet window before typed text becomes a search
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Give up on a catalog request after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for WallifyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            quiet: false,
        }
    }
}

impl WallifyConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("wallify").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_create(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing the defaults there first if
    /// the file does not exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be created or parsed.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }

        Self::load_from(path)
    }

    /// Load configuration from `path`, layered with environment overrides
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, Some(Environment::with_prefix(ENV_PREFIX)))
    }

    /// Load only what is stored in the file at `path`, ignoring the
    /// environment
    ///
    /// This is the base to modify and save back.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed.
    pub fn load_file_only(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, None)
    }

    fn load_layered(path: &Path, env: Option<Environment>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(false),
        );
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        builder.build()?.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the path cannot be determined or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path` as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// API key, if one is configured and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Read a setting by key, rendered as a string
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "api_key" => Some(self.api_key.clone().unwrap_or_default()),
            "endpoint" => Some(self.endpoint.clone()),
            "debounce_ms" => Some(self.debounce_ms.to_string()),
            "request_timeout_secs" => Some(self.request_timeout_secs.to_string()),
            "quiet" => Some(self.quiet.to_string()),
            _ => None,
        }
    }

    /// Update a setting from its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or a value that does not parse.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| {
            ConfigError::Message(format!("Invalid value '{value}' for {key}: {e}"))
        };

        match key {
            "api_key" => {
                let value = value.trim();
                self.api_key = (!value.is_empty()).then(|| value.to_string());
            }
            "endpoint" => self.endpoint = value.trim().to_string(),
            "debounce_ms" => self.debounce_ms = value.parse().map_err(|e| invalid(&e))?,
            "request_timeout_secs" => {
                let secs: u64 = value.parse().map_err(|e| invalid(&e))?;
                if secs == 0 {
                    return Err(invalid(&"timeout must be at least one second"));
                }
                self.request_timeout_secs = secs;
            }
            "quiet" => self.quiet = value.parse().map_err(|e| invalid(&e))?,
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown setting '{key}' (expected one of: {})",
                    KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Layered load with a fixed set of `WALLIFY_*` variables instead of the
/// process environment
#[cfg(test)]
pub(crate) fn load_with_env(path: &Path, vars: &[(&str, &str)]) -> Result<WallifyConfig, ConfigError> {
    let vars: config::Map<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect();
    WallifyConfig::load_layered(path, Some(Environment::with_prefix(ENV_PREFIX).source(Some(vars))))
}
