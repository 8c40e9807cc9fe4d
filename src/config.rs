//! Store configuration.
//!
//! Every field has a default, so an empty JSON object or an empty environment
//! yields the stock configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME_STORAGE_KEY: &str = "theme";
pub const DEFAULT_DARK_MODE_CLASS: &str = "dark";
pub const DEFAULT_ACTION_LOG_CAPACITY: usize = 64;

/// Errors produced while loading or validating a [`StoreConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required string field was empty.
    #[error("config field `{field}` must not be empty")]
    Empty { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Durable storage key holding `"light"` or `"dark"`.
    pub theme_storage_key: String,
    /// Class toggled on the document root while the theme is dark.
    pub dark_mode_class: String,
    /// Number of recent action types kept by the action log; `0` disables it.
    pub action_log_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            theme_storage_key: DEFAULT_THEME_STORAGE_KEY.to_owned(),
            dark_mode_class: DEFAULT_DARK_MODE_CLASS.to_owned(),
            action_log_capacity: DEFAULT_ACTION_LOG_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `QADESK_THEME_KEY`: default `theme`
    /// - `QADESK_DARK_CLASS`: default `dark`
    /// - `QADESK_ACTION_LOG`: default 64; unparsable values fall back to the default
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            theme_storage_key: std::env::var("QADESK_THEME_KEY").unwrap_or_else(|_| DEFAULT_THEME_STORAGE_KEY.to_owned()),
            dark_mode_class: std::env::var("QADESK_DARK_CLASS").unwrap_or_else(|_| DEFAULT_DARK_MODE_CLASS.to_owned()),
            action_log_capacity: env_parse_usize("QADESK_ACTION_LOG", DEFAULT_ACTION_LOG_CAPACITY),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.theme_storage_key.trim().is_empty() {
            return Err(ConfigError::Empty { field: "themeStorageKey" });
        }
        if self.dark_mode_class.trim().is_empty() {
            return Err(ConfigError::Empty { field: "darkModeClass" });
        }
        Ok(())
    }
}

fn env_parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}
