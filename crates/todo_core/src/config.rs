//! Core configuration.
//!
//! # Responsibility
//! - Collect store policy, display and logging settings in one document.
//! - Provide defaults matching the permissive widget variant.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - `storage_key` is never blank after `validate()`.

use crate::logging::LoggingConfig;
use crate::render::DateLocale;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used by the widget for the list blob.
pub const DEFAULT_STORAGE_KEY: &str = "todos";
/// Minimum text length of the strict widget variant.
pub const STRICT_MINIMUM_TEXT_LENGTH: usize = 3;
/// Placeholder shown when a view has nothing to show.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No todos available";

/// Store policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Minimum trimmed text length in characters; `0` disables the check.
    pub minimum_text_length: usize,
    /// Key under which the whole list is persisted.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            minimum_text_length: 0,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Variant rejecting texts shorter than three characters.
    pub fn strict() -> Self {
        Self {
            minimum_text_length: STRICT_MINIMUM_TEXT_LENGTH,
            ..Self::default()
        }
    }
}

/// Display settings for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub locale: DateLocale,
    pub empty_message: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            locale: DateLocale::default(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub store: StoreConfig,
    pub render: RenderConfig,
    /// Logging stays off unless configured.
    pub logging: Option<LoggingConfig>,
}

/// Configuration document is malformed or violates an invariant.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptyStorageKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::EmptyStorageKey => write!(f, "store.storage_key cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::EmptyStorageKey => None,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, StoreConfig};
    use crate::render::DateLocale;

    #[test]
    fn empty_document_uses_permissive_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config.store.minimum_text_length, 0);
        assert_eq!(config.store.storage_key, "todos");
        assert_eq!(config.render.locale, DateLocale::Indonesian);
        assert_eq!(config.render.empty_message, "No todos available");
        assert!(config.logging.is_none());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = CoreConfig::from_json_str(
            r#"{
                "store": { "minimum_text_length": 3 },
                "render": { "locale": "english_us" },
                "logging": { "level": "warn", "log_dir": "/tmp/todo-logs" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.store, StoreConfig::strict());
        assert_eq!(config.render.locale, DateLocale::EnglishUs);
        let logging = config.logging.unwrap();
        assert_eq!(logging.level, "warn");
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let err = CoreConfig::from_json_str(r#"{ "store": { "storage_key": "  " } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStorageKey));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = CoreConfig::from_json_str("{ store: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
