//! Notebook configuration.
//!
//! # Responsibility
//! - Describe slot keys, corrupt-slot policy and logging settings.
//! - Load settings from JSON with per-field defaults.
//!
//! # Invariants
//! - `notes_key` and `tags_key` are non-blank and distinct after `validate()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Default slot key for the note collection.
pub const DEFAULT_NOTES_KEY: &str = "NOTES";
/// Default slot key for the tag collection.
pub const DEFAULT_TAGS_KEY: &str = "TAGS";

/// What to do when a slot holds text that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptSlotPolicy {
    /// Log a warning and start from the default value.
    #[default]
    Fallback,
    /// Return `PersistError::Deserialize` to the caller.
    Fail,
}

/// File logging settings, see `logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub dir: String,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            dir: dir.into(),
        }
    }
}

/// Top-level notebook settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub notes_key: String,
    pub tags_key: String,
    pub on_corrupt_slot: CorruptSlotPolicy,
    pub logging: Option<LoggingConfig>,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            notes_key: DEFAULT_NOTES_KEY.to_string(),
            tags_key: DEFAULT_TAGS_KEY.to_string(),
            on_corrupt_slot: CorruptSlotPolicy::default(),
            logging: None,
        }
    }
}

impl NotebookConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    /// Checks slot key invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notes_key.trim().is_empty() {
            return Err(ConfigError::Invalid("notes_key cannot be blank".to_string()));
        }
        if self.tags_key.trim().is_empty() {
            return Err(ConfigError::Invalid("tags_key cannot be blank".to_string()));
        }
        if self.notes_key == self.tags_key {
            return Err(ConfigError::Invalid(format!(
                "notes_key and tags_key must differ, both are `{}`",
                self.notes_key
            )));
        }
        Ok(())
    }
}

/// Configuration load or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

fn default_level() -> String {
    crate::logging::default_log_level().to_string()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CorruptSlotPolicy, NotebookConfig};

    #[test]
    fn empty_document_uses_defaults() {
        let config = NotebookConfig::from_json_str("{}").unwrap();
        assert_eq!(config, NotebookConfig::default());
        assert_eq!(config.notes_key, "NOTES");
        assert_eq!(config.tags_key, "TAGS");
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = NotebookConfig::from_json_str(
            r#"{"tags_key":"labels","on_corrupt_slot":"fail","logging":{"dir":"/tmp/nb"}}"#,
        )
        .unwrap();
        assert_eq!(config.notes_key, "NOTES");
        assert_eq!(config.tags_key, "labels");
        assert_eq!(config.on_corrupt_slot, CorruptSlotPolicy::Fail);
        let logging = config.logging.unwrap();
        assert_eq!(logging.dir, "/tmp/nb");
        assert!(!logging.level.is_empty());
    }

    #[test]
    fn identical_keys_are_rejected() {
        let err =
            NotebookConfig::from_json_str(r#"{"notes_key":"same","tags_key":"same"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = NotebookConfig::from_json_str("{notes_key").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
