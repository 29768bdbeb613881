//! Configuration settings for Review Lens.

use crate::error::{ConfigError, Result};
use crate::query::{ConfidenceFloor, DEFAULT_CONTEXT_CAPACITY, LOW_CONFIDENCE_THRESHOLD};
use crate::response::Persona;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interpreter: InterpreterConfig,
    pub formatter: FormatterConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("review-lens.toml"),
            PathBuf::from("config.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("review-lens/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.interpreter.context_capacity == 0 {
            return Err(
                ConfigError::Invalid("interpreter.context_capacity must be > 0".to_string()).into(),
            );
        }

        let threshold = self.interpreter.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "interpreter.low_confidence_threshold must be within 0..=1, got {}",
                threshold
            ))
            .into());
        }

        if let Some(ref path) = self.store.data_path {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid("store.data_path is empty".to_string()).into());
            }
        }

        Ok(())
    }

    /// The review data file with a leading `~` expanded, if configured.
    pub fn data_path(&self) -> Option<PathBuf> {
        self.store.data_path.as_deref().map(expand_tilde)
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Interpreter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum number of intents kept in a conversation context
    pub context_capacity: usize,
    /// Whether confidence is clamped at zero
    pub confidence_floor: ConfidenceFloor,
    /// Confidence below which the executor warns and offers suggestions
    pub low_confidence_threshold: f64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
            confidence_floor: ConfidenceFloor::default(),
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Formatter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Persona used when a request names none
    pub default_persona: Persona,
}

/// Review store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON array of review records; the built-in demo data is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}
