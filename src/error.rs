//! Error types for Review Lens.
//!
//! Interpretation and formatting never fail; errors only come from the
//! configuration layer and from data sources.

use thiserror::Error;

/// Main error type for Review Lens operations.
#[derive(Error, Debug)]
pub enum ReviewLensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by a review data source.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Failed to load reviews from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Invalid review record: {0}")]
    InvalidRecord(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Result type alias for Review Lens operations.
pub type Result<T> = std::result::Result<T, ReviewLensError>;
