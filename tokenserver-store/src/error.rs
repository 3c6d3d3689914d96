//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Invalid config file: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A field has an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
