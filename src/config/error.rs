//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Reply timeout must be at least 1s and below the request timeout")]
    InvalidReplyTimeout,

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Unknown tool in enabled_tools: {0}")]
    UnknownTool(String),

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Failed to read instructions file {path}: {reason}")]
    InstructionsUnreadable { path: String, reason: String },
}
