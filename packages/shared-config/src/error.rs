//! Configuration error types

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable present but not parseable
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Values parse individually but make no sense together
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
