//! Configuration errors.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Referenced environment variable is not set.
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
