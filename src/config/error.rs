//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying config crate failed to build or deserialize.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors raised by semantic validation of loaded configuration.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required value is missing.
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    /// No AI provider has an API key configured.
    #[error("no AI provider configured: set an API key")]
    NoAiProviderConfigured,

    /// A numeric value is outside its allowed range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// Creates an invalid-value error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
