//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised by domain entities.
///
/// These are programmer or data errors, not transient conditions: a caller
/// hitting one of these has constructed an invalid value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A turn carried a role outside {system, user, assistant}.
    ///
    /// The `Role` enum makes this unrepresentable in-process; the error
    /// surfaces when deserializing a persisted record with an unknown
    /// role string.
    #[error("invalid role '{role}': must be one of system, user, assistant")]
    InvalidRole { role: String },

    /// A value failed construction-time validation.
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },
}

impl DomainError {
    /// Creates an invalid-role error.
    pub fn invalid_role(role: impl Into<String>) -> Self {
        Self::InvalidRole { role: role.into() }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
