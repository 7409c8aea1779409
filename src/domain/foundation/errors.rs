//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised when a domain rule is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates an empty field error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        DomainError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid state transition error.
    pub fn invalid_transition(reason: impl Into<String>) -> Self {
        DomainError::InvalidStateTransition(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_field_name() {
        let err = DomainError::empty_field("query");
        assert_eq!(err.to_string(), "Field 'query' cannot be empty");
    }

    #[test]
    fn invalid_transition_displays_reason() {
        let err = DomainError::invalid_transition("Done -> ExecutingTools");
        assert!(err.to_string().contains("Done -> ExecutingTools"));
    }
}
