//! Public error types for the `user_addresses` module.
//!
//! These errors are safe to expose to other modules and consumers. Storage
//! details never appear in them.

use std::fmt;

use thiserror::Error;

/// A single violated field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can be returned by the `UserAddressesClientV1`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserAddressesError {
    /// The input failed validation; every violated rule is listed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        violations: Vec<FieldViolation>,
    },

    /// The referenced user or address does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// A uniqueness rule (email or address key) would be violated.
    #[error("{message}")]
    Conflict { message: String },

    /// An unexpected storage failure.
    #[error("Internal error")]
    Persistence,
}

impl UserAddressesError {
    /// Create a Validation error from its violations.
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        let message = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation {
            message,
            violations,
        }
    }

    /// Create a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a Persistence error.
    #[must_use]
    pub fn persistence() -> Self {
        Self::Persistence
    }
}
