use thiserror::Error;
use user_addresses_sdk::{AddressKey, FieldViolation, UserAddressesError};

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {}", join_violations(.violations))]
    Validation { violations: Vec<FieldViolation> },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Database error: {message}")]
    Persistence { message: String },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            violations: vec![FieldViolation::new(field, message)],
        }
    }

    #[must_use]
    pub fn user_not_found(id: i32) -> Self {
        Self::NotFound {
            message: format!("User not found: {id}"),
        }
    }

    #[must_use]
    pub fn address_not_found(key: &AddressKey) -> Self {
        Self::NotFound {
            message: format!("Address not found: {}", key.display_id()),
        }
    }

    pub fn email_already_exists(email: &str) -> Self {
        Self::Conflict {
            message: format!("User with email '{email}' already exists"),
        }
    }

    #[must_use]
    pub fn address_key_exists(key: &AddressKey) -> Self {
        Self::Conflict {
            message: format!(
                "An address of type {} valid from {} already exists for user {}",
                key.address_type,
                key.valid_from,
                key.user_id
            ),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for UserAddressesError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::Validation { violations } => UserAddressesError::validation(violations),
            DomainError::NotFound { message } => UserAddressesError::not_found(message),
            DomainError::Conflict { message } => UserAddressesError::conflict(message),
            DomainError::Persistence { message } => {
                tracing::error!(error = %message, "Storage failure");
                UserAddressesError::persistence()
            }
        }
    }
}

/// SDK helpers (e.g. display id parsing) report through `UserAddressesError`.
impl From<UserAddressesError> for DomainError {
    fn from(e: UserAddressesError) -> Self {
        match e {
            UserAddressesError::Validation { violations, .. } => Self::Validation { violations },
            UserAddressesError::NotFound { message } => Self::NotFound { message },
            UserAddressesError::Conflict { message } => Self::Conflict { message },
            UserAddressesError::Persistence => Self::persistence("internal error"),
        }
    }
}
