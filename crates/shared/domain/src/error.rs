//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identifier does not have the storage identifier shape
    #[error("Invalid user ID: {0}")]
    InvalidIdentifier(String),

    /// A field failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Password does not satisfy the strength policy
    #[error(
        "Password isn't strong enough, it should have at least 8 characters, one uppercase \
         letter, one lowercase letter, one number and one special character"
    )]
    WeakPassword,

    /// Entity not found
    #[error("User not found")]
    NotFound,

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        DomainError::InvalidIdentifier(id.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        DomainError::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
