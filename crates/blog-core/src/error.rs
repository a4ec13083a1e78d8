//! Domain-level error types.

use thiserror::Error;

/// Domain errors - input refused before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
}

/// Backend-level errors - anything the remote database or auth service reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Query(String),

    #[error("Row not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("{0}")]
    Auth(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Message reported by the auth service itself, if this error came from it.
    pub fn auth_message(&self) -> Option<&str> {
        match self {
            BackendError::Auth(msg) => Some(msg),
            _ => None,
        }
    }
}
