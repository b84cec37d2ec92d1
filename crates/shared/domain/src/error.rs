//! Rule violations raised by the domain model.
//!
//! Nothing here knows about HTTP or the database; `common::AppError` maps
//! these onto responses.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Member status, leave or shift moved along an edge that does not exist
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Password too weak or too long
    #[error("Password error: {0}")]
    Password(String),

    /// Hashing backend failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        DomainError::InvalidTransition(msg.into())
    }

    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
