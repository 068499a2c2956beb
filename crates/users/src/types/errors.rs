//! Error types for registration, login and token validation.

use thiserror::Error;
use youmeet_database::StorageError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Same message for an unknown email and a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => AuthError::NotFound(what),
            other => AuthError::Persistence(other.to_string()),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_become_persistence_errors() {
        let err = AuthError::from(StorageError::Connection("pool closed".to_string()));
        assert!(matches!(err, AuthError::Persistence(_)));

        let err = AuthError::from(StorageError::NotFound("users".to_string()));
        assert_eq!(err, AuthError::NotFound("users".to_string()));
    }

    #[test]
    fn credential_errors_do_not_leak_details() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "invalid credentials");
    }
}
