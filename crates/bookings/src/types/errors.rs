//! Error types for booking operations.

use thiserror::Error;
use youmeet_database::StorageError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("{0} not found")]
    NotFound(String),

    /// The client id does not belong to an account with the `client` role.
    #[error("invalid client")]
    InvalidClient,

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => BookingError::NotFound(what),
            other => BookingError::Persistence(other.to_string()),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
