//! Error types for the storage layer

use thiserror::Error;

/// Error raised by a storage client or a repository.
///
/// Everything except [`StorageError::NotFound`] is a persistence failure from
/// the caller's point of view.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Database schema error: {0}")]
    Schema(String),

    #[error("Failed to decode stored value: {0}")]
    Decode(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StorageError::Duplicate(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StorageError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StorageError::Connection(err.to_string()),
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => StorageError::Decode(err.to_string()),
            _ => StorageError::Query(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn pool_errors_map_to_connection() {
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolTimedOut),
            StorageError::Connection(_)
        ));
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolClosed),
            StorageError::Connection(_)
        ));
    }

    #[test]
    fn error_messages() {
        let err = StorageError::Duplicate("users.email".to_string());
        assert_eq!(err.to_string(), "Duplicate entity: users.email");
        assert!(err.is_duplicate());
        assert!(!err.is_not_found());
    }
}
