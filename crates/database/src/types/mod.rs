//! Shared types and result types for the storage layer

pub mod errors;

pub use errors::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;
