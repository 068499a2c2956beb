//! Storage client abstraction.
//!
//! Repositories talk to a [`StorageClient`] and never to a concrete engine, so
//! the same domain code runs on SQLite, PostgreSQL or the in-memory backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::types::{StorageError, StorageResult};

pub mod memory;
pub mod postgres;
pub mod query;
pub mod schema;
pub mod sqlite;
pub mod value;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;
pub use query::{Condition, Conditions, Dialect};
pub use schema::{Column, ColumnType, TableSchema};
pub use sqlite::SqliteStorage;
pub use value::{Fields, Value};

/// Process-wide handle to the storage backend.
pub type SharedStorage = Arc<dyn StorageClient>;

/// Minimal CRUD and schema capability set every backend provides.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str;

    /// A client whose every read and delete is additionally restricted by `conditions`.
    fn filtered(&self, conditions: Conditions) -> SharedStorage;

    /// Persist one row. Constraint violations surface as [`StorageError::Duplicate`].
    async fn insert(&self, schema: &'static TableSchema, fields: Fields) -> StorageResult<()>;

    /// Rows matching `conditions` (and the client scope), at most `limit` of them.
    async fn select(
        &self,
        schema: &'static TableSchema,
        conditions: &Conditions,
        limit: Option<usize>,
    ) -> StorageResult<Vec<Fields>>;

    /// Delete matching rows and return how many went away.
    async fn remove(&self, schema: &'static TableSchema, conditions: &Conditions)
        -> StorageResult<u64>;

    /// Create the physical table for `schema` if it does not exist yet.
    async fn ensure_table(&self, schema: &'static TableSchema) -> StorageResult<()>;
}

/// An entity that can be stored through a [`StorageClient`].
pub trait Record: Sized + Send + Sync {
    fn schema() -> &'static TableSchema;
    fn to_fields(&self) -> Fields;
    fn from_fields(fields: Fields) -> StorageResult<Self>;
}

/// Typed operations layered on top of [`StorageClient`].
#[async_trait]
pub trait StorageExt: StorageClient {
    async fn create<R: Record>(&self, record: &R) -> StorageResult<()> {
        self.insert(R::schema(), record.to_fields()).await
    }

    /// First matching record, or [`StorageError::NotFound`].
    async fn find_one<R: Record>(&self, conditions: Conditions) -> StorageResult<R> {
        let schema = R::schema();
        let mut rows = self.select(schema, &conditions, Some(1)).await?;
        match rows.pop() {
            Some(fields) => R::from_fields(fields),
            None => Err(StorageError::NotFound(format!(
                "{} where {}",
                schema.name, conditions
            ))),
        }
    }

    /// Every matching record; empty when nothing matches.
    async fn find_all<R: Record>(&self, conditions: Conditions) -> StorageResult<Vec<R>> {
        self.select(R::schema(), &conditions, None)
            .await?
            .into_iter()
            .map(R::from_fields)
            .collect()
    }

    /// Delete matching records. Deleting nothing is not an error.
    async fn delete<R: Record>(&self, conditions: Conditions) -> StorageResult<u64> {
        self.remove(R::schema(), &conditions).await
    }

    /// Create every table in `schemas`. Run once at startup, before serving writes.
    async fn ensure_schema(&self, schemas: &[&'static TableSchema]) -> StorageResult<()> {
        for schema in schemas {
            self.ensure_table(schema).await?;
        }
        info!(
            backend = self.backend_name(),
            tables = schemas.len(),
            "storage schema ensured"
        );
        Ok(())
    }
}

impl<S: StorageClient + ?Sized> StorageExt for S {}
