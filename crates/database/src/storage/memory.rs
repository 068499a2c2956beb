//! In-process backend used by tests and local tooling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::query::Conditions;
use super::schema::TableSchema;
use super::value::Fields;
use super::{SharedStorage, StorageClient};
use crate::types::{StorageError, StorageResult};

type Tables = HashMap<&'static str, Vec<Fields>>;

/// Storage client keeping every table in memory.
///
/// Enforces the same unique and NOT NULL constraints the SQL backends declare,
/// so repository behaviour stays identical. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
    scope: Conditions,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_table(tables: &Tables, schema: &TableSchema) -> StorageResult<()> {
        if tables.contains_key(schema.name) {
            Ok(())
        } else {
            Err(StorageError::Query(format!("no such table: {}", schema.name)))
        }
    }
}

#[async_trait]
impl StorageClient for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn filtered(&self, conditions: Conditions) -> SharedStorage {
        Arc::new(Self {
            tables: Arc::clone(&self.tables),
            scope: self.scope.clone().and(conditions),
        })
    }

    async fn insert(&self, schema: &'static TableSchema, fields: Fields) -> StorageResult<()> {
        for (column, _) in fields.iter() {
            if schema.column(column).is_none() {
                return Err(StorageError::Query(format!(
                    "unknown column {column} on table {}",
                    schema.name
                )));
            }
        }

        let mut tables = self.tables.write().await;
        Self::check_table(&tables, schema)?;

        for column in schema.columns {
            if !column.nullable && !column.primary_key && fields.value(column.name).is_null() {
                return Err(StorageError::Query(format!(
                    "NOT NULL constraint failed: {}.{}",
                    schema.name, column.name
                )));
            }
        }

        let rows = tables.entry(schema.name).or_default();
        for column in schema.columns.iter().filter(|column| column.is_unique()) {
            let candidate = fields.value(column.name);
            if candidate.is_null() {
                continue;
            }
            if rows.iter().any(|row| row.value(column.name) == candidate) {
                return Err(StorageError::Duplicate(format!(
                    "UNIQUE constraint failed: {}.{}",
                    schema.name, column.name
                )));
            }
        }

        let mut row = Fields::new();
        for column in schema.columns {
            row.insert(column.name, fields.value(column.name).clone());
        }
        rows.push(row);
        Ok(())
    }

    async fn select(
        &self,
        schema: &'static TableSchema,
        conditions: &Conditions,
        limit: Option<usize>,
    ) -> StorageResult<Vec<Fields>> {
        let conditions = self.scope.clone().and(conditions.clone());
        conditions.validate(schema)?;

        let tables = self.tables.read().await;
        Self::check_table(&tables, schema)?;

        let matching = tables
            .get(schema.name)
            .into_iter()
            .flatten()
            .filter(|row| conditions.matches(row))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn remove(
        &self,
        schema: &'static TableSchema,
        conditions: &Conditions,
    ) -> StorageResult<u64> {
        let conditions = self.scope.clone().and(conditions.clone());
        conditions.validate(schema)?;

        let mut tables = self.tables.write().await;
        Self::check_table(&tables, schema)?;

        let rows = tables.entry(schema.name).or_default();
        let before = rows.len();
        rows.retain(|row| !conditions.matches(row));
        Ok((before - rows.len()) as u64)
    }

    async fn ensure_table(&self, schema: &'static TableSchema) -> StorageResult<()> {
        self.tables.write().await.entry(schema.name).or_default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::{Column, ColumnType};
    use crate::storage::{StorageExt, Value};
    use uuid::Uuid;

    static TAGS: TableSchema = TableSchema {
        name: "tags",
        columns: &[
            Column::new("id", ColumnType::Uuid).primary_key(),
            Column::new("label", ColumnType::Text).unique(),
            Column::new("parent_id", ColumnType::Uuid).nullable(),
        ],
    };

    async fn storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.ensure_schema(&[&TAGS]).await.unwrap();
        storage
    }

    fn tag(label: &str) -> Fields {
        Fields::new().with("id", Uuid::new_v4()).with("label", label)
    }

    #[tokio::test]
    async fn missing_table_is_a_query_error() {
        let storage = MemoryStorage::new();
        let err = storage.insert(&TAGS, tag("x")).await.unwrap_err();
        assert!(matches!(err, StorageError::Query(_)));
    }

    #[tokio::test]
    async fn unique_columns_are_enforced() {
        let storage = storage().await;
        storage.insert(&TAGS, tag("rust")).await.unwrap();

        let err = storage.insert(&TAGS, tag("rust")).await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn not_null_columns_are_enforced() {
        let storage = storage().await;
        let err = storage
            .insert(&TAGS, Fields::new().with("id", Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Query(_)));
    }

    #[tokio::test]
    async fn missing_nullable_columns_read_back_as_null() {
        let storage = storage().await;
        storage.insert(&TAGS, tag("root")).await.unwrap();

        let rows = storage
            .select(&TAGS, &Conditions::new().is_null("parent_id"), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("parent_id"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn limit_and_remove() {
        let storage = storage().await;
        for label in ["a", "b", "c"] {
            storage.insert(&TAGS, tag(label)).await.unwrap();
        }

        let limited = storage.select(&TAGS, &Conditions::new(), Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);

        let removed = storage
            .remove(&TAGS, &Conditions::new().eq("label", "b"))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            storage.select(&TAGS, &Conditions::new(), None).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn filtered_views_share_data() {
        let storage = storage().await;
        let parent = Uuid::new_v4();
        storage
            .insert(&TAGS, tag("child").with("parent_id", parent))
            .await
            .unwrap();
        storage.insert(&TAGS, tag("other")).await.unwrap();

        let scoped = storage.filtered(Conditions::new().eq("parent_id", parent));
        let rows = scoped.select(&TAGS, &Conditions::new(), None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("label").unwrap(), "child");
    }
}
