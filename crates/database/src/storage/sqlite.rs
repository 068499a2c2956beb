//! SQLite backend.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Row, Sqlite, SqlitePool};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use super::query::{self, Conditions, Dialect};
use super::schema::{ColumnType, TableSchema};
use super::value::{Fields, Value};
use super::{SharedStorage, StorageClient};
use crate::types::{StorageError, StorageResult};

const MEMORY_PATH: &str = ":memory:";

/// Storage client over a SQLite file.
///
/// UUIDs and timestamps are stored as text, UUID lists as a JSON array.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    scope: Conditions,
}

impl SqliteStorage {
    /// Open (creating if needed) the database behind a `sqlite://` or `sqlite:` URL.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let path = sqlite_path(url);
        let in_memory = path == MEMORY_PATH;
        if !in_memory {
            ensure_parent_dir(path).await?;
        }

        let base = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .context("invalid in-memory sqlite options")?
        } else {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };
        let options = base
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // Every in-memory connection is its own database, so the single
        // connection must never be reaped or recycled.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to sqlite database {url}"))?;

        info!(path, "sqlite connection established");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            scope: Conditions::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StorageClient for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn filtered(&self, conditions: Conditions) -> SharedStorage {
        Arc::new(Self {
            pool: self.pool.clone(),
            scope: self.scope.clone().and(conditions),
        })
    }

    async fn insert(&self, schema: &'static TableSchema, fields: Fields) -> StorageResult<()> {
        let statement = query::insert(schema, &fields, Dialect::Sqlite)?;
        let mut query = sqlx::query(&statement.sql);
        for (value, ty) in statement.params {
            query = bind(query, value, ty)?;
        }
        query.execute(&self.pool).await?;
        debug!(table = schema.name, "row inserted");
        Ok(())
    }

    async fn select(
        &self,
        schema: &'static TableSchema,
        conditions: &Conditions,
        limit: Option<usize>,
    ) -> StorageResult<Vec<Fields>> {
        let conditions = self.scope.clone().and(conditions.clone());
        let statement = query::select(schema, &conditions, limit, Dialect::Sqlite)?;
        let mut query = sqlx::query(&statement.sql);
        for (value, ty) in statement.params {
            query = bind(query, value, ty)?;
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|row| decode_row(schema, row)).collect()
    }

    async fn remove(
        &self,
        schema: &'static TableSchema,
        conditions: &Conditions,
    ) -> StorageResult<u64> {
        let conditions = self.scope.clone().and(conditions.clone());
        let statement = query::delete(schema, &conditions, Dialect::Sqlite)?;
        let mut query = sqlx::query(&statement.sql);
        for (value, ty) in statement.params {
            query = bind(query, value, ty)?;
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ensure_table(&self, schema: &'static TableSchema) -> StorageResult<()> {
        for sql in query::create_table(schema, Dialect::Sqlite) {
            sqlx::query(&sql)
                .execute(&self.pool)
                .await
                .map_err(|err| StorageError::Schema(format!("{}: {err}", schema.name)))?;
        }
        info!(table = schema.name, "sqlite table ready");
        Ok(())
    }
}

fn sqlite_path(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

async fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create sqlite directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn bind<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: Value,
    ty: ColumnType,
) -> StorageResult<Query<'q, Sqlite, SqliteArguments<'q>>> {
    let query = match value {
        Value::Null => match ty {
            ColumnType::Integer => query.bind(None::<i64>),
            ColumnType::Real => query.bind(None::<f64>),
            _ => query.bind(None::<String>),
        },
        Value::Text(text) => query.bind(text),
        Value::Integer(number) => query.bind(number),
        Value::Real(number) => query.bind(number),
        Value::Uuid(id) => query.bind(id.to_string()),
        Value::Timestamp(at) => query.bind(format_timestamp(&at)),
        Value::UuidList(ids) => query.bind(serde_json::to_string(&ids)?),
    };
    Ok(query)
}

fn decode_row(schema: &'static TableSchema, row: &SqliteRow) -> StorageResult<Fields> {
    let mut fields = Fields::new();
    for column in schema.columns {
        let name = column.name;
        let value = match column.ty {
            ColumnType::Integer => row.try_get::<Option<i64>, _>(name)?.into(),
            ColumnType::Real => row.try_get::<Option<f64>, _>(name)?.into(),
            ColumnType::Text => row.try_get::<Option<String>, _>(name)?.into(),
            ColumnType::Uuid => match row.try_get::<Option<String>, _>(name)? {
                Some(raw) => Value::Uuid(Uuid::parse_str(&raw).map_err(|err| {
                    StorageError::Decode(format!("{}.{name}: {err}", schema.name))
                })?),
                None => Value::Null,
            },
            ColumnType::Timestamp => match row.try_get::<Option<String>, _>(name)? {
                Some(raw) => Value::Timestamp(
                    DateTime::parse_from_rfc3339(&raw)
                        .map_err(|err| {
                            StorageError::Decode(format!("{}.{name}: {err}", schema.name))
                        })?
                        .with_timezone(&Utc),
                ),
                None => Value::Null,
            },
            ColumnType::UuidList => match row.try_get::<Option<String>, _>(name)? {
                Some(raw) => Value::UuidList(serde_json::from_str(&raw)?),
                None => Value::Null,
            },
        };
        fields.insert(name, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::Column;
    use crate::storage::StorageExt;
    use chrono::TimeZone;
    use tempfile::TempDir;

    static NOTES: TableSchema = TableSchema {
        name: "notes",
        columns: &[
            Column::new("id", ColumnType::Uuid).primary_key(),
            Column::new("slug", ColumnType::Text).unique(),
            Column::new("owner_id", ColumnType::Uuid).nullable().indexed(),
            Column::new("weight", ColumnType::Real),
            Column::new("tags", ColumnType::UuidList),
            Column::new("written_at", ColumnType::Timestamp),
        ],
    };

    async fn open(dir: &TempDir) -> SqliteStorage {
        let url = format!("sqlite://{}", dir.path().join("nested/notes.db").display());
        let storage = SqliteStorage::connect(&url, 2).await.unwrap();
        storage.ensure_schema(&[&NOTES]).await.unwrap();
        storage
    }

    fn note(slug: &str, owner: Option<Uuid>) -> Fields {
        Fields::new()
            .with("id", Uuid::new_v4())
            .with("slug", slug)
            .with("owner_id", owner)
            .with("weight", 1.5)
            .with("tags", vec![Uuid::new_v4(), Uuid::new_v4()])
            .with(
                "written_at",
                Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
            )
    }

    #[tokio::test]
    async fn creates_database_file_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let _storage = open(&dir).await;
        assert!(dir.path().join("nested/notes.db").exists());
    }

    #[tokio::test]
    async fn rows_survive_a_round_trip_through_sqlite() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;
        let row = note("first", None);

        storage.insert(&NOTES, row.clone()).await.unwrap();
        let found = storage
            .select(&NOTES, &Conditions::new().eq("slug", "first"), None)
            .await
            .unwrap();

        assert_eq!(found, vec![row]);
    }

    #[tokio::test]
    async fn unique_violation_is_reported_as_duplicate() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;

        storage.insert(&NOTES, note("same", None)).await.unwrap();
        let err = storage.insert(&NOTES, note("same", None)).await.unwrap_err();

        assert!(err.is_duplicate(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn filtered_client_only_sees_its_scope() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;
        let owner = Uuid::new_v4();

        storage.insert(&NOTES, note("mine", Some(owner))).await.unwrap();
        storage.insert(&NOTES, note("orphan", None)).await.unwrap();

        let scoped = storage.filtered(Conditions::new().eq("owner_id", owner));
        let rows = scoped.select(&NOTES, &Conditions::new(), None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("slug").unwrap(), "mine");

        let removed = scoped
            .remove(&NOTES, &Conditions::new().eq("slug", "orphan"))
            .await
            .unwrap();
        assert_eq!(removed, 0);

        let orphans = storage
            .select(&NOTES, &Conditions::new().is_null("owner_id"), None)
            .await
            .unwrap();
        assert_eq!(orphans.len(), 1);
    }

    #[tokio::test]
    async fn in_memory_url_is_supported() {
        let storage = SqliteStorage::connect("sqlite://:memory:", 8).await.unwrap();
        storage.ensure_schema(&[&NOTES]).await.unwrap();
        storage.insert(&NOTES, note("memo", None)).await.unwrap();

        let rows = storage.select(&NOTES, &Conditions::new(), None).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn in_memory_connection_is_pinned_for_the_pool_lifetime() {
        let storage = SqliteStorage::connect("sqlite://:memory:", 8).await.unwrap();
        let options = storage.pool().options();
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert!(options.get_idle_timeout().is_none());
        assert!(options.get_max_lifetime().is_none());

        storage.ensure_schema(&[&NOTES]).await.unwrap();
        storage.insert(&NOTES, note("first", None)).await.unwrap();
        storage.insert(&NOTES, note("second", None)).await.unwrap();
        let rows = storage.select(&NOTES, &Conditions::new(), None).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn file_backed_pool_keeps_the_requested_size() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;
        assert_eq!(storage.pool().options().get_max_connections(), 2);
        assert!(storage.pool().options().get_idle_timeout().is_some());
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;
        storage.ensure_schema(&[&NOTES]).await.unwrap();
    }
}
