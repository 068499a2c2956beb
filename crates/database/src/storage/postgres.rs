//! PostgreSQL backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::query::{self, Conditions, Dialect};
use super::schema::{ColumnType, TableSchema};
use super::value::{Fields, Value};
use super::{SharedStorage, StorageClient};
use crate::types::{StorageError, StorageResult};

/// Storage client over a PostgreSQL pool, using native UUID, TIMESTAMPTZ and array types.
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
    scope: Conditions,
}

impl PostgresStorage {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await
            .context("failed to connect to postgres")?;

        info!("postgres connection established");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            scope: Conditions::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StorageClient for PostgresStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn filtered(&self, conditions: Conditions) -> SharedStorage {
        Arc::new(Self {
            pool: self.pool.clone(),
            scope: self.scope.clone().and(conditions),
        })
    }

    async fn insert(&self, schema: &'static TableSchema, fields: Fields) -> StorageResult<()> {
        let statement = query::insert(schema, &fields, Dialect::Postgres)?;
        let mut query = sqlx::query(&statement.sql);
        for (value, ty) in statement.params {
            query = bind(query, value, ty);
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
        let statement = query::select(schema, &conditions, limit, Dialect::Postgres)?;
        let mut query = sqlx::query(&statement.sql);
        for (value, ty) in statement.params {
            query = bind(query, value, ty);
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
        let statement = query::delete(schema, &conditions, Dialect::Postgres)?;
        let mut query = sqlx::query(&statement.sql);
        for (value, ty) in statement.params {
            query = bind(query, value, ty);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ensure_table(&self, schema: &'static TableSchema) -> StorageResult<()> {
        for sql in query::create_table(schema, Dialect::Postgres) {
            sqlx::query(&sql)
                .execute(&self.pool)
                .await
                .map_err(|err| StorageError::Schema(format!("{}: {err}", schema.name)))?;
        }
        info!(table = schema.name, "postgres table ready");
        Ok(())
    }
}

fn bind<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: Value,
    ty: ColumnType,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => match ty {
            ColumnType::Uuid => query.bind(None::<Uuid>),
            ColumnType::Text => query.bind(None::<String>),
            ColumnType::Integer => query.bind(None::<i64>),
            ColumnType::Real => query.bind(None::<f64>),
            ColumnType::Timestamp => query.bind(None::<DateTime<Utc>>),
            ColumnType::UuidList => query.bind(None::<Vec<Uuid>>),
        },
        Value::Text(text) => query.bind(text),
        Value::Integer(number) => query.bind(number),
        Value::Real(number) => query.bind(number),
        Value::Uuid(id) => query.bind(id),
        Value::Timestamp(at) => query.bind(at),
        Value::UuidList(ids) => query.bind(ids),
    }
}

fn decode_row(schema: &'static TableSchema, row: &PgRow) -> StorageResult<Fields> {
    let mut fields = Fields::new();
    for column in schema.columns {
        let name = column.name;
        let value: Value = match column.ty {
            ColumnType::Uuid => row.try_get::<Option<Uuid>, _>(name)?.into(),
            ColumnType::Text => row.try_get::<Option<String>, _>(name)?.into(),
            ColumnType::Integer => row.try_get::<Option<i64>, _>(name)?.into(),
            ColumnType::Real => row.try_get::<Option<f64>, _>(name)?.into(),
            ColumnType::Timestamp => row.try_get::<Option<DateTime<Utc>>, _>(name)?.into(),
            ColumnType::UuidList => row.try_get::<Option<Vec<Uuid>>, _>(name)?.into(),
        };
        fields.insert(name, value);
    }
    Ok(fields)
}
