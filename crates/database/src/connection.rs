//! Backend selection and startup schema creation

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use youmeet_config::{DatabaseBackend, DatabaseConfig};

use crate::entities::all_schemas;
use crate::storage::{PostgresStorage, SharedStorage, SqliteStorage, StorageExt};

/// Build the storage client the configuration selects.
pub async fn connect(config: &DatabaseConfig) -> Result<SharedStorage> {
    let storage: SharedStorage = match config.backend {
        DatabaseBackend::Sqlite => {
            Arc::new(SqliteStorage::connect(&config.url, config.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            Arc::new(PostgresStorage::connect(&config.url, config.max_connections).await?)
        }
    };

    info!(backend = storage.backend_name(), "storage client ready");
    Ok(storage)
}

/// Connect and make sure every application table exists.
pub async fn initialize_storage(config: &DatabaseConfig) -> Result<SharedStorage> {
    let storage = connect(config).await?;
    storage
        .ensure_schema(&all_schemas())
        .await
        .context("failed to create database schema")?;
    Ok(storage)
}
