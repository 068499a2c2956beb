//! Server-side login session. The token is opaque to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::StorageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// New session for `user_id` with a random token.
    pub fn issue(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: super::now(),
        }
    }
}

pub static SESSIONS: TableSchema = TableSchema {
    name: "sessions",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("token", ColumnType::Text).unique(),
        Column::new("user_id", ColumnType::Uuid).indexed(),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for Session {
    fn schema() -> &'static TableSchema {
        &SESSIONS
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("token", self.token.clone())
            .with("user_id", self.user_id)
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        Ok(Self {
            id: fields.uuid("id")?,
            token: fields.text("token")?,
            user_id: fields.uuid("user_id")?,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
