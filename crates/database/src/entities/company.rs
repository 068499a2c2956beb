//! Company profile owned by a `company` account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::StorageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(user_id: Uuid, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            created_at: super::now(),
        }
    }
}

pub static COMPANIES: TableSchema = TableSchema {
    name: "companies",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("user_id", ColumnType::Uuid).indexed(),
        Column::new("name", ColumnType::Text),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for Company {
    fn schema() -> &'static TableSchema {
        &COMPANIES
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("user_id", self.user_id)
            .with("name", self.name.clone())
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        Ok(Self {
            id: fields.uuid("id")?,
            user_id: fields.uuid("user_id")?,
            name: fields.text("name")?,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
