//! Professional profile. `company_id == None` marks an independent practitioner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::StorageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Professional {
    pub fn independent(user_id: Uuid, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            company_id: None,
            created_at: super::now(),
        }
    }

    pub fn with_company(mut self, company_id: Uuid) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn is_independent(&self) -> bool {
        self.company_id.is_none()
    }
}

pub static PROFESSIONALS: TableSchema = TableSchema {
    name: "professionals",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("user_id", ColumnType::Uuid).indexed(),
        Column::new("name", ColumnType::Text),
        Column::new("company_id", ColumnType::Uuid).nullable().indexed(),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for Professional {
    fn schema() -> &'static TableSchema {
        &PROFESSIONALS
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("user_id", self.user_id)
            .with("name", self.name.clone())
            .with("company_id", self.company_id)
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        Ok(Self {
            id: fields.uuid("id")?,
            user_id: fields.uuid("user_id")?,
            name: fields.text("name")?,
            company_id: fields.optional_uuid("company_id")?,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
