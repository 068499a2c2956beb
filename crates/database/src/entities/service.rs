//! Bookable service offered by one or more professionals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::StorageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Length of one appointment, in minutes.
    pub duration: i64,
    pub price: f64,
    pub professional_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(
        name: String,
        description: String,
        duration: i64,
        price: f64,
        professional_ids: Vec<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            duration,
            price,
            professional_ids,
            created_at: super::now(),
        }
    }
}

pub static SERVICES: TableSchema = TableSchema {
    name: "services",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("name", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("duration", ColumnType::Integer),
        Column::new("price", ColumnType::Real),
        Column::new("professional_ids", ColumnType::UuidList),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for Service {
    fn schema() -> &'static TableSchema {
        &SERVICES
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("name", self.name.clone())
            .with("description", self.description.clone())
            .with("duration", self.duration)
            .with("price", self.price)
            .with("professional_ids", self.professional_ids.clone())
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        Ok(Self {
            id: fields.uuid("id")?,
            name: fields.text("name")?,
            description: fields.text("description")?,
            duration: fields.integer("duration")?,
            price: fields.real("price")?,
            professional_ids: fields.uuid_list("professional_ids")?,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
