//! Recurring weekly availability window of a professional.
//!
//! Windows are declared only; booking does not consult them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::StorageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: String,
    /// Time of day, e.g. `09:00`.
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

impl Availability {
    pub fn new(
        professional_id: Uuid,
        day_of_week: String,
        start_time: String,
        end_time: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            professional_id,
            day_of_week,
            start_time,
            end_time,
            created_at: super::now(),
        }
    }
}

pub static AVAILABILITIES: TableSchema = TableSchema {
    name: "availabilities",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("professional_id", ColumnType::Uuid).indexed(),
        Column::new("day_of_week", ColumnType::Text),
        Column::new("start_time", ColumnType::Text),
        Column::new("end_time", ColumnType::Text),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for Availability {
    fn schema() -> &'static TableSchema {
        &AVAILABILITIES
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("professional_id", self.professional_id)
            .with("day_of_week", self.day_of_week.clone())
            .with("start_time", self.start_time.clone())
            .with("end_time", self.end_time.clone())
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        Ok(Self {
            id: fields.uuid("id")?,
            professional_id: fields.uuid("professional_id")?,
            day_of_week: fields.text("day_of_week")?,
            start_time: fields.text("start_time")?,
            end_time: fields.text("end_time")?,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
