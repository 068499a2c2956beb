//! Appointment entity definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::{StorageError, StorageResult};

/// Appointment lifecycle state. New appointments start as `scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            other => Err(StorageError::Decode(format!(
                "unknown appointment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// A freshly scheduled appointment.
    pub fn scheduled(
        client_id: Uuid,
        professional_id: Option<Uuid>,
        service_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            professional_id,
            service_id,
            start_time,
            end_time,
            status: AppointmentStatus::Scheduled,
            created_at: super::now(),
        }
    }
}

pub static APPOINTMENTS: TableSchema = TableSchema {
    name: "appointments",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("client_id", ColumnType::Uuid).indexed(),
        Column::new("professional_id", ColumnType::Uuid).nullable().indexed(),
        Column::new("service_id", ColumnType::Uuid),
        Column::new("start_time", ColumnType::Timestamp),
        Column::new("end_time", ColumnType::Timestamp),
        Column::new("status", ColumnType::Text),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for Appointment {
    fn schema() -> &'static TableSchema {
        &APPOINTMENTS
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("client_id", self.client_id)
            .with("professional_id", self.professional_id)
            .with("service_id", self.service_id)
            .with("start_time", self.start_time)
            .with("end_time", self.end_time)
            .with("status", self.status.as_str())
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        Ok(Self {
            id: fields.uuid("id")?,
            client_id: fields.uuid("client_id")?,
            professional_id: fields.optional_uuid("professional_id")?,
            service_id: fields.uuid("service_id")?,
            start_time: fields.timestamp("start_time")?,
            end_time: fields.timestamp("end_time")?,
            status: fields.text("status")?.parse()?,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
