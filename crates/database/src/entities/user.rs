//! User entity definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{Column, ColumnType, Fields, Record, TableSchema};
use crate::types::{StorageError, StorageResult};

/// Account role, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Company,
    Professional,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Company => "company",
            Role::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of the three known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "company" => Ok(Role::Company),
            "professional" => Ok(Role::Professional),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User entity representing an account in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: super::now(),
        }
    }
}

pub static USERS: TableSchema = TableSchema {
    name: "users",
    columns: &[
        Column::new("id", ColumnType::Uuid).primary_key(),
        Column::new("name", ColumnType::Text),
        Column::new("email", ColumnType::Text).unique(),
        Column::new("password_hash", ColumnType::Text),
        Column::new("role", ColumnType::Text),
        Column::new("created_at", ColumnType::Timestamp),
    ],
};

impl Record for User {
    fn schema() -> &'static TableSchema {
        &USERS
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("id", self.id)
            .with("name", self.name.clone())
            .with("email", self.email.clone())
            .with("password_hash", self.password_hash.clone())
            .with("role", self.role.as_str())
            .with("created_at", self.created_at)
    }

    fn from_fields(fields: Fields) -> StorageResult<Self> {
        let role = fields
            .text("role")?
            .parse::<Role>()
            .map_err(|err| StorageError::Decode(err.to_string()))?;

        Ok(Self {
            id: fields.uuid("id")?,
            name: fields.text("name")?,
            email: fields.text("email")?,
            password_hash: fields.text("password_hash")?,
            role,
            created_at: fields.timestamp("created_at")?,
        })
    }
}
