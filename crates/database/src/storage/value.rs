//! Values exchanged between repositories and storage backends.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    UuidList(Vec<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Uuid>> for Value {
    fn from(value: Vec<Uuid>) -> Self {
        Value::UuidList(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<&'static str, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &'static str, value: impl Into<Value>) {
        self.0.insert(column, value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Value of a column, treating a missing column as NULL.
    pub fn value(&self, column: &str) -> &Value {
        self.0.get(column).unwrap_or(&Value::Null)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&&'static str, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn uuid(&self, column: &str) -> StorageResult<Uuid> {
        self.optional_uuid(column)?
            .ok_or_else(|| missing(column))
    }

    pub fn optional_uuid(&self, column: &str) -> StorageResult<Option<Uuid>> {
        match self.value(column) {
            Value::Null => Ok(None),
            Value::Uuid(id) => Ok(Some(*id)),
            other => Err(mismatch(column, "uuid", other)),
        }
    }

    pub fn text(&self, column: &str) -> StorageResult<String> {
        match self.value(column) {
            Value::Text(text) => Ok(text.clone()),
            Value::Null => Err(missing(column)),
            other => Err(mismatch(column, "text", other)),
        }
    }

    pub fn integer(&self, column: &str) -> StorageResult<i64> {
        match self.value(column) {
            Value::Integer(number) => Ok(*number),
            Value::Null => Err(missing(column)),
            other => Err(mismatch(column, "integer", other)),
        }
    }

    pub fn real(&self, column: &str) -> StorageResult<f64> {
        match self.value(column) {
            Value::Real(number) => Ok(*number),
            Value::Integer(number) => Ok(*number as f64),
            Value::Null => Err(missing(column)),
            other => Err(mismatch(column, "real", other)),
        }
    }

    pub fn timestamp(&self, column: &str) -> StorageResult<DateTime<Utc>> {
        self.optional_timestamp(column)?
            .ok_or_else(|| missing(column))
    }

    pub fn optional_timestamp(&self, column: &str) -> StorageResult<Option<DateTime<Utc>>> {
        match self.value(column) {
            Value::Null => Ok(None),
            Value::Timestamp(at) => Ok(Some(*at)),
            other => Err(mismatch(column, "timestamp", other)),
        }
    }

    pub fn uuid_list(&self, column: &str) -> StorageResult<Vec<Uuid>> {
        match self.value(column) {
            Value::Null => Ok(Vec::new()),
            Value::UuidList(ids) => Ok(ids.clone()),
            other => Err(mismatch(column, "uuid list", other)),
        }
    }
}

fn missing(column: &str) -> StorageError {
    StorageError::Decode(format!("column {column} is null or missing"))
}

fn mismatch(column: &str, expected: &str, found: &Value) -> StorageError {
    StorageError::Decode(format!("column {column}: expected {expected}, found {found:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_values_become_null() {
        let fields = Fields::new()
            .with("company_id", Option::<Uuid>::None)
            .with("name", "Studio");

        assert!(fields.value("company_id").is_null());
        assert_eq!(fields.optional_uuid("company_id").unwrap(), None);
        assert_eq!(fields.text("name").unwrap(), "Studio");
    }

    #[test]
    fn typed_getters_reject_mismatches() {
        let fields = Fields::new().with("duration", 30i64);

        assert_eq!(fields.integer("duration").unwrap(), 30);
        assert_eq!(fields.real("duration").unwrap(), 30.0);
        assert!(matches!(fields.text("duration"), Err(StorageError::Decode(_))));
        assert!(matches!(fields.uuid("missing"), Err(StorageError::Decode(_))));
    }

    #[test]
    fn missing_uuid_list_decodes_as_empty() {
        let fields = Fields::new();
        assert!(fields.uuid_list("professional_ids").unwrap().is_empty());
    }
}
