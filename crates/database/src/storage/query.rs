//! Composable predicates and their SQL rendering.
//!
//! Values never end up in the SQL text: every comparison becomes a bound
//! parameter and column names are checked against the table schema.

use std::fmt;

use super::schema::{ColumnType, TableSchema};
use super::value::{Fields, Value};
use crate::types::{StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(&'static str, Value),
    IsNull(&'static str),
}

impl Condition {
    pub fn column(&self) -> &'static str {
        match self {
            Condition::Eq(column, _) | Condition::IsNull(column) => *column,
        }
    }

    fn matches(&self, fields: &Fields) -> bool {
        match self {
            Condition::Eq(column, Value::Null) | Condition::IsNull(column) => {
                fields.value(column).is_null()
            }
            Condition::Eq(column, expected) => fields.value(column) == expected,
        }
    }
}

/// A conjunction of conditions.
///
/// ```
/// use youmeet_database::storage::Conditions;
///
/// let scope = Conditions::new().eq("role", "client");
/// let query = scope.and(Conditions::new().is_null("company_id"));
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    clauses: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.clauses.push(Condition::Eq(column, value.into()));
        self
    }

    pub fn is_null(mut self, column: &'static str) -> Self {
        self.clauses.push(Condition::IsNull(column));
        self
    }

    pub fn and(mut self, other: Conditions) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.clauses.iter()
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        self.clauses.iter().all(|clause| clause.matches(fields))
    }

    /// Fails when a condition names a column the table does not have.
    pub fn validate(&self, schema: &TableSchema) -> StorageResult<()> {
        for clause in &self.clauses {
            if schema.column(clause.column()).is_none() {
                return Err(StorageError::Query(format!(
                    "unknown column {} on table {}",
                    clause.column(),
                    schema.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "<all>");
        }
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| match clause {
                Condition::Eq(column, Value::Null) | Condition::IsNull(column) => {
                    format!("{column} IS NULL")
                }
                Condition::Eq(column, value) => format!("{column} = {value:?}"),
            })
            .collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

/// SQL flavour of a relational backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Sqlite => "?".to_string(),
            Dialect::Postgres => format!("${index}"),
        }
    }

    fn column_type(&self, ty: ColumnType) -> &'static str {
        match (self, ty) {
            (Dialect::Sqlite, ColumnType::Integer) => "INTEGER",
            (Dialect::Sqlite, ColumnType::Real) => "REAL",
            (Dialect::Sqlite, _) => "TEXT",
            (Dialect::Postgres, ColumnType::Uuid) => "UUID",
            (Dialect::Postgres, ColumnType::Text) => "TEXT",
            (Dialect::Postgres, ColumnType::Integer) => "BIGINT",
            (Dialect::Postgres, ColumnType::Real) => "DOUBLE PRECISION",
            (Dialect::Postgres, ColumnType::Timestamp) => "TIMESTAMPTZ",
            (Dialect::Postgres, ColumnType::UuidList) => "UUID[]",
        }
    }
}

/// SQL text plus the parameters to bind, in order, with their column types.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<(Value, ColumnType)>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

fn push_where(
    statement: &mut Statement,
    schema: &TableSchema,
    conditions: &Conditions,
    dialect: Dialect,
) -> StorageResult<()> {
    conditions.validate(schema)?;
    if conditions.is_empty() {
        return Ok(());
    }

    let mut parts = Vec::with_capacity(conditions.len());
    for clause in conditions.iter() {
        match clause {
            Condition::Eq(column, Value::Null) | Condition::IsNull(column) => {
                parts.push(format!("{column} IS NULL"));
            }
            Condition::Eq(column, value) => {
                let ty = schema
                    .column(column)
                    .map(|c| c.ty)
                    .ok_or_else(|| StorageError::Query(format!("unknown column {column}")))?;
                statement.params.push((value.clone(), ty));
                parts.push(format!(
                    "{column} = {}",
                    dialect.placeholder(statement.params.len())
                ));
            }
        }
    }

    statement.sql.push_str(" WHERE ");
    statement.sql.push_str(&parts.join(" AND "));
    Ok(())
}

pub fn insert(schema: &TableSchema, fields: &Fields, dialect: Dialect) -> StorageResult<Statement> {
    for (column, _) in fields.iter() {
        if schema.column(column).is_none() {
            return Err(StorageError::Query(format!(
                "unknown column {column} on table {}",
                schema.name
            )));
        }
    }

    let columns: Vec<&str> = schema.column_names().collect();
    let mut statement = Statement::new(String::new());
    let mut placeholders = Vec::with_capacity(columns.len());
    for column in schema.columns {
        statement
            .params
            .push((fields.value(column.name).clone(), column.ty));
        placeholders.push(dialect.placeholder(statement.params.len()));
    }

    statement.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(statement)
}

pub fn select(
    schema: &TableSchema,
    conditions: &Conditions,
    limit: Option<usize>,
    dialect: Dialect,
) -> StorageResult<Statement> {
    let columns: Vec<&str> = schema.column_names().collect();
    let mut statement = Statement::new(format!(
        "SELECT {} FROM {}",
        columns.join(", "),
        schema.name
    ));
    push_where(&mut statement, schema, conditions, dialect)?;
    if let Some(limit) = limit {
        statement.sql.push_str(&format!(" LIMIT {limit}"));
    }
    Ok(statement)
}

pub fn delete(
    schema: &TableSchema,
    conditions: &Conditions,
    dialect: Dialect,
) -> StorageResult<Statement> {
    let mut statement = Statement::new(format!("DELETE FROM {}", schema.name));
    push_where(&mut statement, schema, conditions, dialect)?;
    Ok(statement)
}

/// `CREATE TABLE` followed by one `CREATE INDEX` per indexed column.
pub fn create_table(schema: &TableSchema, dialect: Dialect) -> Vec<String> {
    let definitions: Vec<String> = schema
        .columns
        .iter()
        .map(|column| {
            let mut definition = format!("{} {}", column.name, dialect.column_type(column.ty));
            if column.primary_key {
                definition.push_str(" PRIMARY KEY");
            } else {
                if !column.nullable {
                    definition.push_str(" NOT NULL");
                }
                if column.unique {
                    definition.push_str(" UNIQUE");
                }
            }
            definition
        })
        .collect();

    let mut statements = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        schema.name,
        definitions.join(", ")
    )];

    statements.extend(schema.columns.iter().filter(|c| c.indexed).map(|column| {
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_{col} ON {table} ({col})",
            table = schema.name,
            col = column.name
        )
    }));

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::Column;
    use uuid::Uuid;

    static BOOKS: TableSchema = TableSchema {
        name: "books",
        columns: &[
            Column::new("id", ColumnType::Uuid).primary_key(),
            Column::new("title", ColumnType::Text).unique(),
            Column::new("shelf_id", ColumnType::Uuid).nullable().indexed(),
            Column::new("pages", ColumnType::Integer),
        ],
    };

    #[test]
    fn select_uses_numbered_placeholders_for_postgres() {
        let conditions = Conditions::new()
            .eq("title", "Dune")
            .eq("pages", 412i64);
        let statement = select(&BOOKS, &conditions, Some(1), Dialect::Postgres).unwrap();

        assert_eq!(
            statement.sql,
            "SELECT id, title, shelf_id, pages FROM books WHERE title = $1 AND pages = $2 LIMIT 1"
        );
        assert_eq!(statement.params.len(), 2);
        assert_eq!(statement.params[1], (Value::Integer(412), ColumnType::Integer));
    }

    #[test]
    fn null_comparisons_are_rendered_without_parameters() {
        let conditions = Conditions::new().eq("shelf_id", Option::<Uuid>::None);
        let statement = delete(&BOOKS, &conditions, Dialect::Sqlite).unwrap();

        assert_eq!(statement.sql, "DELETE FROM books WHERE shelf_id IS NULL");
        assert!(statement.params.is_empty());
    }

    #[test]
    fn insert_binds_every_column_in_schema_order() {
        let id = Uuid::new_v4();
        let fields = Fields::new().with("id", id).with("title", "Dune").with("pages", 412i64);
        let statement = insert(&BOOKS, &fields, Dialect::Sqlite).unwrap();

        assert_eq!(
            statement.sql,
            "INSERT INTO books (id, title, shelf_id, pages) VALUES (?, ?, ?, ?)"
        );
        assert_eq!(statement.params[0].0, Value::Uuid(id));
        assert_eq!(statement.params[2], (Value::Null, ColumnType::Uuid));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let conditions = Conditions::new().eq("title; DROP TABLE books", "x");
        assert!(matches!(
            select(&BOOKS, &conditions, None, Dialect::Sqlite),
            Err(StorageError::Query(_))
        ));

        let fields = Fields::new().with("author", "Herbert");
        assert!(insert(&BOOKS, &fields, Dialect::Sqlite).is_err());
    }

    #[test]
    fn create_table_emits_constraints_and_indexes() {
        let statements = create_table(&BOOKS, Dialect::Postgres);

        assert_eq!(
            statements[0],
            "CREATE TABLE IF NOT EXISTS books (id UUID PRIMARY KEY, title TEXT NOT NULL UNIQUE, shelf_id UUID, pages BIGINT NOT NULL)"
        );
        assert_eq!(
            statements[1],
            "CREATE INDEX IF NOT EXISTS idx_books_shelf_id ON books (shelf_id)"
        );
    }

    #[test]
    fn conditions_match_fields() {
        let shelf = Uuid::new_v4();
        let fields = Fields::new().with("title", "Dune").with("shelf_id", shelf);

        assert!(Conditions::new().eq("title", "Dune").matches(&fields));
        assert!(!Conditions::new().is_null("shelf_id").matches(&fields));
        assert!(Conditions::new().is_null("pages").matches(&fields));
        assert!(Conditions::new().matches(&fields));
    }
}
