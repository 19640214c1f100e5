//! Table schema metadata and the schema-provider seam.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// SQL column types the engine distinguishes for casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlType {
    /// BOOLEAN.
    Bool,
    /// 32-bit INTEGER.
    Int,
    /// 64-bit BIGINT.
    BigInt,
    /// DOUBLE PRECISION.
    Double,
    /// DECIMAL / NUMERIC.
    Decimal,
    /// TEXT / VARCHAR.
    Text,
    /// BLOB / BYTEA.
    Bytes,
}

/// A column definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name in the database.
    pub name: String,
    /// SQL type.
    pub sql_type: SqlType,
    /// Whether this column is nullable.
    pub nullable: bool,
    /// Whether this is a primary key column.
    pub primary_key: bool,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
}

impl ColumnDef {
    /// Create a new column definition.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
        }
    }

    /// Mark as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark as primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Coerce a value toward this column's type before binding.
    ///
    /// Numeric text tightens to the numeric type, numbers loosen to text for
    /// text columns, NULL passes through, and anything the column type cannot
    /// absorb is returned unchanged for the store to judge.
    #[must_use]
    pub fn cast(&self, value: &Value) -> Value {
        match (self.sql_type, value) {
            (_, Value::Null) => Value::Null,
            (SqlType::Int, Value::Text(s)) => {
                s.parse::<i32>().map_or_else(|_| value.clone(), Value::Int)
            }
            (SqlType::Int, Value::BigInt(i)) => {
                i32::try_from(*i).map_or_else(|_| value.clone(), Value::Int)
            }
            (SqlType::BigInt, Value::Text(s)) => s
                .parse::<i64>()
                .map_or_else(|_| value.clone(), Value::BigInt),
            (SqlType::BigInt, Value::Int(i)) => Value::BigInt(i64::from(*i)),
            (SqlType::Double, Value::Text(s)) => s
                .parse::<f64>()
                .map_or_else(|_| value.clone(), Value::Double),
            (SqlType::Double, Value::Int(i)) => Value::Double(f64::from(*i)),
            (SqlType::Decimal, Value::Int(i)) => Value::Decimal(i.to_string()),
            (SqlType::Decimal, Value::BigInt(i)) => Value::Decimal(i.to_string()),
            (SqlType::Decimal, Value::Double(d)) => Value::Decimal(d.to_string()),
            (SqlType::Decimal, Value::Text(s)) if value.is_numeric() => {
                Value::Decimal(s.clone())
            }
            (SqlType::Text, Value::Int(i)) => Value::Text(i.to_string()),
            (SqlType::Text, Value::BigInt(i)) => Value::Text(i.to_string()),
            (SqlType::Text, Value::Double(d)) => Value::Text(d.to_string()),
            (SqlType::Bool, Value::Int(i)) => Value::Bool(*i != 0),
            (SqlType::Bool, Value::BigInt(i)) => Value::Bool(*i != 0),
            _ => value.clone(),
        }
    }
}

/// Schema metadata for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Bare table name.
    pub name: String,
    /// Fully-qualified name (schema-prefixed where applicable).
    pub full_name: String,
    /// Column definitions in table order.
    pub columns: Vec<ColumnDef>,
    /// Primary key column names, possibly composite.
    pub primary_key: Vec<String>,
    /// Auto-increment sequence identifier, when the dialect names one.
    pub sequence_name: Option<String>,
}

impl TableSchema {
    /// Create a schema for `name` with no columns yet.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            name,
            columns: Vec::new(),
            primary_key: Vec::new(),
            sequence_name: None,
        }
    }

    /// Set the fully-qualified name.
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Set the auto-increment sequence name.
    #[must_use]
    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence_name = Some(sequence.into());
        self
    }

    /// Append a column; primary-key columns also register in `primary_key`.
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        if column.primary_key {
            self.primary_key.push(column.name.clone());
        }
        self.columns.push(column);
        self
    }

    /// Look up a column by name, case-insensitively.
    ///
    /// Column names compare case-insensitively throughout the engine, matching
    /// how the catalogs of the supported stores resolve unquoted identifiers.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Check whether a column exists, case-insensitively.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }

    /// True when the table's key is store-assigned.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.sequence_name.is_some()
            || self
                .columns
                .iter()
                .any(|c| c.primary_key && c.auto_increment)
    }
}

/// Resolves table names to schema metadata.
///
/// The engine resolves the schema once per batch call; a `None` return aborts
/// the call with `Error::Schema` before any statement executes.
pub trait SchemaProvider {
    /// Resolve `table` to its schema, or `None` when the table is unknown.
    fn table_schema(&self, table: &str) -> Option<TableSchema>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_schema() -> TableSchema {
        TableSchema::new("user")
            .column(
                ColumnDef::new("id", SqlType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnDef::new("name", SqlType::Text))
            .column(ColumnDef::new("age", SqlType::Int).nullable())
    }

    #[test]
    fn test_primary_key_registration() {
        let schema = users_schema();
        assert_eq!(schema.primary_key, vec!["id"]);
        assert!(schema.is_auto_increment());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let schema = users_schema();
        assert!(schema.has_column("NAME"));
        assert!(schema.has_column("name"));
        assert!(!schema.has_column("email"));
    }

    #[test]
    fn test_natural_key_not_auto_increment() {
        let schema = TableSchema::new("country")
            .column(ColumnDef::new("code", SqlType::Text).primary_key())
            .column(ColumnDef::new("label", SqlType::Text));
        assert!(!schema.is_auto_increment());
    }

    #[test]
    fn test_cast_tightens_numeric_text() {
        let col = ColumnDef::new("age", SqlType::Int);
        assert_eq!(col.cast(&Value::Text("30".to_string())), Value::Int(30));
        assert_eq!(
            col.cast(&Value::Text("thirty".to_string())),
            Value::Text("thirty".to_string())
        );
        assert_eq!(col.cast(&Value::Null), Value::Null);
    }

    #[test]
    fn test_cast_loosens_to_text() {
        let col = ColumnDef::new("label", SqlType::Text);
        assert_eq!(col.cast(&Value::BigInt(7)), Value::Text("7".to_string()));
    }
}
