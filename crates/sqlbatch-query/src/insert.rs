//! Multi-row INSERT composition.

use sqlbatch_core::{Dialect, Row, TableSchema, Value};

use crate::command::BatchCommand;

/// Builds one INSERT statement with a value tuple per row.
///
/// The column list is the union of attribute names across all rows that name a
/// real schema column, in first-seen order; rows missing a column contribute
/// NULL for it. Attribute names with no matching column are ignored.
///
/// Whether primary-key columns belong in the rows is the caller's decision:
/// the batch coordinator strips them for auto-increment tables (the store
/// assigns them) and keeps them for natural keys.
#[derive(Debug)]
pub struct MultiRowInsert<'a> {
    schema: &'a TableSchema,
    rows: &'a [Row],
}

impl<'a> MultiRowInsert<'a> {
    /// Create a builder over `rows` destined for `schema`'s table.
    #[must_use]
    pub fn new(schema: &'a TableSchema, rows: &'a [Row]) -> Self {
        Self { schema, rows }
    }

    /// Column union across all rows, restricted to schema columns, in
    /// first-seen order. Names are canonicalized to the schema's spelling.
    #[must_use]
    pub fn columns(&self) -> Vec<&'a str> {
        let mut columns: Vec<&str> = Vec::new();
        for row in self.rows {
            for name in row.names() {
                if let Some(col) = self.schema.find_column(name) {
                    if !columns.iter().any(|c| c.eq_ignore_ascii_case(&col.name)) {
                        columns.push(col.name.as_str());
                    }
                }
            }
        }
        columns
    }

    /// Compose the INSERT command for `dialect`.
    ///
    /// Returns an empty command when there are no rows or no usable columns.
    #[must_use]
    pub fn build(&self, dialect: Dialect) -> BatchCommand {
        let columns = self.columns();
        if self.rows.is_empty() || columns.is_empty() {
            return BatchCommand::empty();
        }

        let column_list = columns
            .iter()
            .map(|c| dialect.quote(c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut params = Vec::with_capacity(self.rows.len() * columns.len());
        let mut tuples = Vec::with_capacity(self.rows.len());

        for (i, row) in self.rows.iter().enumerate() {
            let mut placeholders = Vec::with_capacity(columns.len());
            for name in &columns {
                let placeholder = format!("{name}_{i}");
                let value = match lookup(row, name) {
                    Some(v) => self
                        .schema
                        .find_column(name)
                        .map_or_else(|| v.clone(), |col| col.cast(v)),
                    None => Value::Null,
                };
                placeholders.push(format!(":{placeholder}"));
                params.push((placeholder, value));
            }
            tuples.push(format!("({})", placeholders.join(", ")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            dialect.quote_table(&self.schema.full_name),
            column_list,
            tuples.join(", ")
        );

        BatchCommand::new(sql, params)
    }
}

/// Case-insensitive attribute lookup, matching schema column resolution.
fn lookup<'r>(row: &'r Row, name: &str) -> Option<&'r Value> {
    row.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlbatch_core::{ColumnDef, SqlType};

    fn schema() -> TableSchema {
        TableSchema::new("user")
            .column(
                ColumnDef::new("id", SqlType::BigInt)
                    .primary_key()
                    .auto_increment(),
            )
            .column(ColumnDef::new("name", SqlType::Text))
            .column(ColumnDef::new("age", SqlType::Int).nullable())
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(n, v)| ((*n).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_column_union_first_seen_order() {
        let schema = schema();
        let rows = vec![
            row(&[("name", Value::from("Tom")), ("age", Value::Int(30))]),
            row(&[("age", Value::Int(20)), ("name", Value::from("Jane"))]),
        ];
        let builder = MultiRowInsert::new(&schema, &rows);
        assert_eq!(builder.columns(), vec!["name", "age"]);
    }

    #[test]
    fn test_unknown_attributes_ignored() {
        let schema = schema();
        let rows = vec![row(&[
            ("name", Value::from("Tom")),
            ("shoe_size", Value::Int(44)),
        ])];
        let builder = MultiRowInsert::new(&schema, &rows);
        assert_eq!(builder.columns(), vec!["name"]);
    }

    #[test]
    fn test_missing_columns_default_to_null() {
        let schema = schema();
        let rows = vec![
            row(&[("name", Value::from("Tom")), ("age", Value::Int(30))]),
            row(&[("name", Value::from("Linda"))]),
        ];
        let cmd = MultiRowInsert::new(&schema, &rows).build(Dialect::Postgres);
        assert_eq!(
            cmd.sql(),
            "INSERT INTO \"user\" (\"name\", \"age\") VALUES (:name_0, :age_0), (:name_1, :age_1)"
        );
        let (_, values) = cmd.lower(Dialect::Postgres).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Text("Tom".to_string()),
                Value::Int(30),
                Value::Text("Linda".to_string()),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_values_cast_to_column_type() {
        let schema = schema();
        let rows = vec![row(&[
            ("name", Value::from("Tom")),
            ("age", Value::Text("30".to_string())),
        ])];
        let cmd = MultiRowInsert::new(&schema, &rows).build(Dialect::Postgres);
        let (_, values) = cmd.lower(Dialect::Postgres).unwrap();
        assert_eq!(values[1], Value::Int(30));
    }

    #[test]
    fn test_empty_rows_empty_command() {
        let schema = schema();
        let rows: Vec<Row> = Vec::new();
        let cmd = MultiRowInsert::new(&schema, &rows).build(Dialect::Postgres);
        assert!(cmd.is_empty());
    }
}
