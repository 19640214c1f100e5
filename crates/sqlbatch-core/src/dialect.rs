//! SQL dialect differences.
//!
//! The statement builders compose dialect-neutral SQL with named placeholders;
//! everything dialect-specific (positional placeholder syntax, identifier
//! quoting, the row-count probe, last-insert-id retrieval) lives here so
//! dialect variation stays data, not branching in the algorithms.

use crate::identifiers::{quote_ident, quote_ident_mysql, quote_table};

/// The SQL dialects the engine can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// PostgreSQL: `$n` placeholders, double-quoted identifiers.
    #[default]
    Postgres,
    /// MySQL: `?` placeholders, backtick identifiers.
    MySql,
    /// SQLite: `?n` placeholders, double-quoted identifiers.
    Sqlite,
}

impl Dialect {
    /// Positional placeholder for 1-based parameter `index`.
    #[must_use]
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::MySql => "?".to_string(),
            Dialect::Sqlite => format!("?{index}"),
        }
    }

    /// Quote a single identifier in this dialect.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => quote_ident(name),
            Dialect::MySql => quote_ident_mysql(name),
        }
    }

    /// Quote a possibly schema-qualified table name in this dialect.
    #[must_use]
    pub fn quote_table(&self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => quote_table(name, quote_ident),
            Dialect::MySql => quote_table(name, quote_ident_mysql),
        }
    }

    /// SQL that reads the affected-row count of the previous statement.
    ///
    /// Appended as the trailing statement of a batched DELETE so a driver that
    /// only reports the last statement's effect still yields a count. Returns
    /// `None` when the dialect has no session-scoped probe; the driver-reported
    /// count of the script itself is used instead.
    #[must_use]
    pub fn row_count_probe(&self) -> Option<&'static str> {
        match self {
            Dialect::Postgres => None,
            Dialect::MySql => Some("SELECT ROW_COUNT()"),
            Dialect::Sqlite => Some("SELECT changes()"),
        }
    }

    /// SQL that reads the most recently generated auto-increment id.
    ///
    /// `sequence` names the generator on dialects that have one.
    #[must_use]
    pub fn last_insert_id_sql(&self, sequence: Option<&str>) -> String {
        match self {
            Dialect::Postgres => match sequence {
                Some(seq) => format!("SELECT currval('{seq}')"),
                None => "SELECT lastval()".to_string(),
            },
            Dialect::MySql => "SELECT LAST_INSERT_ID()".to_string(),
            Dialect::Sqlite => "SELECT last_insert_rowid()".to_string(),
        }
    }
}
