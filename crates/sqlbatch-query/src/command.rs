//! The parameter-bound batch command object.

use asupersync::{Cx, Outcome};
use sqlbatch_core::{Connection, Dialect, Error, QueryErrorKind, Result, Row, Value};

/// A composed SQL command with named placeholder bindings.
///
/// Builders emit named placeholders (`:{column}_{row}` with an `old_` prefix
/// for old-key bindings) so that every binding is unique across a batched
/// multi-statement command. Callers can inspect the SQL and bindings before
/// execution; [`lower`](Self::lower) rewrites to the target dialect's
/// positional placeholders in first-occurrence order.
///
/// Bindings that no longer occur in the SQL (e.g. for rows the builder
/// skipped) are ignored during lowering.
#[derive(Debug, Clone, Default)]
pub struct BatchCommand {
    sql: String,
    params: Vec<(String, Value)>,
}

impl BatchCommand {
    /// Create a command from SQL text and named bindings.
    #[must_use]
    pub fn new(sql: String, params: Vec<(String, Value)>) -> Self {
        Self { sql, params }
    }

    /// An empty command (no statements).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The composed SQL with named placeholders.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The named bindings in binding order.
    #[must_use]
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }

    /// True when the command holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Rewrite to positional placeholders for `dialect`.
    ///
    /// Parameters are emitted in first-occurrence order, so dialects with
    /// order-based binding (`?`) and index-based binding (`$n`, `?n`) both
    /// work. A placeholder in the SQL with no matching binding is an error.
    /// Single-quoted string literals and `::` casts are left untouched.
    pub fn lower(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        let mut sql = String::with_capacity(self.sql.len());
        let mut values = Vec::new();
        let mut chars = self.sql.char_indices().peekable();
        let mut in_string = false;

        while let Some((_, c)) = chars.next() {
            if in_string {
                sql.push(c);
                if c == '\'' {
                    in_string = false;
                }
                continue;
            }
            match c {
                '\'' => {
                    in_string = true;
                    sql.push(c);
                }
                ':' => {
                    if let Some(&(_, ':')) = chars.peek() {
                        chars.next();
                        sql.push_str("::");
                        continue;
                    }
                    let mut name = String::new();
                    while let Some(&(_, nc)) = chars.peek() {
                        if nc.is_ascii_alphanumeric() || nc == '_' {
                            name.push(nc);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        sql.push(':');
                        continue;
                    }
                    let Some((_, value)) = self.params.iter().find(|(n, _)| *n == name) else {
                        return Err(Error::query(
                            QueryErrorKind::Syntax,
                            format!("unbound placeholder :{name}"),
                        ));
                    };
                    values.push(value.clone());
                    sql.push_str(&dialect.placeholder(values.len()));
                }
                _ => sql.push(c),
            }
        }

        Ok((sql, values))
    }

    /// Lower and execute through `conn`, reporting affected rows.
    pub async fn execute<C: Connection>(&self, cx: &Cx, conn: &C) -> Outcome<u64, Error> {
        if self.is_empty() {
            return Outcome::Ok(0);
        }
        let (sql, values) = match self.lower(conn.dialect()) {
            Ok(lowered) => lowered,
            Err(e) => return Outcome::Err(e),
        };
        tracing::trace!(sql = %sql, params = values.len(), "Executing batch command");
        conn.execute(cx, &sql, &values).await
    }

    /// Lower and run as a query, keeping the first row of the last result set.
    ///
    /// Used for scripts whose trailing statement is a probe SELECT.
    pub async fn query_one<C: Connection>(
        &self,
        cx: &Cx,
        conn: &C,
    ) -> Outcome<Option<Row>, Error> {
        if self.is_empty() {
            return Outcome::Ok(None);
        }
        let (sql, values) = match self.lower(conn.dialect()) {
            Ok(lowered) => lowered,
            Err(e) => return Outcome::Err(e),
        };
        tracing::trace!(sql = %sql, params = values.len(), "Querying batch command");
        conn.query_one(cx, &sql, &values).await
    }
}
