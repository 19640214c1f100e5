//! The database connection seam.

use asupersync::{Cx, Outcome};

use crate::dialect::Dialect;
use crate::error::Error;
use crate::row::Row;
use crate::value::Value;

/// A connection to a SQL store.
///
/// The batch engine drives exactly one connection, issuing statements strictly
/// sequentially; it never opens transactions on it. Implementations decide how
/// SQL and positional parameters reach the wire.
///
/// For a multi-statement script (statements joined by the dialect's statement
/// separator), `execute` reports the affected-row count the driver exposes for
/// the script, which for the supported stores is the count of the **last**
/// individual statement.
pub trait Connection: Send + Sync {
    /// The dialect this connection speaks.
    fn dialect(&self) -> Dialect;

    /// Run a query and collect all result rows.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send;

    /// Run a query and keep only the first row.
    fn query_one(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Option<Row>, Error>> + Send {
        async move {
            match self.query(cx, sql, params).await {
                Outcome::Ok(rows) => Outcome::Ok(rows.into_iter().next()),
                Outcome::Err(e) => Outcome::Err(e),
                Outcome::Cancelled(r) => Outcome::Cancelled(r),
                Outcome::Panicked(p) => Outcome::Panicked(p),
            }
        }
    }

    /// Execute a statement (or statement script) and report affected rows.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;

    /// Read the most recently generated auto-increment id.
    ///
    /// `sequence` names the generator on dialects that track one per sequence.
    /// The default implementation runs the dialect's retrieval query and takes
    /// the first column of the first row; drivers with a native API may
    /// override.
    fn last_insert_id(
        &self,
        cx: &Cx,
        sequence: Option<&str>,
    ) -> impl Future<Output = Outcome<Value, Error>> + Send {
        async move {
            let sql = self.dialect().last_insert_id_sql(sequence);
            match self.query_one(cx, &sql, &[]).await {
                Outcome::Ok(Some(row)) => {
                    Outcome::Ok(row.values().next().cloned().unwrap_or(Value::Null))
                }
                Outcome::Ok(None) => Outcome::Ok(Value::Null),
                Outcome::Err(e) => Outcome::Err(e),
                Outcome::Cancelled(r) => Outcome::Cancelled(r),
                Outcome::Panicked(p) => Outcome::Panicked(p),
            }
        }
    }
}
