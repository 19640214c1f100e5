//! Error taxonomy for SqlBatch.

use std::fmt;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
///
/// Schema errors originate inside the engine and abort a call before any
/// statement executes. Query and connection errors originate in the driver and
/// propagate unmodified; the engine performs no retry and owns no transaction,
/// so partial-failure recovery belongs to the caller.
#[derive(Debug)]
pub enum Error {
    /// Schema resolution failed (e.g. unknown table). Fatal, pre-statement.
    Schema(SchemaError),
    /// A statement failed at the store.
    Query(QueryError),
    /// The connection to the store failed.
    Connection(ConnectionError),
    /// Escape hatch for integration-specific failures.
    Custom(String),
}

/// Schema resolution failure.
#[derive(Debug)]
pub struct SchemaError {
    /// The table that could not be resolved.
    pub table: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of a query failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Malformed SQL.
    Syntax,
    /// Constraint violation (unique, foreign key, check).
    Constraint,
    /// Statement timed out.
    Timeout,
    /// Statement was cancelled.
    Cancelled,
    /// Any other database-reported failure.
    Database,
}

/// A statement-level failure reported by the store.
#[derive(Debug)]
pub struct QueryError {
    /// Failure classification.
    pub kind: QueryErrorKind,
    /// Human-readable description.
    pub message: String,
    /// The offending SQL, when known.
    pub sql: Option<String>,
}

/// A connection-level failure.
#[derive(Debug)]
pub struct ConnectionError {
    /// Human-readable description.
    pub message: String,
}

impl Error {
    /// Build a schema error for an unknown table.
    pub fn unknown_table(table: impl Into<String>) -> Self {
        let table = table.into();
        let message = format!("table \"{table}\" does not exist");
        Error::Schema(SchemaError { table, message })
    }

    /// Build a query error with the given kind.
    pub fn query(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            message: message.into(),
            sql: None,
        })
    }

    /// Build a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Error::Connection(ConnectionError {
            message: message.into(),
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(e) => write!(f, "schema error: {}", e.message),
            Error::Query(e) => match &e.sql {
                Some(sql) => write!(f, "query error: {} (sql: {sql})", e.message),
                None => write!(f, "query error: {}", e.message),
            },
            Error::Connection(e) => write!(f, "connection error: {}", e.message),
            Error::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}
