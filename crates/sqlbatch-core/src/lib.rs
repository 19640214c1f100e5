//! Core types and traits for SqlBatch.
//!
//! `sqlbatch-core` is the **foundation layer** for the workspace. It defines the
//! traits and core data types the builder and engine crates build on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Connection`, `SchemaProvider`, and `BatchRecord` are the
//!   seams between the batch engine and its collaborators: the database driver,
//!   the schema catalog, and the caller's row objects.
//! - **Data model**: `Row`, `Value`, `TableSchema`, and `ColumnDef` represent the
//!   inputs and outputs flowing through statement composition and execution.
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so
//!   every database operation is cancel-correct and budget-aware.
//!
//! # Who Uses This Crate
//!
//! - `sqlbatch-query` consumes `TableSchema` and `Value` to compose SQL.
//! - `sqlbatch` depends on `Connection`, `SchemaProvider`, and `BatchRecord` for
//!   the batch-save and batch-delete flows.
//! - Driver integrations implement `Connection` and operate on `Row`/`Value`.
//!
//! Most applications should use the `sqlbatch` facade; reach for `sqlbatch-core`
//! directly when writing drivers or advanced integrations.

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Budget, Cx, Outcome, RegionId, TaskId};

pub mod connection;
pub mod dialect;
pub mod error;
pub mod identifiers;
pub mod record;
pub mod row;
pub mod schema;
pub mod value;

pub use connection::Connection;
pub use dialect::Dialect;
pub use error::{ConnectionError, Error, QueryError, QueryErrorKind, Result, SchemaError};
pub use identifiers::{quote_ident, quote_ident_mysql, quote_table};
pub use record::{BatchRecord, SaveMode};
pub use row::Row;
pub use schema::{ColumnDef, SchemaProvider, SqlType, TableSchema};
pub use value::Value;
