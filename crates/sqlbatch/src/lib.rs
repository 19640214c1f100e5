//! Batch persistence engine.
//!
//! Given a heterogeneous collection of records, the engine decides per record
//! whether it must be inserted or updated, emits the minimum number of SQL
//! statements to persist all of them, executes the statements over one
//! connection, and reconciles store-generated primary keys back onto the
//! in-memory records. A companion operation builds batched multi-row DELETEs
//! from key criteria.
//!
//! # What the engine does not do
//!
//! No query planning, no transactions (wrap calls yourself when atomicity
//! across the generated statements matters), no schema migration, no
//! relationship loading. Schema lookup and record serialization are seams:
//! [`SchemaProvider`] and [`BatchRecord`] from `sqlbatch-core`.
//!
//! # Example
//!
//! ```ignore
//! let engine = BatchEngine::new(connection, catalog);
//!
//! // Mixed batch: fresh users get INSERTed, known users UPDATEd.
//! let result = engine
//!     .batch_save(&cx, &mut users, &[], SaveMode::Auto)
//!     .await?;
//!
//! // Fresh users now carry their store-assigned ids.
//! assert!(result.unwrap().last_id.is_some());
//! ```

pub mod classify;
pub mod engine;
pub mod populate;
pub mod result;

pub use classify::{Classified, classify};
pub use engine::BatchEngine;
pub use populate::populate_ids;
pub use result::{BatchResult, SavedPartitions};

// Re-export the collaborator seams and builder layer for integrators.
pub use sqlbatch_core::{
    BatchRecord, ColumnDef, Connection, Cx, Dialect, Error, Outcome, Result, Row, SaveMode,
    SchemaProvider, SqlType, TableSchema, Value,
};
pub use sqlbatch_query::{
    BatchCommand, DeleteTemplates, MultiRowDelete, MultiRowInsert, MultiRowUpdate, UpdateTemplates,
};
