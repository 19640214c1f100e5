//! Template-driven batch SQL composition for SqlBatch.
//!
//! This crate turns row collections into the minimum number of parameter-bound
//! SQL statements:
//!
//! - [`MultiRowInsert`]: one INSERT with N value tuples over the column union
//!   of all rows.
//! - [`MultiRowUpdate`]: one UPDATE per row, joined into a single batched
//!   command, with per-row placeholder namespacing and old-key support for
//!   identity-changing updates.
//! - [`MultiRowDelete`]: one DELETE per criteria row plus the dialect's
//!   row-count probe.
//!
//! Statement shapes come from pluggable template sets ([`UpdateTemplates`],
//! [`DeleteTemplates`]) whose named substitution slots keep dialect variation
//! in data rather than code. Builders emit a [`BatchCommand`] (SQL with named
//! placeholders plus ordered bindings) that callers can inspect before
//! lowering to a dialect's positional form and executing.

pub mod command;
pub mod delete;
pub mod insert;
pub mod templates;
pub mod update;

pub use command::BatchCommand;
pub use delete::MultiRowDelete;
pub use insert::MultiRowInsert;
pub use templates::{DeleteTemplates, UpdateTemplates, substitute};
pub use update::MultiRowUpdate;
