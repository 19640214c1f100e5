//! The row abstraction the batch engine persists.

use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::value::Value;

/// How a batch decides between INSERT and UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveMode {
    /// Classify each record individually from its key state.
    #[default]
    Auto,
    /// Insert every record regardless of key state.
    InsertAll,
    /// Update every record regardless of key state.
    UpdateAll,
}

/// A record the batch engine can persist.
///
/// Implementors expose their attributes as an ordered [`Row`] and let the
/// engine write store-assigned keys back. The remaining methods are optional
/// capabilities with no-op defaults: the Rust rendition of behaviors probed
/// dynamically in dynamically-typed record systems. The engine checks them
/// once per batch where possible, not once per row.
pub trait BatchRecord {
    /// The table this record persists to.
    ///
    /// All records in one batch call must share one table; the engine resolves
    /// the schema once, from the first record.
    fn table_name(&self) -> String;

    /// Serialize to an ordered attribute-to-value mapping.
    ///
    /// `attribute_filter` restricts which attributes appear; empty means all.
    /// Attribute names that do not match a real column are ignored downstream.
    fn to_row(&self, attribute_filter: &[&str]) -> Row;

    /// Current primary-key values as a name-to-value mapping.
    fn primary_key(&self) -> Row;

    /// Write an attribute back onto the record (key back-fill).
    fn set_attribute(&mut self, name: &str, value: Value);

    /// Updatable-key capability: the primary-key values as they existed before
    /// this save.
    ///
    /// Records that can change their own identity return the previously-known
    /// key here; the engine then matches on the old key while writing the new
    /// one. `None` opts out of the capability entirely.
    fn old_key(&self) -> Option<Row> {
        None
    }

    /// Explicit insert/update override for records whose key is externally
    /// assigned (natural keys), where the numeric-key heuristic cannot decide.
    fn inserting_hint(&self) -> Option<bool> {
        None
    }

    /// Hook invoked once per batch, before classification.
    ///
    /// Lets the record type normalize or validate the batch as a set.
    fn before_batch(records: &mut [Self])
    where
        Self: Sized,
    {
        let _ = records;
    }

    /// Hook invoked after a capturing batch-save, with the partition indices.
    fn after_batch_save(records: &mut [Self], inserted: &[usize], updated: &[usize])
    where
        Self: Sized,
    {
        let _ = (records, inserted, updated);
    }
}
