//! INSERT-vs-UPDATE classification.

use sqlbatch_core::{BatchRecord, Row, SaveMode};

/// The classification of one record within a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// True when the record must be inserted.
    pub inserting: bool,
    /// The pre-save key to match on, for records updating their own identity.
    ///
    /// Present only for update-bound records whose updatable-key capability
    /// returned a fully-populated mapping.
    pub old_key: Option<Row>,
}

/// Decide whether `record` is inserted or updated.
///
/// `InsertAll` and `UpdateAll` short-circuit. Under `Auto`:
///
/// 1. The updatable-key capability wins when present: a fully-populated old
///    key means UPDATE (matching on that old key); any empty field, or an
///    entirely empty mapping, means the record was never loaded, so INSERT.
/// 2. The explicit inserting hint is honored next, for records whose key is
///    externally assigned and carries no "already persisted" signal.
/// 3. Otherwise the current primary-key values decide: any empty or
///    non-numeric value (or no key values at all) means INSERT.
pub fn classify<R: BatchRecord>(record: &R, mode: SaveMode) -> Classified {
    match mode {
        SaveMode::InsertAll => Classified {
            inserting: true,
            old_key: None,
        },
        SaveMode::UpdateAll => Classified {
            inserting: false,
            old_key: record.old_key().filter(is_complete),
        },
        SaveMode::Auto => {
            if let Some(old_key) = record.old_key() {
                if is_complete(&old_key) {
                    Classified {
                        inserting: false,
                        old_key: Some(old_key),
                    }
                } else {
                    Classified {
                        inserting: true,
                        old_key: None,
                    }
                }
            } else if let Some(inserting) = record.inserting_hint() {
                Classified {
                    inserting,
                    old_key: None,
                }
            } else {
                let pk = record.primary_key();
                let inserting =
                    pk.is_empty() || pk.values().any(|v| v.is_empty() || !v.is_numeric());
                Classified {
                    inserting,
                    old_key: None,
                }
            }
        }
    }
}

/// A key mapping counts only when every field carries a real value.
fn is_complete(key: &Row) -> bool {
    !key.is_empty() && key.values().all(|v| !v.is_empty())
}
