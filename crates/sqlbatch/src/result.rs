//! Batch-save outcome types.

use serde::{Deserialize, Serialize};

/// What a batch-save accomplished.
///
/// Fields are present only when the corresponding work happened; `last_id`
/// additionally requires the table to be auto-increment. An all-`None` result
/// still differs from "the engine did nothing at all": empty input makes
/// [`BatchEngine::batch_save`](crate::BatchEngine::batch_save) return `None`
/// instead of a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Rows inserted, when the batch contained insert-bound records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_count: Option<u64>,
    /// Update-bound rows submitted, when the batch contained any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_count: Option<u64>,
    /// The id assigned to the last inserted row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_id: Option<i64>,
}

impl BatchResult {
    /// True when neither partition produced output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insert_count.is_none() && self.update_count.is_none()
    }

    /// First id of the inserted block, when a block was assigned.
    ///
    /// With `n` rows inserted and contiguous ascending assignment this is
    /// `last_id - n + 1`.
    #[must_use]
    pub fn first_id(&self) -> Option<i64> {
        let last = self.last_id?;
        let count = i64::try_from(self.insert_count?).ok()?;
        Some(last - count + 1)
    }
}

/// Indices of the records each partition persisted, in submission order.
///
/// Returned by the capturing batch-save variant; indices point into the
/// caller's record slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPartitions {
    /// Records that were inserted.
    pub inserted: Vec<usize>,
    /// Records that were updated.
    pub updated: Vec<usize>,
}
