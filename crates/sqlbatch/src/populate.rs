//! Auto-increment key back-fill.

use sqlbatch_core::{BatchRecord, Value};

/// Assign store-generated ids back onto freshly inserted records.
///
/// `inserted` holds the indices of the insert-bound records within `records`,
/// in the order their rows appeared in the INSERT statement. `last_id` is the
/// id of the block's **last** row; walking backward, each prior record gets
/// the previous integer.
///
/// This recovers per-row ids from a single scalar under the assumption that
/// the store assigned a contiguous ascending block to the batch: true for the
/// supported stores on a single connection, and NOT guaranteed when other
/// sessions insert into the same table concurrently. Callers who cannot rule
/// out concurrent writers must not rely on the back-filled ids.
///
/// Only the first primary-key column is populated; composite auto-increment
/// keys are not a thing the supported stores have. When `insert_count`
/// exceeds the number of inserted records nothing is touched.
pub fn populate_ids<R: BatchRecord>(
    records: &mut [R],
    inserted: &[usize],
    pk_name: &str,
    last_id: i64,
    insert_count: u64,
) {
    let Ok(count) = usize::try_from(insert_count) else {
        return;
    };
    if count == 0 || count > inserted.len() {
        return;
    }

    let mut id = last_id;
    for position in (0..count).rev() {
        if let Some(record) = inserted
            .get(position)
            .and_then(|&idx| records.get_mut(idx))
        {
            record.set_attribute(pk_name, Value::BigInt(id));
        }
        id -= 1;
    }
}
