//! The batch coordinator.

use asupersync::{Cx, Outcome};
use sqlbatch_core::{
    BatchRecord, Connection, Error, Result, Row, SaveMode, SchemaProvider, TableSchema,
};
use sqlbatch_query::{
    BatchCommand, DeleteTemplates, MultiRowDelete, MultiRowInsert, MultiRowUpdate, UpdateTemplates,
};

use crate::classify::classify;
use crate::populate::populate_ids;
use crate::result::{BatchResult, SavedPartitions};

/// Orchestrates batched persistence over one connection and one schema
/// catalog.
///
/// Statements are issued strictly sequentially and no transaction is opened:
/// when a call emits both an update batch and an insert batch, atomicity
/// across them belongs to the caller. The only shared state the engine
/// mutates is the caller's records, whose primary keys the insert path
/// back-fills in place.
#[derive(Debug)]
pub struct BatchEngine<C, P> {
    connection: C,
    provider: P,
}

impl<C: Connection, P: SchemaProvider> BatchEngine<C, P> {
    /// Create an engine over `connection` and `provider`.
    pub fn new(connection: C, provider: P) -> Self {
        Self {
            connection,
            provider,
        }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// The schema catalog.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve a table or fail before anything executes.
    fn schema(&self, table: &str) -> Result<TableSchema> {
        self.provider
            .table_schema(table)
            .ok_or_else(|| Error::unknown_table(table))
    }

    // ========================================================================
    // Batch save
    // ========================================================================

    /// Persist `records`, inserting or updating each according to `mode`.
    ///
    /// Returns `None` for empty input (a no-op, distinct from a result whose
    /// counts are absent). Freshly inserted records get their auto-increment
    /// keys written back in submission order.
    #[tracing::instrument(level = "debug", skip(self, cx, records))]
    pub async fn batch_save<R: BatchRecord>(
        &self,
        cx: &Cx,
        records: &mut [R],
        attribute_filter: &[&str],
        mode: SaveMode,
    ) -> Outcome<Option<BatchResult>, Error> {
        match self
            .batch_save_inner(cx, records, attribute_filter, mode)
            .await
        {
            Outcome::Ok(outcome) => Outcome::Ok(outcome.map(|(result, _)| result)),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    /// Like [`batch_save`](Self::batch_save), additionally returning which
    /// records landed in which partition and invoking the record type's
    /// after-save hook.
    #[tracing::instrument(level = "debug", skip(self, cx, records))]
    pub async fn batch_save_capturing<R: BatchRecord>(
        &self,
        cx: &Cx,
        records: &mut [R],
        attribute_filter: &[&str],
        mode: SaveMode,
    ) -> Outcome<Option<(BatchResult, SavedPartitions)>, Error> {
        match self
            .batch_save_inner(cx, records, attribute_filter, mode)
            .await
        {
            Outcome::Ok(Some((result, partitions))) => {
                R::after_batch_save(records, &partitions.inserted, &partitions.updated);
                Outcome::Ok(Some((result, partitions)))
            }
            Outcome::Ok(None) => Outcome::Ok(None),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    async fn batch_save_inner<R: BatchRecord>(
        &self,
        cx: &Cx,
        records: &mut [R],
        attribute_filter: &[&str],
        mode: SaveMode,
    ) -> Outcome<Option<(BatchResult, SavedPartitions)>, Error> {
        if records.is_empty() {
            return Outcome::Ok(None);
        }

        R::before_batch(records);

        // All records in one call share one table; resolve its schema once.
        let table = records[0].table_name();
        let schema = match self.schema(&table) {
            Ok(schema) => schema,
            Err(e) => return Outcome::Err(e),
        };
        let dialect = self.connection.dialect();
        let strip_keys = schema.is_auto_increment();

        let mut partitions = SavedPartitions::default();
        let mut insert_rows: Vec<Row> = Vec::new();
        let mut update_rows: Vec<Row> = Vec::new();
        let mut old_keys: Vec<Option<Row>> = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let classified = classify(record, mode);
            let mut row = record.to_row(attribute_filter);
            if classified.inserting {
                // The store assigns auto-increment keys; natural keys travel
                // with the row like any other column.
                if strip_keys {
                    let key_attrs: Vec<String> = row
                        .names()
                        .filter(|name| {
                            schema
                                .primary_key
                                .iter()
                                .any(|pk| pk.eq_ignore_ascii_case(name))
                        })
                        .map(str::to_string)
                        .collect();
                    for name in key_attrs {
                        row.remove(&name);
                    }
                }
                partitions.inserted.push(idx);
                insert_rows.push(row);
            } else {
                partitions.updated.push(idx);
                update_rows.push(row);
                old_keys.push(classified.old_key);
            }
        }

        tracing::info!(
            table = %schema.full_name,
            inserts = insert_rows.len(),
            updates = update_rows.len(),
            "Classified batch"
        );

        let mut result = BatchResult::default();

        if !update_rows.is_empty() {
            let command = MultiRowUpdate::new(&schema, &update_rows, &schema.primary_key)
                .old_keys(&old_keys)
                .build(dialect);
            match command.execute(cx, &self.connection).await {
                Outcome::Ok(affected) => {
                    // The driver may legitimately report fewer rows than
                    // submitted (no-op updates, skipped partially-keyed rows);
                    // the batch result counts what was submitted.
                    tracing::debug!(
                        submitted = update_rows.len(),
                        affected,
                        "Update batch executed"
                    );
                }
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
            result.update_count = Some(update_rows.len() as u64);
        }

        if !insert_rows.is_empty() {
            let command = MultiRowInsert::new(&schema, &insert_rows).build(dialect);
            let affected = match command.execute(cx, &self.connection).await {
                Outcome::Ok(affected) => affected,
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            };
            result.insert_count = Some(affected);

            if schema.is_auto_increment() {
                let id = match self
                    .connection
                    .last_insert_id(cx, schema.sequence_name.as_deref())
                    .await
                {
                    Outcome::Ok(id) => id,
                    Outcome::Err(e) => return Outcome::Err(e),
                    Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                    Outcome::Panicked(p) => return Outcome::Panicked(p),
                };
                if let Some(id) = id.as_i64() {
                    // Drivers report the first id of the assigned block;
                    // normalize to the block's last id.
                    let last_id = affected as i64 + id - 1;
                    result.last_id = Some(last_id);
                    if let Some(pk_name) = schema.primary_key.first() {
                        populate_ids(records, &partitions.inserted, pk_name, last_id, affected);
                    }
                }
            }
        }

        Outcome::Ok(Some((result, partitions)))
    }

    // ========================================================================
    // Batch delete
    // ========================================================================

    /// Delete the rows matching each criteria mapping, in one round trip.
    ///
    /// Reported count: let `n` be the last statement's affected count (the
    /// dialect's row-count probe where it has one). `n > 1` is returned as-is;
    /// `n == 1` is approximated by the number of criteria rows requested,
    /// because the probe reflects only the final individual DELETE rather than
    /// the sum; `n == 0` returns 0. A stricter engine would sum per-statement
    /// counts instead of trusting a single trailing probe.
    #[tracing::instrument(level = "debug", skip(self, cx, criteria))]
    pub async fn batch_delete(&self, cx: &Cx, table: &str, criteria: &[Row]) -> Outcome<u64, Error> {
        if criteria.is_empty() {
            return Outcome::Ok(0);
        }
        let schema = match self.schema(table) {
            Ok(schema) => schema,
            Err(e) => return Outcome::Err(e),
        };
        let dialect = self.connection.dialect();
        let command = MultiRowDelete::new(&schema, criteria).build(dialect);
        if command.is_empty() {
            return Outcome::Ok(0);
        }

        let n = if dialect.row_count_probe().is_some() {
            match command.query_one(cx, &self.connection).await {
                Outcome::Ok(row) => row
                    .and_then(|r| r.values().next().and_then(|v| v.as_i64()))
                    .unwrap_or(0),
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
        } else {
            match command.execute(cx, &self.connection).await {
                Outcome::Ok(affected) => affected as i64,
                Outcome::Err(e) => return Outcome::Err(e),
                Outcome::Cancelled(r) => return Outcome::Cancelled(r),
                Outcome::Panicked(p) => return Outcome::Panicked(p),
            }
        };

        let affected = if n > 1 {
            n as u64
        } else if n == 1 {
            criteria.len() as u64
        } else {
            0
        };
        tracing::debug!(requested = criteria.len(), affected, "Delete batch executed");
        Outcome::Ok(affected)
    }

    // ========================================================================
    // Row-level operations
    // ========================================================================

    /// Insert `rows` with one multi-tuple INSERT; returns affected rows.
    #[tracing::instrument(level = "debug", skip(self, cx, rows))]
    pub async fn insert_multiple(&self, cx: &Cx, table: &str, rows: &[Row]) -> Outcome<u64, Error> {
        if rows.is_empty() {
            return Outcome::Ok(0);
        }
        let command = match self.insert_command(table, rows) {
            Ok(command) => command,
            Err(e) => return Outcome::Err(e),
        };
        command.execute(cx, &self.connection).await
    }

    /// Update `rows`, keyed by `pk_names`, with one batched command.
    ///
    /// `old_keys` optionally supplies per-row pre-save key values for
    /// identity-changing updates. Returns the driver's affected count
    /// verbatim; idempotent re-runs may legitimately report 0.
    #[tracing::instrument(level = "debug", skip(self, cx, rows, old_keys))]
    pub async fn update_multiple(
        &self,
        cx: &Cx,
        table: &str,
        rows: &[Row],
        pk_names: &[String],
        old_keys: Option<&[Option<Row>]>,
    ) -> Outcome<u64, Error> {
        if rows.is_empty() {
            return Outcome::Ok(0);
        }
        let command =
            match self.update_command(table, rows, pk_names, old_keys, UpdateTemplates::default())
            {
                Ok(command) => command,
                Err(e) => return Outcome::Err(e),
            };
        command.execute(cx, &self.connection).await
    }

    // ========================================================================
    // Command builders (inspectable, template-overridable)
    // ========================================================================

    /// Compose the multi-row INSERT command without executing it.
    pub fn insert_command(&self, table: &str, rows: &[Row]) -> Result<BatchCommand> {
        let schema = self.schema(table)?;
        Ok(MultiRowInsert::new(&schema, rows).build(self.connection.dialect()))
    }

    /// Compose the batched UPDATE command without executing it.
    pub fn update_command(
        &self,
        table: &str,
        rows: &[Row],
        pk_names: &[String],
        old_keys: Option<&[Option<Row>]>,
        templates: UpdateTemplates,
    ) -> Result<BatchCommand> {
        let schema = self.schema(table)?;
        let mut builder = MultiRowUpdate::new(&schema, rows, pk_names).templates(templates);
        if let Some(old_keys) = old_keys {
            builder = builder.old_keys(old_keys);
        }
        Ok(builder.build(self.connection.dialect()))
    }

    /// Compose the batched DELETE command without executing it.
    pub fn delete_command(
        &self,
        table: &str,
        criteria: &[Row],
        templates: DeleteTemplates,
    ) -> Result<BatchCommand> {
        let schema = self.schema(table)?;
        Ok(MultiRowDelete::new(&schema, criteria)
            .templates(templates)
            .build(self.connection.dialect()))
    }
}
