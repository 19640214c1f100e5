//! Batched multi-row UPDATE composition.

use sqlbatch_core::{Dialect, Row, TableSchema, Value};

use crate::command::BatchCommand;
use crate::templates::{UpdateTemplates, substitute};

/// Builds one UPDATE statement per row, joined into a single batched command.
///
/// Each row's attributes split into SET assignments and key-matching WHERE
/// tests. Placeholder names carry the row index (`:{column}_{row}`) so no two
/// rows collide inside the combined multi-statement command; old-key bindings
/// get a further `old_` prefix as their own namespace.
///
/// WHERE resolution per key column:
/// - an old-key value supplied for the row wins: the statement matches the
///   pre-save key while the key column's current value is written via SET
///   (identity-changing update);
/// - otherwise the row's own current value matches, and the key column stays
///   out of the SET list.
///
/// A row missing a value for any named key column, or with nothing left to
/// SET, is silently skipped: a partially-keyed row must not abort the batch.
/// Composite keys AND-join every key column's equality test.
#[derive(Debug)]
pub struct MultiRowUpdate<'a> {
    schema: &'a TableSchema,
    rows: &'a [Row],
    pk_names: &'a [String],
    old_keys: Option<&'a [Option<Row>]>,
    templates: UpdateTemplates,
}

impl<'a> MultiRowUpdate<'a> {
    /// Create a builder updating `rows` in `schema`'s table, keyed by
    /// `pk_names`.
    #[must_use]
    pub fn new(schema: &'a TableSchema, rows: &'a [Row], pk_names: &'a [String]) -> Self {
        Self {
            schema,
            rows,
            pk_names,
            old_keys: None,
            templates: UpdateTemplates::default(),
        }
    }

    /// Supply per-row pre-save key values, parallel to the row list.
    ///
    /// `None` entries fall back to the row's current key values.
    #[must_use]
    pub fn old_keys(mut self, old_keys: &'a [Option<Row>]) -> Self {
        self.old_keys = Some(old_keys);
        self
    }

    /// Replace the template set.
    #[must_use]
    pub fn templates(mut self, templates: UpdateTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Compose the batched UPDATE command for `dialect`.
    ///
    /// Returns an empty command when no row survives key resolution.
    #[must_use]
    pub fn build(&self, dialect: Dialect) -> BatchCommand {
        let table = dialect.quote_table(&self.schema.full_name);
        let mut params: Vec<(String, Value)> = Vec::new();
        let mut statements: Vec<String> = Vec::new();

        for (i, row) in self.rows.iter().enumerate() {
            let old_key = self
                .old_keys
                .and_then(|keys| keys.get(i))
                .and_then(Option::as_ref);

            let mut pairs: Vec<String> = Vec::new();
            // Key column -> placeholder chosen for its WHERE test.
            let mut key_binds: Vec<(&str, String)> = Vec::new();

            for (attr, value) in row.iter() {
                let Some(col) = self.schema.find_column(attr) else {
                    continue;
                };
                let placeholder = format!("{attr}_{i}");
                let pk = self
                    .pk_names
                    .iter()
                    .find(|pk| pk.eq_ignore_ascii_case(attr));

                if let Some(pk) = pk {
                    if let Some(old_value) = old_key.and_then(|key| lookup(key, attr)) {
                        let old_placeholder = format!("old_{attr}_{i}");
                        params.push((old_placeholder.clone(), col.cast(old_value)));
                        key_binds.push((pk.as_str(), format!(":{old_placeholder}")));
                        // Identity change: the new key value is an assignment.
                        params.push((placeholder.clone(), col.cast(value)));
                        pairs.push(substitute(
                            &self.templates.column_assign,
                            &[
                                ("column", dialect.quote(&col.name).as_str()),
                                ("value", &format!(":{placeholder}")),
                            ],
                        ));
                    } else {
                        params.push((placeholder.clone(), col.cast(value)));
                        key_binds.push((pk.as_str(), format!(":{placeholder}")));
                    }
                } else {
                    params.push((placeholder.clone(), col.cast(value)));
                    pairs.push(substitute(
                        &self.templates.column_assign,
                        &[
                            ("column", dialect.quote(&col.name).as_str()),
                            ("value", &format!(":{placeholder}")),
                        ],
                    ));
                }
            }

            let mut condition_exprs = Vec::with_capacity(self.pk_names.len());
            let mut unresolved = false;
            for pk in self.pk_names {
                match key_binds.iter().find(|(name, _)| *name == pk.as_str()) {
                    Some((_, placeholder)) => condition_exprs.push(substitute(
                        &self.templates.condition_expr,
                        &[
                            ("pk_name", dialect.quote(pk).as_str()),
                            ("pk_value", placeholder),
                        ],
                    )),
                    None => {
                        unresolved = true;
                        break;
                    }
                }
            }

            if unresolved || condition_exprs.is_empty() || pairs.is_empty() {
                tracing::debug!(
                    row = i,
                    table = %self.schema.full_name,
                    "Skipping update row without resolvable key or assignments"
                );
                continue;
            }

            statements.push(substitute(
                &self.templates.row_statement,
                &[
                    ("table", table.as_str()),
                    ("pairs", &pairs.join(&self.templates.pair_glue)),
                    ("condition", &condition_exprs.join(&self.templates.condition_join)),
                ],
            ));
        }

        if statements.is_empty() {
            return BatchCommand::empty();
        }

        BatchCommand::new(statements.join(&self.templates.statement_glue), params)
    }
}

/// Case-insensitive attribute lookup, matching schema column resolution.
fn lookup<'r>(row: &'r Row, name: &str) -> Option<&'r Value> {
    row.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}
