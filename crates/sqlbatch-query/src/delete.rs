//! Batched multi-row DELETE composition.

use sqlbatch_core::{Dialect, Row, TableSchema, Value};

use crate::command::BatchCommand;
use crate::templates::{DeleteTemplates, substitute};

/// Builds one DELETE statement per criteria row, joined into a single batched
/// command.
///
/// Every attribute present in a criteria row becomes an AND-joined equality
/// test; attributes naming no real column are ignored. A criteria row with no
/// usable attribute is skipped; an unconditioned DELETE must never escape a
/// batch.
///
/// When the dialect has a session row-count probe (`SELECT ROW_COUNT()` and
/// friends), it is appended as the final statement so drivers that only expose
/// the last statement's effect still yield a count.
#[derive(Debug)]
pub struct MultiRowDelete<'a> {
    schema: &'a TableSchema,
    criteria: &'a [Row],
    templates: DeleteTemplates,
}

impl<'a> MultiRowDelete<'a> {
    /// Create a builder deleting rows of `schema`'s table matching `criteria`.
    #[must_use]
    pub fn new(schema: &'a TableSchema, criteria: &'a [Row]) -> Self {
        Self {
            schema,
            criteria,
            templates: DeleteTemplates::default(),
        }
    }

    /// Replace the template set.
    #[must_use]
    pub fn templates(mut self, templates: DeleteTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Compose the batched DELETE command for `dialect`.
    ///
    /// Returns an empty command when no criteria row survives filtering.
    #[must_use]
    pub fn build(&self, dialect: Dialect) -> BatchCommand {
        let table = dialect.quote_table(&self.schema.full_name);
        let mut params: Vec<(String, Value)> = Vec::new();
        let mut statements: Vec<String> = Vec::new();

        for (i, criteria) in self.criteria.iter().enumerate() {
            let mut exprs: Vec<String> = Vec::new();
            for (attr, value) in criteria.iter() {
                let Some(col) = self.schema.find_column(attr) else {
                    continue;
                };
                let placeholder = format!("{attr}_{i}");
                exprs.push(substitute(
                    &self.templates.condition_expr,
                    &[
                        ("column", dialect.quote(&col.name).as_str()),
                        ("value", &format!(":{placeholder}")),
                    ],
                ));
                params.push((placeholder, col.cast(value)));
            }

            if exprs.is_empty() {
                tracing::debug!(
                    row = i,
                    table = %self.schema.full_name,
                    "Skipping delete criteria without any known column"
                );
                continue;
            }

            statements.push(substitute(
                &self.templates.statement,
                &[
                    ("table", table.as_str()),
                    ("condition", &exprs.join(&self.templates.condition_join)),
                ],
            ));
        }

        if statements.is_empty() {
            return BatchCommand::empty();
        }

        if let Some(probe) = dialect.row_count_probe() {
            statements.push(probe.to_string());
        }

        BatchCommand::new(statements.join(&self.templates.statement_glue), params)
    }
}
