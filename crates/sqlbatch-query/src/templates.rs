//! Pluggable SQL text templates.
//!
//! Statement shapes are data: each template is a string with named
//! substitution slots in `{braces}`. Dialects that need a different UPDATE or
//! DELETE surface swap the template set; the composition algorithms never
//! change.

use serde::{Deserialize, Serialize};

/// Replace `{slot}` markers in `template` with the paired replacements.
///
/// Unknown slots are left verbatim so a template typo surfaces in the SQL
/// instead of vanishing silently.
#[must_use]
pub fn substitute(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (slot, replacement) in replacements {
        out = out.replace(&format!("{{{slot}}}"), replacement);
    }
    out
}

/// Template set for batched multi-row UPDATE commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTemplates {
    /// Per-row statement. Slots: `{table}`, `{pairs}`, `{condition}`.
    pub row_statement: String,
    /// One SET assignment. Slots: `{column}`, `{value}`.
    pub column_assign: String,
    /// Glue between SET assignments.
    pub pair_glue: String,
    /// One key equality test. Slots: `{pk_name}`, `{pk_value}`.
    pub condition_expr: String,
    /// Glue between key equality tests (composite keys).
    pub condition_join: String,
    /// Glue between per-row statements.
    pub statement_glue: String,
}

impl Default for UpdateTemplates {
    fn default() -> Self {
        Self {
            row_statement: "UPDATE {table} SET {pairs} WHERE {condition}".to_string(),
            column_assign: "{column}={value}".to_string(),
            pair_glue: ",".to_string(),
            condition_expr: "{pk_name}={pk_value}".to_string(),
            condition_join: " AND ".to_string(),
            statement_glue: ";".to_string(),
        }
    }
}

/// Template set for batched multi-row DELETE commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTemplates {
    /// Per-criteria-row statement. Slots: `{table}`, `{condition}`.
    pub statement: String,
    /// One attribute equality test. Slots: `{column}`, `{value}`.
    pub condition_expr: String,
    /// Glue between attribute equality tests.
    pub condition_join: String,
    /// Glue between per-row statements.
    pub statement_glue: String,
}

impl Default for DeleteTemplates {
    fn default() -> Self {
        Self {
            statement: "DELETE FROM {table} WHERE {condition}".to_string(),
            condition_expr: "{column}={value}".to_string(),
            condition_join: " AND ".to_string(),
            statement_glue: ";".to_string(),
        }
    }
}
