//! Shared fixtures: a scripted in-memory connection, a static schema catalog,
//! and record types exercising the capability surface.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use sqlbatch::{
    BatchRecord, ColumnDef, Connection, Cx, Dialect, Error, Outcome, Row, SchemaProvider, SqlType,
    TableSchema, Value,
};

pub fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

/// Connection double that records every statement and replays scripted
/// results in FIFO order. Unscripted executes report 0 affected rows;
/// unscripted queries return no rows.
pub struct MockConnection {
    dialect: Dialect,
    pub executed: Mutex<Vec<(String, Vec<Value>)>>,
    pub queried: Mutex<Vec<(String, Vec<Value>)>>,
    execute_results: Mutex<VecDeque<u64>>,
    query_results: Mutex<VecDeque<Vec<Row>>>,
}

impl MockConnection {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            executed: Mutex::new(Vec::new()),
            queried: Mutex::new(Vec::new()),
            execute_results: Mutex::new(VecDeque::new()),
            query_results: Mutex::new(VecDeque::new()),
        }
    }

    pub fn script_execute(&self, affected: u64) {
        self.execute_results.lock().unwrap().push_back(affected);
    }

    pub fn script_query(&self, rows: Vec<Row>) {
        self.query_results.lock().unwrap().push_back(rows);
    }

    /// Script a single-cell result row, e.g. a last-insert-id or probe value.
    pub fn script_scalar(&self, value: Value) {
        let mut row = Row::new();
        row.set("value", value);
        self.script_query(vec![row]);
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub fn queried_sql(&self) -> Vec<String> {
        self.queried
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub fn statement_count(&self) -> usize {
        self.executed.lock().unwrap().len() + self.queried.lock().unwrap().len()
    }
}

impl Connection for MockConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn query(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send {
        self.queried
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        let rows = self
            .query_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        async move { Outcome::Ok(rows) }
    }

    fn execute(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        self.executed
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        let affected = self
            .execute_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(0);
        async move { Outcome::Ok(affected) }
    }
}

/// Fixed in-memory catalog with the three tables the tests use.
pub struct StaticProvider {
    tables: HashMap<String, TableSchema>,
}

impl StaticProvider {
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        tables.insert(
            "user".to_string(),
            TableSchema::new("user")
                .sequence("user_id_seq")
                .column(
                    ColumnDef::new("id", SqlType::BigInt)
                        .primary_key()
                        .auto_increment(),
                )
                .column(ColumnDef::new("username", SqlType::Text))
                .column(ColumnDef::new("password", SqlType::Text)),
        );
        tables.insert(
            "assignment".to_string(),
            TableSchema::new("assignment")
                .column(ColumnDef::new("user_id", SqlType::BigInt).primary_key())
                .column(ColumnDef::new("dept_id", SqlType::BigInt).primary_key())
                .column(ColumnDef::new("role", SqlType::Text)),
        );
        tables.insert(
            "country".to_string(),
            TableSchema::new("country")
                .column(ColumnDef::new("code", SqlType::Text).primary_key())
                .column(ColumnDef::new("label", SqlType::Text)),
        );
        Self { tables }
    }
}

impl SchemaProvider for StaticProvider {
    fn table_schema(&self, table: &str) -> Option<TableSchema> {
        self.tables.get(table).cloned()
    }
}

/// Auto-increment keyed record, with hook markers.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub password: String,
    pub normalized: bool,
    pub audited: bool,
}

impl User {
    pub fn fresh(username: &str) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            password: username.to_string(),
            normalized: false,
            audited: false,
        }
    }
}

impl BatchRecord for User {
    fn table_name(&self) -> String {
        "user".to_string()
    }

    fn to_row(&self, attribute_filter: &[&str]) -> Row {
        let mut row = Row::new();
        row.set("id", Value::from(self.id));
        row.set("username", Value::from(self.username.clone()));
        row.set("password", Value::from(self.password.clone()));
        apply_filter(row, attribute_filter)
    }

    fn primary_key(&self) -> Row {
        let mut row = Row::new();
        row.set("id", Value::from(self.id));
        row
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        match name {
            "id" => self.id = value.as_i64(),
            "username" => self.username = value.as_str().unwrap_or_default().to_string(),
            "password" => self.password = value.as_str().unwrap_or_default().to_string(),
            _ => {}
        }
    }

    fn before_batch(records: &mut [Self]) {
        for record in records {
            record.normalized = true;
        }
    }

    fn after_batch_save(records: &mut [Self], inserted: &[usize], updated: &[usize]) {
        for &idx in inserted.iter().chain(updated) {
            if let Some(record) = records.get_mut(idx) {
                record.audited = true;
            }
        }
    }
}

/// Composite-keyed record with the updatable-key capability.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub user_id: i64,
    pub dept_id: i64,
    pub role: String,
    /// Key values as loaded from the store, when the record was loaded at all.
    pub loaded_key: Option<(i64, i64)>,
}

impl BatchRecord for Assignment {
    fn table_name(&self) -> String {
        "assignment".to_string()
    }

    fn to_row(&self, attribute_filter: &[&str]) -> Row {
        let mut row = Row::new();
        row.set("user_id", Value::BigInt(self.user_id));
        row.set("dept_id", Value::BigInt(self.dept_id));
        row.set("role", Value::from(self.role.clone()));
        apply_filter(row, attribute_filter)
    }

    fn primary_key(&self) -> Row {
        let mut row = Row::new();
        row.set("user_id", Value::BigInt(self.user_id));
        row.set("dept_id", Value::BigInt(self.dept_id));
        row
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        match name {
            "user_id" => self.user_id = value.as_i64().unwrap_or(self.user_id),
            "dept_id" => self.dept_id = value.as_i64().unwrap_or(self.dept_id),
            "role" => self.role = value.as_str().unwrap_or_default().to_string(),
            _ => {}
        }
    }

    fn old_key(&self) -> Option<Row> {
        let mut row = Row::new();
        match self.loaded_key {
            Some((user_id, dept_id)) => {
                row.set("user_id", Value::BigInt(user_id));
                row.set("dept_id", Value::BigInt(dept_id));
            }
            None => {
                row.set("user_id", Value::Null);
                row.set("dept_id", Value::Null);
            }
        }
        Some(row)
    }
}

/// Natural-key record relying on the explicit inserting hint.
#[derive(Debug, Clone)]
pub struct Country {
    pub code: String,
    pub label: String,
    pub fresh: bool,
}

impl BatchRecord for Country {
    fn table_name(&self) -> String {
        "country".to_string()
    }

    fn to_row(&self, attribute_filter: &[&str]) -> Row {
        let mut row = Row::new();
        row.set("code", Value::from(self.code.clone()));
        row.set("label", Value::from(self.label.clone()));
        apply_filter(row, attribute_filter)
    }

    fn primary_key(&self) -> Row {
        let mut row = Row::new();
        row.set("code", Value::from(self.code.clone()));
        row
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        match name {
            "code" => self.code = value.as_str().unwrap_or_default().to_string(),
            "label" => self.label = value.as_str().unwrap_or_default().to_string(),
            _ => {}
        }
    }

    fn inserting_hint(&self) -> Option<bool> {
        Some(self.fresh)
    }
}

fn apply_filter(row: Row, attribute_filter: &[&str]) -> Row {
    if attribute_filter.is_empty() {
        return row;
    }
    row.iter()
        .filter(|(name, _)| attribute_filter.contains(name))
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
