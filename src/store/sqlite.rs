use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{debug, info};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, Statement, params, params_from_iter};
use serde_json::{Number, Value};

use crate::conf::DatabaseConfig;
use crate::resource::ResourceDef;

use super::{Record, Store, StoreError};

/// [`Store`] over a single SQLite connection.
///
/// Queries run on the blocking pool; the connection is shared behind a mutex
/// so callers only ever hold it for one statement.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.path)?
        };
        conn.busy_timeout(config.busy_timeout)?;
        info!("Opened sqlite database at {}", config.path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(&DatabaseConfig::in_memory())
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn ensure_table(&self, def: &ResourceDef) -> Result<(), StoreError> {
        let mut columns = vec![String::from("id INTEGER PRIMARY KEY AUTOINCREMENT")];
        for field in &def.fields {
            columns.push(format!(
                "{} {} NOT NULL",
                quote_ident(&field.name),
                field.kind.sql_type()
            ));
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(&def.table),
            columns.join(", ")
        );
        debug!("{sql}");
        self.run(move |conn| {
            conn.execute(&sql, [])?;
            Ok(())
        })
        .await
    }

    async fn select_all(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", quote_ident(table));
        self.run(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let names = column_names(&stmt);
            let rows = stmt
                .query_map([], |row| row_to_record(row, &names))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn select_by_id(&self, table: &str, id: i64) -> Result<Option<Record>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", quote_ident(table));
        self.run(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let names = column_names(&stmt);
            let row = stmt
                .query_row(params![id], |row| row_to_record(row, &names))
                .optional()?;
            Ok(row)
        })
        .await
    }

    async fn insert(&self, table: &str, record: Record) -> Result<Record, StoreError> {
        if record.is_empty() {
            return Err(StoreError::EmptyRecord(table.to_string()));
        }
        let columns: Vec<String> = record.keys().map(|k| quote_ident(k)).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let values: Vec<SqlValue> = record.values().map(to_sql).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            quote_ident(table),
            columns.join(", "),
            placeholders.join(", ")
        );
        self.run(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let names = column_names(&stmt);
            let row = stmt.query_row(params_from_iter(values.iter()), |row| {
                row_to_record(row, &names)
            })?;
            Ok(row)
        })
        .await
    }

    async fn update(&self, table: &str, id: i64, record: Record) -> Result<usize, StoreError> {
        if record.is_empty() {
            return Err(StoreError::EmptyRecord(table.to_string()));
        }
        let assignments: Vec<String> = record
            .keys()
            .enumerate()
            .map(|(i, k)| format!("{} = ?{}", quote_ident(k), i + 1))
            .collect();
        let mut values: Vec<SqlValue> = record.values().map(to_sql).collect();
        values.push(SqlValue::Integer(id));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            quote_ident(table),
            assignments.join(", "),
            values.len()
        );
        self.run(move |conn| Ok(conn.execute(&sql, params_from_iter(values.iter()))?))
            .await
    }

    async fn delete(&self, table: &str, id: i64) -> Result<usize, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", quote_ident(table));
        self.run(move |conn| Ok(conn.execute(&sql, params![id])?))
            .await
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn row_to_record(row: &Row<'_>, names: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (i, name) in names.iter().enumerate() {
        record.insert(name.clone(), from_sql(row.get_ref(i)?));
    }
    Ok(record)
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => SqlValue::Integer(i),
            (None, Some(f)) => SqlValue::Real(f),
            (None, None) => SqlValue::Text(n.to_string()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
