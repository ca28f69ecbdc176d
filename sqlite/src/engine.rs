//! The engine contract and its `rusqlite` implementation.
//!
//! Everything above this module talks to the database through
//! [`SqlEngine`]: execute a statement, fetch rows, read a table's schema
//! back. [`Connection`] implements it directly, and so does a
//! [`Transaction`](rusqlite::Transaction) through `Deref`.
//!
//! Because `Connection` has an inherent `execute`, call the trait method
//! explicitly when holding a concrete connection:
//!
//! ```
//! use rusqlite::Connection;
//! use simplesqlite_core::Value;
//! use simplesqlite_sqlite::SqlEngine;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! SqlEngine::execute(&conn, "CREATE TABLE t (a INTEGER, b TEXT)", &[]).unwrap();
//! SqlEngine::execute(&conn, "INSERT INTO t VALUES (?,?)", &[Value::from(1), Value::from("x")]).unwrap();
//!
//! let rows = conn.fetch_rows("SELECT a, b FROM t", &[]).unwrap();
//! assert_eq!(rows, vec![vec![Value::from(1), Value::from("x")]]);
//! ```

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use simplesqlite_core::{ColumnSchema, ColumnType, TableSchema, Value};
use tracing::debug;

use crate::error::Result;

/// Minimal interface the schema builder needs from a database.
pub trait SqlEngine {
    /// Executes one statement with positional parameters and returns the
    /// number of rows it changed.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize>;

    /// Runs a query and returns every row as a list of values.
    fn fetch_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>>;

    /// Reads back the schema of `table`, or `None` if it does not exist.
    /// Table names match case-insensitively.
    fn schema_of(&self, table: &str) -> Result<Option<TableSchema>>;
}

/// Converts a cell into the value type `rusqlite` binds.
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(bytes) => SqlValue::Blob(bytes.clone()),
    }
}

/// Converts a borrowed result cell into an owned [`Value`].
///
/// Text that is not valid UTF-8 is decoded lossily.
pub fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

impl SqlEngine for Connection {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        debug!(sql, params = params.len(), "execute");
        let changed = Connection::execute(self, sql, params_from_iter(params.iter().map(to_sql_value)))?;
        Ok(changed)
    }

    fn fetch_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        debug!(sql, params = params.len(), "fetch");
        let mut stmt = self.prepare(sql)?;
        let column_count = stmt.column_count();
        let rows = stmt.query_map(params_from_iter(params.iter().map(to_sql_value)), |row| {
            (0..column_count)
                .map(|i| row.get_ref(i).map(from_value_ref))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn schema_of(&self, table: &str) -> Result<Option<TableSchema>> {
        let exists: i64 = self.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            [table],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Ok(None);
        }

        let mut stmt = self.prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let columns = stmt
            .query_map([table], |row| {
                let name: String = row.get(0)?;
                let declared: Option<String> = row.get(1)?;
                let not_null: bool = row.get(2)?;
                let pk: i64 = row.get(3)?;
                Ok(ColumnSchema {
                    name,
                    column_type: ColumnType::from_declared(declared.as_deref().unwrap_or("")),
                    not_null,
                    primary_key: pk > 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut schema = TableSchema::new(table, columns);
        let indexed = single_column_indexes(self, table)?;
        // Report index attributes in column order, each once.
        schema.index_attrs = schema
            .columns
            .iter()
            .filter(|column| indexed.contains(&column.name))
            .map(|column| column.name.clone())
            .collect();

        debug!(table, columns = schema.columns.len(), "read table schema");
        Ok(Some(schema))
    }
}

/// Columns covered by a single-column index created with `CREATE INDEX`.
fn single_column_indexes(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_index_list(?1) WHERE origin = 'c'")?;
    let index_names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut info = conn.prepare("SELECT name FROM pragma_index_info(?1)")?;
    let mut columns = Vec::new();
    for index_name in index_names {
        let indexed = info
            .query_map([&index_name], |row| row.get::<_, Option<String>>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        if let [Some(column)] = indexed.as_slice() {
            columns.push(column.clone());
        }
    }
    Ok(columns)
}
