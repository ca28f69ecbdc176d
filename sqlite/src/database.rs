//! High-level access to a SQLite database.
//!
//! [`SimpleSqlite`] owns a connection and bundles table creation, loading,
//! record insertion, updates and introspection behind one type. Every
//! multi-statement operation runs inside a transaction.
//!
//! # Example
//!
//! ```
//! use simplesqlite_core::{IfExists, Row, Value};
//! use simplesqlite_sqlite::SimpleSqlite;
//!
//! let db = SimpleSqlite::open_in_memory().unwrap();
//! db.create_table_from_data_matrix(
//!     "sample",
//!     &["attr_a", "attr_b"],
//!     &[vec![Value::from(1), Value::from("a")]],
//!     &[] as &[&str],
//!     IfExists::Fail,
//! )
//! .unwrap();
//!
//! db.insert("sample", &Row::from(vec![Value::from(2), Value::from("b")])).unwrap();
//! assert_eq!(db.count_records("sample").unwrap(), 2);
//! assert_eq!(db.fetch_table_names().unwrap(), vec!["sample"]);
//! ```

use std::path::Path;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use simplesqlite_core::{
    IfExists, Row, TableSchema, Value, make_insert, make_select, make_update, quote_identifier,
    to_records, validate_table_name,
};
use simplesqlite_loader::{TableData, TableLoader};
use tracing::info;

use crate::builder::{self, TableOutcome};
use crate::engine::SqlEngine;
use crate::error::{Result, SqliteError};

/// One row of `sqlite_master`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteMasterEntry {
    /// Object kind: `table`, `index`, `view` or `trigger`.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object name.
    pub name: String,
    /// Table the object belongs to.
    pub tbl_name: String,
    /// Root b-tree page, zero for views and triggers.
    pub rootpage: i64,
    /// Creating statement; absent for automatic indexes.
    pub sql: Option<String>,
}

/// Result of materializing one loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedTable {
    /// Table name.
    pub table_name: String,
    /// Rows in the loaded data (zero inserted when skipped).
    pub rows: usize,
    /// What happened to the table.
    pub outcome: TableOutcome,
}

/// Report of a [`SimpleSqlite::load`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// One entry per table, in load order.
    pub tables: Vec<LoadedTable>,
}

impl LoadReport {
    /// Number of tables with the given outcome.
    pub fn count(&self, outcome: TableOutcome) -> usize {
        self.tables.iter().filter(|t| t.outcome == outcome).count()
    }

    /// Appends the entries of another report.
    pub fn extend(&mut self, other: LoadReport) {
        self.tables.extend(other.tables);
    }
}

/// A SQLite database with table-creation conveniences.
pub struct SimpleSqlite {
    conn: Connection,
}

impl SimpleSqlite {
    /// Wraps an existing connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (creating if needed) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Connection::open(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the wrapper and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Creates and fills a table from a data matrix in one transaction.
    ///
    /// See [`builder::create_table_from_data_matrix`] for the semantics.
    pub fn create_table_from_data_matrix<S, I>(
        &self,
        table_name: &str,
        column_names: &[S],
        data_matrix: &[Vec<Value>],
        index_attrs: &[I],
        if_exists: IfExists,
    ) -> Result<TableOutcome>
    where
        S: AsRef<str>,
        I: AsRef<str>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let outcome = builder::create_table_from_data_matrix(
            &*tx,
            table_name,
            column_names,
            data_matrix,
            index_attrs,
            if_exists,
        )?;
        tx.commit()?;
        Ok(outcome)
    }

    /// Creates and fills a table from loaded data in one transaction.
    pub fn create_table_from_table_data<I: AsRef<str>>(
        &self,
        table_data: &TableData,
        index_attrs: &[I],
        if_exists: IfExists,
    ) -> Result<TableOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        let outcome =
            builder::create_table_from_table_data(&*tx, table_data, index_attrs, if_exists)?;
        tx.commit()?;
        Ok(outcome)
    }

    /// Loads every table of `loader` and materializes them in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::LoaderError`] if loading fails, or any error of
    /// [`create_table_from_table_data`](Self::create_table_from_table_data);
    /// nothing is committed in either case.
    pub fn load<I: AsRef<str>>(
        &self,
        loader: &dyn TableLoader,
        index_attrs: &[I],
        if_exists: IfExists,
    ) -> Result<LoadReport> {
        let tables = loader.load()?;
        self.materialize(&tables, index_attrs, if_exists)
    }

    /// Materializes already loaded tables in one transaction.
    pub fn materialize<I: AsRef<str>>(
        &self,
        tables: &[TableData],
        index_attrs: &[I],
        if_exists: IfExists,
    ) -> Result<LoadReport> {
        let tx = self.conn.unchecked_transaction()?;
        let mut report = LoadReport::default();
        for table in tables {
            let outcome = builder::create_table_from_table_data(&*tx, table, index_attrs, if_exists)?;
            report.tables.push(LoadedTable {
                table_name: table.table_name.clone(),
                rows: table.len(),
                outcome,
            });
        }
        tx.commit()?;

        info!(
            tables = report.tables.len(),
            created = report.count(TableOutcome::Created),
            replaced = report.count(TableOutcome::Replaced),
            skipped = report.count(TableOutcome::Skipped),
            "load finished"
        );
        Ok(report)
    }

    /// Inserts one row, aligned to the table's columns.
    pub fn insert(&self, table: &str, row: &Row) -> Result<()> {
        self.insert_many(table, std::slice::from_ref(row))?;
        Ok(())
    }

    /// Inserts rows in one transaction and returns how many were inserted.
    ///
    /// # Errors
    ///
    /// - [`SqliteError::TableNotFound`] if the table does not exist.
    /// - [`SqliteError::DataError`] if a row is null.
    pub fn insert_many(&self, table: &str, rows: &[Row]) -> Result<usize> {
        let schema = self.require_schema(table)?;
        let names = schema.column_names();
        let records = to_records(Some(names.as_slice()), Some(rows))?;
        let Some(first) = records.first() else {
            return Ok(0);
        };

        let insert = make_insert(table, first)?;
        let tx = self.conn.unchecked_transaction()?;
        for record in &records {
            SqlEngine::execute(&*tx, &insert, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Runs an `UPDATE` and returns the number of changed rows.
    pub fn update(&self, table: &str, set_clause: &str, where_clause: Option<&str>) -> Result<usize> {
        self.require_table(table)?;
        let sql = make_update(table, set_clause, where_clause)?;
        SqlEngine::execute(&self.conn, &sql, &[])
    }

    /// Runs a `SELECT` and returns the rows.
    pub fn select<S: AsRef<str>>(
        &self,
        columns: &[S],
        table: &str,
        where_clause: Option<&str>,
    ) -> Result<Vec<Vec<Value>>> {
        self.require_table(table)?;
        let sql = make_select(columns, table, where_clause)?;
        self.conn.fetch_rows(&sql, &[])
    }

    /// Whether a table with this name exists, compared case-insensitively
    /// as SQLite resolves table names.
    pub fn has_table(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Names of all user tables, sorted.
    pub fn fetch_table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Reads back a table's schema.
    pub fn schema_of(&self, table: &str) -> Result<Option<TableSchema>> {
        self.conn.schema_of(table)
    }

    /// Number of rows in a table.
    pub fn count_records(&self, table: &str) -> Result<usize> {
        self.require_table(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Every row of `sqlite_master`, tables first.
    pub fn fetch_sqlite_master(&self) -> Result<Vec<SqliteMasterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT type, name, tbl_name, rootpage, sql FROM sqlite_master \
             ORDER BY CASE type WHEN 'table' THEN 0 ELSE 1 END, tbl_name, name",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(SqliteMasterEntry {
                    object_type: row.get(0)?,
                    name: row.get(1)?,
                    tbl_name: row.get(2)?,
                    rootpage: row.get(3)?,
                    sql: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn require_table(&self, table: &str) -> Result<()> {
        validate_table_name(table)?;
        if self.has_table(table)? {
            Ok(())
        } else {
            Err(SqliteError::TableNotFound(table.to_string()))
        }
    }

    fn require_schema(&self, table: &str) -> Result<TableSchema> {
        validate_table_name(table)?;
        self.schema_of(table)?
            .ok_or_else(|| SqliteError::TableNotFound(table.to_string()))
    }
}
