//! Table creation from a data matrix.
//!
//! [`create_table_from_data_matrix`] is the whole pipeline: validate names,
//! infer column types, normalize records, then issue `CREATE TABLE`, one
//! parameterized `INSERT` per row and one `CREATE INDEX` per index
//! attribute. Every validation happens before the first statement runs.

use serde::Serialize;
use simplesqlite_core::{IfExists, Row, TableSchema, Value, make_insert, to_record};
use simplesqlite_loader::TableData;
use tracing::{debug, info};

use crate::engine::SqlEngine;
use crate::error::{Result, SqliteError};
use crate::schema::{create_index_sql, create_table_sql, drop_table_sql};

/// What happened to a table during creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOutcome {
    /// The table did not exist and was created.
    Created,
    /// The table existed and was left untouched.
    Skipped,
    /// The table existed, was dropped and created again.
    Replaced,
}

impl TableOutcome {
    /// Lowercase name for reports.
    pub fn as_str(self) -> &'static str {
        match self {
            TableOutcome::Created => "created",
            TableOutcome::Skipped => "skipped",
            TableOutcome::Replaced => "replaced",
        }
    }
}

/// Creates and fills a table whose column types are inferred from the data.
///
/// Rows shorter than `column_names` are padded with nulls; longer rows are
/// truncated.
///
/// # Errors
///
/// - [`SqliteError::DataError`] if a name is invalid, `column_names` is
///   empty, or an index attribute is not a column.
/// - [`SqliteError::TableAlreadyExists`] if the table exists and
///   `if_exists` is [`IfExists::Fail`].
/// - [`SqliteError::DatabaseError`] for any engine failure, unchanged.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use simplesqlite_core::{IfExists, Value};
/// use simplesqlite_sqlite::{SqlEngine, TableOutcome, create_table_from_data_matrix};
///
/// let conn = Connection::open_in_memory().unwrap();
/// let matrix = vec![
///     vec![Value::from(1), Value::from(1.1), Value::from("aaa")],
///     vec![Value::from(2), Value::from(2.2), Value::from("bbb")],
/// ];
/// let outcome = create_table_from_data_matrix(
///     &conn, "sample", &["a", "b", "c"], &matrix, &["a"], IfExists::Fail,
/// ).unwrap();
///
/// assert_eq!(outcome, TableOutcome::Created);
/// let schema = conn.schema_of("sample").unwrap().unwrap();
/// assert_eq!(schema.dumps(), "a INTEGER\nb REAL\nc TEXT");
/// ```
pub fn create_table_from_data_matrix<E, S, I>(
    engine: &E,
    table_name: &str,
    column_names: &[S],
    data_matrix: &[Vec<Value>],
    index_attrs: &[I],
    if_exists: IfExists,
) -> Result<TableOutcome>
where
    E: SqlEngine + ?Sized,
    S: AsRef<str>,
    I: AsRef<str>,
{
    let schema = TableSchema::from_data_matrix(table_name, column_names, data_matrix, index_attrs)?;
    let records = data_matrix
        .iter()
        .map(|row| to_record(Some(column_names), &Row::Sequence(row.clone())))
        .collect::<simplesqlite_core::Result<Vec<_>>>()?;

    let outcome = match (engine.schema_of(table_name)?, if_exists) {
        (None, _) => TableOutcome::Created,
        (Some(_), IfExists::Fail) => {
            return Err(SqliteError::TableAlreadyExists(table_name.to_string()));
        }
        (Some(_), IfExists::Skip) => {
            info!(table = table_name, "table exists, skipping");
            return Ok(TableOutcome::Skipped);
        }
        (Some(_), IfExists::Replace) => {
            engine.execute(&drop_table_sql(table_name), &[])?;
            TableOutcome::Replaced
        }
    };

    engine.execute(&create_table_sql(&schema, false), &[])?;
    debug!(table = table_name, schema = %schema.dumps(), "created table");

    if let Some(first) = records.first() {
        let insert = make_insert(table_name, first)?;
        for record in &records {
            engine.execute(&insert, record)?;
        }
    }

    for attr in &schema.index_attrs {
        engine.execute(&create_index_sql(table_name, attr, false), &[])?;
    }

    info!(
        table = table_name,
        rows = records.len(),
        indexes = schema.index_attrs.len(),
        outcome = outcome.as_str(),
        "materialized table"
    );
    Ok(outcome)
}

/// Creates a table from loaded [`TableData`].
///
/// Only the index attributes that are headers of this table are indexed, so
/// one attribute list can be applied to every table of a multi-table load.
///
/// # Errors
///
/// Same as [`create_table_from_data_matrix`].
pub fn create_table_from_table_data<E, I>(
    engine: &E,
    table_data: &TableData,
    index_attrs: &[I],
    if_exists: IfExists,
) -> Result<TableOutcome>
where
    E: SqlEngine + ?Sized,
    I: AsRef<str>,
{
    let data_matrix = table_data.to_data_matrix()?;
    let applicable: Vec<&str> = index_attrs
        .iter()
        .map(AsRef::as_ref)
        .filter(|attr| table_data.headers.iter().any(|header| header == attr))
        .collect();

    create_table_from_data_matrix(
        engine,
        &table_data.table_name,
        table_data.headers.as_slice(),
        &data_matrix,
        applicable.as_slice(),
        if_exists,
    )
}
