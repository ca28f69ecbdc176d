//! SQLite table creation from loosely-typed data.
//!
//! This crate connects the engine-independent pieces of
//! `simplesqlite-core` to a real database through `rusqlite`:
//!
//! - **`engine`**: the [`SqlEngine`] contract (execute, fetch rows, read a
//!   table schema back), implemented for [`rusqlite::Connection`].
//! - **`schema`**: `CREATE TABLE` / `CREATE INDEX` / `DROP TABLE` generation.
//! - **`builder`**: [`create_table_from_data_matrix`], the validate, infer,
//!   create, insert, index pipeline with an explicit [`IfExists`] policy.
//! - **`database`**: the [`SimpleSqlite`] facade over an owned connection.
//!
//! # Quick start
//!
//! ```
//! use simplesqlite_core::{IfExists, Value};
//! use simplesqlite_sqlite::SimpleSqlite;
//!
//! let db = SimpleSqlite::open_in_memory().unwrap();
//! let matrix = vec![
//!     vec![Value::from(1), Value::from(1.1), Value::from("aaa")],
//!     vec![Value::from(2), Value::from(2.2), Value::from("bbb")],
//! ];
//! db.create_table_from_data_matrix("sample", &["a", "b", "c"], &matrix, &["a"], IfExists::Replace)
//!     .unwrap();
//!
//! let schema = db.schema_of("sample").unwrap().unwrap();
//! assert_eq!(schema.to_string(), "a INTEGER\nb REAL\nc TEXT");
//! ```
//!
//! [`IfExists`]: simplesqlite_core::IfExists

mod builder;
mod database;
mod engine;
mod error;
mod schema;

pub use builder::{TableOutcome, create_table_from_data_matrix, create_table_from_table_data};
pub use database::{LoadReport, LoadedTable, SimpleSqlite, SqliteMasterEntry};
pub use engine::{SqlEngine, from_value_ref, to_sql_value};
pub use error::{Result, SqliteError};
pub use schema::{column_definition, create_index_sql, create_table_sql, drop_table_sql, index_name};
