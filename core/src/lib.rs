//! Engine-independent building blocks for SQLite table creation.
//!
//! This crate holds everything that can be decided without a database
//! connection:
//!
//! - [`validate_name`] and friends: identifier checks against SQLite's
//!   reserved keywords, with separate rules for table and attribute names
//!   ([`NameContext`]).
//! - [`infer_column_type`]: column storage category from the values it holds,
//!   with dominance `Blob > Text > Real > Integer > Null`.
//! - [`to_record`] / [`to_records`]: normalization of sequence, mapping and
//!   named-record rows into positional value lists.
//! - [`TableSchema`]: a table layout inferred from a data matrix, with a
//!   stable text dump.
//! - [`make_insert`], [`make_update`], [`make_where_in`],
//!   [`make_where_not_in`]: SQL fragment builders.
//!
//! # Example
//!
//! ```
//! use simplesqlite_core::*;
//!
//! let rows = vec![
//!     Row::from(vec![Value::from(1), Value::from("a")]),
//!     Row::from(NamedRecord::new(["id", "name"], [Value::from(2), Value::from(2.5)])),
//! ];
//! let attrs = ["id", "name"];
//! let matrix = to_records(Some(&attrs[..]), Some(rows.as_slice())).unwrap();
//! assert_eq!(matrix[1], vec![Value::from(2), Value::from(2.5)]);
//!
//! let schema = TableSchema::from_data_matrix("people", &attrs, &matrix, &["id"]).unwrap();
//! assert_eq!(schema.dumps(), "id INTEGER\nname TEXT");
//!
//! assert_eq!(make_insert("people", &matrix[0]).unwrap(), "INSERT INTO people VALUES (?,?)");
//! ```

mod convert;
mod error;
mod infer;
mod query;
mod schema;
mod types;
mod validator;

pub use convert::{NamedRecord, Row, to_record, to_records};
pub use error::{DataError, NameValidationError, Result};
pub use infer::{classify, column_values, infer_column_type, infer_column_types};
pub use query::{
    WhereOperator, make_insert, make_insert_into, make_select, make_update, make_where,
    make_where_in, make_where_not_in, quote_identifier,
};
pub use schema::{ColumnSchema, TableSchema};
pub use types::{ColumnType, IfExists, Value};
pub use validator::{
    NameContext, ReservedKeywords, is_unprintable, validate_attr_name, validate_name,
    validate_table_name, validate_value_name,
};
