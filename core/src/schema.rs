//! Table schema description and inference from a data matrix.
//!
//! A [`TableSchema`] names a table, its ordered columns with their inferred
//! [`ColumnType`]s, and the attributes to index. It is built either from raw
//! data ([`TableSchema::from_data_matrix`]) or read back from the engine.
//!
//! # Dump format
//!
//! [`TableSchema::dumps`] lists one column per line, in column order, as
//! `"{name} {TYPE}"`:
//!
//! ```text
//! attr_a INTEGER
//! attr_b REAL
//! attr_c TEXT
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataError, Result};
use crate::infer::infer_column_types;
use crate::types::{ColumnType, Value};
use crate::validator::{validate_attr_name, validate_table_name};

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Storage category.
    pub column_type: ColumnType,
    /// Declared `NOT NULL`.
    #[serde(default)]
    pub not_null: bool,
    /// Part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnSchema {
    /// Creates a nullable, non-key column.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: false,
            primary_key: false,
        }
    }
}

/// Column layout of a table plus the attributes to index.
///
/// # Examples
///
/// ```
/// use simplesqlite_core::{ColumnType, TableSchema, Value};
///
/// let matrix = vec![
///     vec![Value::from(1), Value::from(1.1), Value::from("aaa")],
///     vec![Value::from(2), Value::from(2.2), Value::from("bbb")],
/// ];
/// let schema = TableSchema::from_data_matrix("sample", &["a", "b", "c"], &matrix, &["a"]).unwrap();
///
/// assert_eq!(schema.column("b").unwrap().column_type, ColumnType::Real);
/// assert_eq!(schema.dumps(), "a INTEGER\nb REAL\nc TEXT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub table_name: String,
    /// Columns in table order.
    pub columns: Vec<ColumnSchema>,
    /// Attributes that carry a single-column index.
    #[serde(default)]
    pub index_attrs: Vec<String>,
}

impl TableSchema {
    /// Creates a schema without indexes.
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            index_attrs: Vec::new(),
        }
    }

    /// Infers a schema from a (possibly ragged) data matrix.
    ///
    /// The schema always has exactly `column_names.len()` columns. Names are
    /// validated before anything is inferred.
    ///
    /// # Errors
    ///
    /// - [`DataError::NameValidation`] if the table name, a column name or an
    ///   index attribute is not a valid identifier.
    /// - [`DataError::ValueError`] if `column_names` is empty.
    /// - [`DataError::AttributeNotFound`] if an index attribute is not one of
    ///   `column_names`.
    pub fn from_data_matrix<S, I>(
        table_name: &str,
        column_names: &[S],
        data_matrix: &[Vec<Value>],
        index_attrs: &[I],
    ) -> Result<Self>
    where
        S: AsRef<str>,
        I: AsRef<str>,
    {
        validate_table_name(table_name)?;
        if column_names.is_empty() {
            return Err(DataError::ValueError(format!(
                "table '{table_name}' needs at least one column"
            )));
        }
        for name in column_names {
            validate_attr_name(name.as_ref())?;
        }
        for attr in index_attrs {
            let attr = attr.as_ref();
            validate_attr_name(attr)?;
            if !column_names.iter().any(|name| name.as_ref() == attr) {
                return Err(DataError::AttributeNotFound(format!(
                    "'{attr}' is not a column of '{table_name}'"
                )));
            }
        }

        let types = infer_column_types(data_matrix, column_names.len());
        let columns = column_names
            .iter()
            .zip(types)
            .map(|(name, column_type)| ColumnSchema::new(name.as_ref(), column_type))
            .collect::<Vec<_>>();

        debug!(
            table = table_name,
            rows = data_matrix.len(),
            columns = columns.len(),
            "inferred table schema"
        );

        Ok(Self {
            table_name: table_name.to_string(),
            columns,
            index_attrs: index_attrs.iter().map(|a| a.as_ref().to_string()).collect(),
        })
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column types in table order.
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|c| c.column_type).collect()
    }

    /// Renders the stable one-line-per-column dump.
    pub fn dumps(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.column_type))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dumps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NameValidationError;

    fn sample_matrix() -> Vec<Vec<Value>> {
        vec![
            vec![1.into(), 1.1.into(), "aaa".into(), 1.into(), 1.into()],
            vec![2.into(), 2.2.into(), "bbb".into(), 2.2.into(), 2.2.into()],
            vec![3.into(), 3.3.into(), "ccc".into(), 3.into(), "ccc".into()],
        ]
    }

    #[test]
    fn test_from_data_matrix_infers_types() {
        let schema = TableSchema::from_data_matrix(
            "sample_table",
            &["a", "b", "c", "d", "e"],
            &sample_matrix(),
            &["a"],
        )
        .unwrap();
        assert_eq!(
            schema.column_types(),
            vec![
                ColumnType::Integer,
                ColumnType::Real,
                ColumnType::Text,
                ColumnType::Real,
                ColumnType::Text,
            ]
        );
        assert_eq!(schema.index_attrs, vec!["a".to_string()]);
    }

    #[test]
    fn test_column_count_follows_names_not_rows() {
        let matrix = vec![vec![Value::from(1), Value::from(2), Value::from(3)], vec![]];
        let schema =
            TableSchema::from_data_matrix("t", &["x", "y"], &matrix, &[] as &[&str]).unwrap();
        assert_eq!(schema.column_names(), vec!["x", "y"]);

        let schema =
            TableSchema::from_data_matrix("t", &["x", "y", "z", "w"], &matrix, &[] as &[&str])
                .unwrap();
        assert_eq!(schema.column("w").unwrap().column_type, ColumnType::Null);
    }

    #[test]
    fn test_invalid_names_abort() {
        let matrix = sample_matrix();
        let err = TableSchema::from_data_matrix("table", &["a"], &matrix, &[] as &[&str]);
        assert!(matches!(
            err,
            Err(DataError::NameValidation(NameValidationError::InvalidReservedName { .. }))
        ));

        let err = TableSchema::from_data_matrix("t", &["a", "ASC"], &matrix, &[] as &[&str]);
        assert!(matches!(
            err,
            Err(DataError::NameValidation(NameValidationError::ValidReservedName { .. }))
        ));

        let err = TableSchema::from_data_matrix("t", &["a"], &matrix, &["b"]);
        assert!(matches!(err, Err(DataError::AttributeNotFound(_))));

        let err = TableSchema::from_data_matrix("t", &[] as &[&str], &matrix, &[] as &[&str]);
        assert!(matches!(err, Err(DataError::ValueError(_))));
    }

    #[test]
    fn test_dumps_lists_every_column_in_order() {
        let schema = TableSchema::new(
            "t",
            vec![
                ColumnSchema::new("id", ColumnType::Integer),
                ColumnSchema::new("payload", ColumnType::Blob),
                ColumnSchema::new("nothing", ColumnType::Null),
            ],
        );
        assert_eq!(schema.dumps(), "id INTEGER\npayload BLOB\nnothing NULL");
        assert_eq!(schema.to_string(), schema.dumps());
    }
}
