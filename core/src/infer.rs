//! Column type inference.
//!
//! The type of a column is the most dominant category among its non-null
//! values (`Blob > Text > Real > Integer`), or [`ColumnType::Null`] when
//! there are none. Classification looks only at the shape of each value:
//! text that happens to look numeric is still text.

use crate::types::{ColumnType, Value};

static NULL: Value = Value::Null;

/// Classifies a single value; `None` for nulls.
pub fn classify(value: &Value) -> Option<ColumnType> {
    match value {
        Value::Null => None,
        Value::Integer(_) => Some(ColumnType::Integer),
        Value::Real(_) => Some(ColumnType::Real),
        Value::Text(_) => Some(ColumnType::Text),
        Value::Blob(_) => Some(ColumnType::Blob),
    }
}

/// Infers the storage category of a column from its values.
///
/// The result does not depend on the order of `values`.
///
/// # Examples
///
/// ```
/// use simplesqlite_core::{ColumnType, Value, infer_column_type};
///
/// let column = [Value::from(1), Value::Null, Value::from(2.5)];
/// assert_eq!(infer_column_type(&column), ColumnType::Real);
///
/// let column = [Value::from(1), Value::from("2")];
/// assert_eq!(infer_column_type(&column), ColumnType::Text);
///
/// assert_eq!(infer_column_type(&[Value::Null]), ColumnType::Null);
/// ```
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    values
        .into_iter()
        .filter_map(classify)
        .max()
        .unwrap_or(ColumnType::Null)
}

/// Yields the cell at `index` of every row, substituting null for rows that
/// are too short.
pub fn column_values(data_matrix: &[Vec<Value>], index: usize) -> impl Iterator<Item = &Value> {
    data_matrix
        .iter()
        .map(move |row| row.get(index).unwrap_or(&NULL))
}

/// Infers one type per column of a (possibly ragged) data matrix.
pub fn infer_column_types(data_matrix: &[Vec<Value>], column_count: usize) -> Vec<ColumnType> {
    (0..column_count)
        .map(|index| infer_column_type(column_values(data_matrix, index)))
        .collect()
}
