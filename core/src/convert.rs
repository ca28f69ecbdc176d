//! Normalization of row-like inputs into records.
//!
//! A [`Row`] is one of a closed set of shapes: a positional sequence, a
//! name-keyed mapping, or a [`NamedRecord`] exposing named fields. The
//! convertor aligns any of them to an ordered list of attribute names and
//! produces a [`Vec<Value>`] of exactly that length.
//!
//! Dispatch follows the variant tag in a fixed order (sequence, mapping,
//! named record); strategies are never combined.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use simplesqlite_core::{NamedRecord, Row, Value, to_record};
//!
//! let names = ["a", "b"];
//!
//! let row = Row::from(vec![Value::from(5), Value::from(6), Value::from(7)]);
//! assert_eq!(to_record(Some(&names[..]), &row).unwrap(), vec![Value::from(5), Value::from(6)]);
//!
//! let mut map = HashMap::new();
//! map.insert("a".to_string(), Value::from(5));
//! assert_eq!(to_record(Some(&names[..]), &Row::from(map)).unwrap(), vec![Value::from(5), Value::Null]);
//!
//! let record = NamedRecord::new(["a", "b", "c"], [5, 6, 7]);
//! assert_eq!(to_record(Some(&names[..]), &Row::from(record)).unwrap(), vec![Value::from(5), Value::from(6)]);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{DataError, Result};
use crate::types::Value;

/// An ordered set of named fields, the record-like row shape.
///
/// Field lookup is by name; fields not requested by the target attribute
/// list are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedRecord {
    fields: Vec<(String, Value)>,
}

impl NamedRecord {
    /// Builds a record by zipping field names with values.
    ///
    /// Surplus names or values are dropped.
    pub fn new<N, V>(
        names: impl IntoIterator<Item = N>,
        values: impl IntoIterator<Item = V>,
    ) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let fields = names
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { fields }
    }

    /// Appends a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A row-like input awaiting normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// No data at all.
    Null,
    /// Values in attribute order.
    Sequence(Vec<Value>),
    /// Values keyed by attribute name.
    Mapping(HashMap<String, Value>),
    /// Values exposed as named fields.
    Record(NamedRecord),
}

impl Row {
    /// Converts a JSON value into a row.
    ///
    /// Arrays are probed first (sequence), then objects (mapping); `null`
    /// becomes [`Row::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`DataError::TypeError`] for scalar JSON values, which are not
    /// row-like.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(items) => {
                Ok(Row::Sequence(items.iter().map(Value::from_json).collect()))
            }
            serde_json::Value::Object(map) => Ok(Row::Mapping(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            )),
            serde_json::Value::Null => Ok(Row::Null),
            other => Err(DataError::TypeError(format!("expected a row-like value, got {other}"))),
        }
    }

    /// Converts any serializable record-like value into a row.
    ///
    /// Structs and maps become [`Row::Record`], tuples and sequences become
    /// [`Row::Sequence`], and `None`/unit becomes [`Row::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`DataError::TypeError`] if the value does not serialize to a
    /// row-like shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::Serialize;
    /// use simplesqlite_core::{Row, Value, to_record};
    ///
    /// #[derive(Serialize)]
    /// struct Point { x: i64, y: Option<i64> }
    ///
    /// let row = Row::from_serialize(&Point { x: 1, y: None }).unwrap();
    /// let names = ["y", "x"];
    /// assert_eq!(to_record(Some(&names[..]), &row).unwrap(), vec![Value::Null, Value::from(1)]);
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)
            .map_err(|e| DataError::TypeError(format!("cannot serialize row: {e}")))?;
        match json {
            serde_json::Value::Object(map) => Ok(Row::Record(NamedRecord {
                fields: map
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            })),
            other => Row::from_json(&other),
        }
    }

    /// Whether this is [`Row::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Row::Null)
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::Sequence(values)
    }
}

impl From<HashMap<String, Value>> for Row {
    fn from(map: HashMap<String, Value>) -> Self {
        Row::Mapping(map)
    }
}

impl From<NamedRecord> for Row {
    fn from(record: NamedRecord) -> Self {
        Row::Record(record)
    }
}

impl<T: Into<Row>> From<Option<T>> for Row {
    fn from(row: Option<T>) -> Self {
        row.map_or(Row::Null, Into::into)
    }
}

/// Normalizes one row into a record aligned to `attr_names`.
///
/// # Errors
///
/// - [`DataError::TypeError`] if `attr_names` is `None`.
/// - [`DataError::ValueError`] if `row` is [`Row::Null`].
pub fn to_record<S: AsRef<str>>(attr_names: Option<&[S]>, row: &Row) -> Result<Vec<Value>> {
    let attr_names = require_attr_names(attr_names)?;
    align(attr_names, row)
}

/// Normalizes every row of a collection, preserving order and count.
///
/// # Errors
///
/// - [`DataError::TypeError`] if `attr_names` or `rows` is `None`.
/// - [`DataError::ValueError`] if any element is [`Row::Null`]; the message
///   carries the element's index.
pub fn to_records<S: AsRef<str>>(
    attr_names: Option<&[S]>,
    rows: Option<&[Row]>,
) -> Result<Vec<Vec<Value>>> {
    let attr_names = require_attr_names(attr_names)?;
    let rows = rows.ok_or_else(|| DataError::TypeError("rows must be a sequence, got null".into()))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            align(attr_names, row).map_err(|err| match err {
                DataError::ValueError(msg) => DataError::ValueError(format!("row {index}: {msg}")),
                other => other,
            })
        })
        .collect()
}

fn require_attr_names<S: AsRef<str>>(attr_names: Option<&[S]>) -> Result<&[S]> {
    attr_names.ok_or_else(|| DataError::TypeError("attribute names must be a sequence, got null".into()))
}

fn align<S: AsRef<str>>(attr_names: &[S], row: &Row) -> Result<Vec<Value>> {
    let width = attr_names.len();
    match row {
        Row::Null => Err(DataError::ValueError("record is null".into())),
        Row::Sequence(values) => {
            let mut record: Vec<Value> = values.iter().take(width).cloned().collect();
            record.resize(width, Value::Null);
            Ok(record)
        }
        Row::Mapping(map) => Ok(attr_names
            .iter()
            .map(|name| map.get(name.as_ref()).cloned().unwrap_or_default())
            .collect()),
        Row::Record(record) => Ok(attr_names
            .iter()
            .map(|name| record.get(name.as_ref()).cloned().unwrap_or_default())
            .collect()),
    }
}
