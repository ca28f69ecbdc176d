//! Value and column type definitions.
//!
//! [`Value`] is the loosely-typed cell that flows from loaders and callers
//! into records and query parameters. [`ColumnType`] is the storage
//! category inferred for a whole column and rendered into DDL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single cell value, mirroring SQLite's storage classes.
///
/// # Examples
///
/// ```
/// use simplesqlite_core::Value;
///
/// assert_eq!(Value::from(5), Value::Integer(5));
/// assert_eq!(Value::from("abc"), Value::Text("abc".to_string()));
/// assert_eq!(Value::from(None::<i64>), Value::Null);
/// assert_eq!(Value::from(true), Value::Integer(1));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`, also used for absent cells.
    #[default]
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text content, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }

    /// Renders the value as an SQL literal.
    ///
    /// Numbers are emitted unquoted, text is single-quoted with embedded
    /// quotes doubled, blobs use the `X'..'` hex form and null becomes `NULL`.
    ///
    /// # Examples
    ///
    /// ```
    /// use simplesqlite_core::Value;
    ///
    /// assert_eq!(Value::from(10).to_query(), "10");
    /// assert_eq!(Value::from(1.0).to_query(), "1.0");
    /// assert_eq!(Value::from("it's").to_query(), "'it''s'");
    /// assert_eq!(Value::Null.to_query(), "NULL");
    /// assert_eq!(Value::Blob(vec![0xde, 0xad]).to_query(), "X'DEAD'");
    /// ```
    pub fn to_query(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => format_real(*f),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Converts a JSON value into a cell.
    ///
    /// Booleans become `0`/`1`, integral numbers that fit in `i64` become
    /// integers, every other number becomes a real, and nested arrays or
    /// objects are stored as their compact JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Integer(i64::from(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Real).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Value::Text(value.to_string())
            }
        }
    }
}

// SQLite has no NaN or infinity literals; out-of-range exponents overflow
// to infinity and NaN is stored as NULL.
fn format_real(f: f64) -> String {
    if f.is_nan() {
        "NULL".to_string()
    } else if f.is_infinite() {
        let literal = if f > 0.0 { "9e999" } else { "-9e999" };
        literal.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from_json(v)
    }
}

/// Storage category of a column.
///
/// Ordered by dominance: when a column mixes categories, the greatest one
/// wins (`Blob > Text > Real > Integer > Null`).
///
/// # Examples
///
/// ```
/// use simplesqlite_core::ColumnType;
///
/// assert!(ColumnType::Blob > ColumnType::Text);
/// assert_eq!(ColumnType::Real.sql_type(), Some("REAL"));
/// assert_eq!(ColumnType::Null.sql_type(), None);
/// assert_eq!(ColumnType::from_declared("VARCHAR(255)"), ColumnType::Text);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ColumnType {
    /// Every observed value is null, or the column is empty.
    Null,
    /// Integers only.
    Integer,
    /// Floats, possibly mixed with integers.
    Real,
    /// At least one text value and no blobs.
    Text,
    /// At least one blob value.
    Blob,
}

impl ColumnType {
    /// Declared SQL type used in `CREATE TABLE`; `None` for [`ColumnType::Null`].
    pub fn sql_type(self) -> Option<&'static str> {
        match self {
            ColumnType::Null => None,
            ColumnType::Integer => Some("INTEGER"),
            ColumnType::Real => Some("REAL"),
            ColumnType::Text => Some("TEXT"),
            ColumnType::Blob => Some("BLOB"),
        }
    }

    /// Name used in schema dumps.
    pub fn name(self) -> &'static str {
        self.sql_type().unwrap_or("NULL")
    }

    /// Maps a declared column type read back from SQLite to a category.
    ///
    /// Follows SQLite's affinity rules for the substrings it recognizes; a
    /// missing declaration maps to [`ColumnType::Null`] and any other
    /// declaration (such as `NUMERIC`) to [`ColumnType::Real`].
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.trim().to_ascii_uppercase();
        if upper.is_empty() {
            ColumnType::Null
        } else if upper.contains("INT") {
            ColumnType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ColumnType::Text
        } else if upper.contains("BLOB") {
            ColumnType::Blob
        } else {
            ColumnType::Real
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do when a table being created already exists.
///
/// Has no default; every caller picks a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Fail with an "already exists" error.
    Fail,
    /// Leave the existing table untouched and skip creation.
    Skip,
    /// Drop the existing table and create it again.
    Replace,
}

impl IfExists {
    /// Lowercase name as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            IfExists::Fail => "fail",
            IfExists::Skip => "skip",
            IfExists::Replace => "replace",
        }
    }
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IfExists {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(IfExists::Fail),
            "skip" => Ok(IfExists::Skip),
            "replace" => Ok(IfExists::Replace),
            other => Err(format!(
                "unknown if-exists policy '{other}' (expected fail, skip or replace)"
            )),
        }
    }
}
