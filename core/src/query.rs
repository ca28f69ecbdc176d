//! SQL query fragment assembly.
//!
//! Pure string builders: nothing here touches a database. Identifiers are
//! validated and quoted; values passed to [`make_insert`] are bound
//! separately through positional `?` placeholders and never interpolated.
//!
//! # Examples
//!
//! ```
//! use simplesqlite_core::{Value, make_insert, make_where_in};
//!
//! let values = [Value::from(1), Value::from("a")];
//! assert_eq!(make_insert("users", &values).unwrap(), "INSERT INTO users VALUES (?,?)");
//!
//! let keys = ["hoge", "foo", "bar"].map(Value::from);
//! assert_eq!(
//!     make_where_in("key", &keys).unwrap(),
//!     "key IN ('hoge', 'foo', 'bar')"
//! );
//! ```

use std::fmt;

use crate::error::{DataError, Result};
use crate::types::Value;
use crate::validator::{validate_attr_name, validate_table_name};

/// Renders an identifier for SQL text.
///
/// Plain ASCII identifiers (`[A-Za-z_][A-Za-z0-9_]*`) are emitted as-is;
/// anything else is wrapped in double quotes with embedded quotes doubled.
///
/// # Examples
///
/// ```
/// use simplesqlite_core::quote_identifier;
///
/// assert_eq!(quote_identifier("attr_a"), "attr_a");
/// assert_eq!(quote_identifier("3hoge"), "\"3hoge\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Comparison operator for [`make_where`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereOperator {
    /// `=` (`IS NULL` for null values).
    Eq,
    /// `!=` (`IS NOT NULL` for null values).
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `LIKE`
    Like,
}

impl fmt::Display for WhereOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WhereOperator::Eq => "=",
            WhereOperator::NotEq => "!=",
            WhereOperator::Lt => "<",
            WhereOperator::Le => "<=",
            WhereOperator::Gt => ">",
            WhereOperator::Ge => ">=",
            WhereOperator::Like => "LIKE",
        })
    }
}

/// Makes a parameterized `INSERT` with one placeholder per value.
///
/// # Errors
///
/// - [`DataError::NameValidation`] if `table` is not a valid table name.
/// - [`DataError::ValueError`] if `insert_tuple` is empty.
pub fn make_insert(table: &str, insert_tuple: &[Value]) -> Result<String> {
    validate_table_name(table)?;
    if insert_tuple.is_empty() {
        return Err(DataError::ValueError("empty insert list/tuple".into()));
    }

    let placeholders = vec!["?"; insert_tuple.len()].join(",");
    Ok(format!(
        "INSERT INTO {} VALUES ({placeholders})",
        quote_identifier(table)
    ))
}

/// Makes an `INSERT` that names its target columns.
///
/// # Errors
///
/// Same as [`make_insert`], plus attribute validation of every column.
pub fn make_insert_into<S: AsRef<str>>(table: &str, attr_names: &[S]) -> Result<String> {
    validate_table_name(table)?;
    if attr_names.is_empty() {
        return Err(DataError::ValueError("empty attribute list".into()));
    }
    let mut columns = Vec::with_capacity(attr_names.len());
    for name in attr_names {
        validate_attr_name(name.as_ref())?;
        columns.push(quote_identifier(name.as_ref()));
    }

    let placeholders = vec!["?"; attr_names.len()].join(",");
    Ok(format!(
        "INSERT INTO {}({}) VALUES ({placeholders})",
        quote_identifier(table),
        columns.join(",")
    ))
}

/// Makes an `UPDATE` statement.
///
/// The `WHERE` clause is appended only when `where_clause` is present and
/// not blank.
///
/// # Errors
///
/// - [`DataError::NameValidation`] if `table` is not a valid table name.
/// - [`DataError::ValueError`] if `set_clause` is blank.
pub fn make_update(table: &str, set_clause: &str, where_clause: Option<&str>) -> Result<String> {
    validate_table_name(table)?;
    if set_clause.trim().is_empty() {
        return Err(DataError::ValueError("SET query is null".into()));
    }

    let mut parts = vec![
        format!("UPDATE {}", quote_identifier(table)),
        format!("SET {set_clause}"),
    ];
    if let Some(where_clause) = where_clause.filter(|w| !w.trim().is_empty()) {
        parts.push(format!("WHERE {where_clause}"));
    }
    Ok(parts.join(" "))
}

/// Makes a single `key <op> value` condition.
///
/// # Errors
///
/// Returns [`DataError::NameValidation`] if `key` is not a valid attribute name.
pub fn make_where(key: &str, value: &Value, operator: WhereOperator) -> Result<String> {
    validate_attr_name(key)?;
    let key = quote_identifier(key);
    Ok(match (value, operator) {
        (Value::Null, WhereOperator::Eq) => format!("{key} IS NULL"),
        (Value::Null, WhereOperator::NotEq) => format!("{key} IS NOT NULL"),
        (value, operator) => format!("{key} {operator} {}", value.to_query()),
    })
}

/// Makes a `key IN (...)` condition.
///
/// # Errors
///
/// Returns [`DataError::NameValidation`] if `key` is not a valid attribute name.
pub fn make_where_in(key: &str, values: &[Value]) -> Result<String> {
    make_membership(key, values, "IN")
}

/// Makes a `key NOT IN (...)` condition.
///
/// # Errors
///
/// Returns [`DataError::NameValidation`] if `key` is not a valid attribute name.
pub fn make_where_not_in(key: &str, values: &[Value]) -> Result<String> {
    make_membership(key, values, "NOT IN")
}

fn make_membership(key: &str, values: &[Value], keyword: &str) -> Result<String> {
    validate_attr_name(key)?;
    let rendered = values
        .iter()
        .map(Value::to_query)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("{} {keyword} ({rendered})", quote_identifier(key)))
}

/// Makes a `SELECT` over `columns` (all columns when empty).
///
/// # Errors
///
/// Returns [`DataError::NameValidation`] for an invalid table or column name.
pub fn make_select<S: AsRef<str>>(
    columns: &[S],
    table: &str,
    where_clause: Option<&str>,
) -> Result<String> {
    validate_table_name(table)?;
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        let mut rendered = Vec::with_capacity(columns.len());
        for column in columns {
            validate_attr_name(column.as_ref())?;
            rendered.push(quote_identifier(column.as_ref()));
        }
        rendered.join(", ")
    };

    let mut sql = format!("SELECT {projection} FROM {}", quote_identifier(table));
    if let Some(where_clause) = where_clause.filter(|w| !w.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    Ok(sql)
}
