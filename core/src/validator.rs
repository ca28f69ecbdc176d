//! SQLite identifier validation.
//!
//! Table and attribute names end up in generated SQL text, so each one is
//! checked before use:
//!
//! 1. it must not be empty or whitespace-only ([`NameValidationError::NullName`]),
//! 2. it must not contain an ASCII control character
//!    ([`NameValidationError::InvalidChar`]), whatever script the rest of the
//!    name is written in,
//! 3. it must not be a reserved keyword of the context it is used in
//!    ([`NameValidationError::ValidReservedName`] /
//!    [`NameValidationError::InvalidReservedName`]).
//!
//! Names starting with a digit or a symbol are accepted; SQLite allows them
//! as quoted identifiers.
//!
//! The keyword partitions differ between the table-name and attribute-name
//! contexts: `IF` is an invalid reserved word for tables but a valid reserved
//! word for attributes.
//!
//! # Examples
//!
//! ```
//! use simplesqlite_core::{NameContext, NameValidationError, validate_name};
//!
//! assert!(validate_name("3hoge", NameContext::Table).is_ok());
//! assert!(matches!(
//!     validate_name("if", NameContext::Table),
//!     Err(NameValidationError::InvalidReservedName { .. })
//! ));
//! assert!(matches!(
//!     validate_name("if", NameContext::Attribute),
//!     Err(NameValidationError::ValidReservedName { .. })
//! ));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, NameValidationError};
use crate::types::Value;

/// Keywords SQLite reserves but still accepts unquoted in some positions.
const SQLITE_VALID_RESERVED_KEYWORDS: &[&str] = &[
    "ABORT", "ACTION", "AFTER", "ANALYZE", "ASC", "ATTACH", "BEFORE", "BEGIN", "BY", "CASCADE",
    "CAST", "COLUMN", "CONFLICT", "CROSS", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "DATABASE", "DEFERRED", "DESC", "DETACH", "EACH", "END", "EXCLUSIVE", "EXPLAIN", "FAIL",
    "FOR", "FULL", "GLOB", "IGNORE", "IMMEDIATE", "INDEXED", "INITIALLY", "INNER", "INSTEAD",
    "KEY", "LEFT", "LIKE", "MATCH", "NATURAL", "NO", "OF", "OFFSET", "OUTER", "PLAN", "PRAGMA",
    "QUERY", "RAISE", "RECURSIVE", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE",
    "RESTRICT", "RIGHT", "ROLLBACK", "ROW", "SAVEPOINT", "TEMP", "TEMPORARY", "TRIGGER",
    "VACUUM", "VIEW", "VIRTUAL", "WITH", "WITHOUT",
];

/// Keywords SQLite never accepts unquoted as an identifier.
const SQLITE_INVALID_RESERVED_KEYWORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "AUTOINCREMENT", "BETWEEN", "CASE", "CHECK", "COLLATE",
    "COMMIT", "CONSTRAINT", "CREATE", "DEFAULT", "DEFERRABLE", "DELETE", "DISTINCT", "DROP",
    "ELSE", "ESCAPE", "EXCEPT", "EXISTS", "FOREIGN", "FROM", "GROUP", "HAVING", "IN", "INDEX",
    "INSERT", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN", "LIMIT", "NOT", "NOTNULL", "NULL",
    "ON", "OR", "ORDER", "PRIMARY", "REFERENCES", "SELECT", "SET", "TABLE", "THEN", "TO",
    "TRANSACTION", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "WHEN", "WHERE",
];

/// `IF` moves between partitions depending on the context.
const CONTEXT_DEPENDENT_KEYWORD: &str = "IF";

/// Reserved keyword partition for one naming context.
#[derive(Debug)]
pub struct ReservedKeywords {
    valid: HashSet<&'static str>,
    invalid: HashSet<&'static str>,
}

impl ReservedKeywords {
    fn build(if_is_valid: bool) -> Self {
        let mut valid: HashSet<&'static str> =
            SQLITE_VALID_RESERVED_KEYWORDS.iter().copied().collect();
        let mut invalid: HashSet<&'static str> =
            SQLITE_INVALID_RESERVED_KEYWORDS.iter().copied().collect();
        if if_is_valid {
            valid.insert(CONTEXT_DEPENDENT_KEYWORD);
        } else {
            invalid.insert(CONTEXT_DEPENDENT_KEYWORD);
        }
        Self { valid, invalid }
    }

    /// Returns the keyword partition for `context`.
    pub fn for_context(context: NameContext) -> &'static ReservedKeywords {
        match context {
            NameContext::Table => &TABLE_KEYWORDS,
            NameContext::Attribute => &ATTRIBUTE_KEYWORDS,
        }
    }

    /// Iterates over the valid-reserved keywords (uppercase).
    pub fn valid(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.valid.iter().copied()
    }

    /// Iterates over the invalid-reserved keywords (uppercase).
    pub fn invalid(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.invalid.iter().copied()
    }

    /// Case-insensitive membership in the valid-reserved partition.
    pub fn is_valid_reserved(&self, name: &str) -> bool {
        self.valid.contains(name.to_ascii_uppercase().as_str())
    }

    /// Case-insensitive membership in the invalid-reserved partition.
    pub fn is_invalid_reserved(&self, name: &str) -> bool {
        self.invalid.contains(name.to_ascii_uppercase().as_str())
    }
}

static TABLE_KEYWORDS: LazyLock<ReservedKeywords> = LazyLock::new(|| ReservedKeywords::build(false));
static ATTRIBUTE_KEYWORDS: LazyLock<ReservedKeywords> =
    LazyLock::new(|| ReservedKeywords::build(true));

/// Position a name is going to occupy in generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameContext {
    /// Table name.
    Table,
    /// Attribute (column) name.
    Attribute,
}

impl fmt::Display for NameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameContext::Table => f.write_str("table"),
            NameContext::Attribute => f.write_str("attribute"),
        }
    }
}

/// Unprintable characters rejected anywhere in a name.
pub fn is_unprintable(c: char) -> bool {
    c.is_ascii_control()
}

/// Validates `name` for use in `context`.
///
/// # Errors
///
/// See the [module documentation](self) for the checks and their order.
pub fn validate_name(name: &str, context: NameContext) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::NullName);
    }

    if let Some(character) = name.chars().find(|&c| is_unprintable(c)) {
        return Err(NameValidationError::InvalidChar {
            name: name.to_string(),
            character,
        });
    }

    let keywords = ReservedKeywords::for_context(context);
    if keywords.is_valid_reserved(name) {
        return Err(NameValidationError::ValidReservedName {
            name: name.to_string(),
            context,
        });
    }
    if keywords.is_invalid_reserved(name) {
        return Err(NameValidationError::InvalidReservedName {
            name: name.to_string(),
            context,
        });
    }

    Ok(())
}

/// Validates a table name.
pub fn validate_table_name(name: &str) -> Result<(), NameValidationError> {
    validate_name(name, NameContext::Table)
}

/// Validates an attribute (column) name.
pub fn validate_attr_name(name: &str) -> Result<(), NameValidationError> {
    validate_name(name, NameContext::Attribute)
}

/// Validates a name that arrives as a loosely-typed [`Value`].
///
/// `Value::Null` is reported as [`NameValidationError::NullName`]; any other
/// non-text value is a [`DataError::TypeError`].
///
/// # Examples
///
/// ```
/// use simplesqlite_core::{DataError, NameContext, Value, validate_value_name};
///
/// assert!(validate_value_name(&Value::from("users"), NameContext::Table).is_ok());
/// assert!(matches!(
///     validate_value_name(&Value::from(1), NameContext::Table),
///     Err(DataError::TypeError(_))
/// ));
/// ```
pub fn validate_value_name(value: &Value, context: NameContext) -> Result<(), DataError> {
    match value {
        Value::Text(name) => Ok(validate_name(name, context)?),
        Value::Null => Err(NameValidationError::NullName.into()),
        other => Err(DataError::TypeError(format!(
            "{context} name must be text, got {}",
            other.type_name()
        ))),
    }
}
