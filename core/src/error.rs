//! Error types for identifier validation and record normalization.
//!
//! [`NameValidationError`] covers every way a table or attribute name can be
//! rejected; [`DataError`] wraps it together with the shape and value errors
//! raised while turning loosely-typed input into records and queries.

use thiserror::Error;

use crate::validator::NameContext;

/// Reasons a proposed table or attribute name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameValidationError {
    /// The name is empty, whitespace-only, or absent.
    #[error("name is null or empty")]
    NullName,

    /// The name contains an unprintable control character.
    #[error("invalid character {character:?} found in name {name:?}")]
    InvalidChar {
        /// The offending name.
        name: String,
        /// First control character found.
        character: char,
    },

    /// The name is a keyword SQLite reserves but tolerates in some positions.
    #[error("'{name}' is a reserved keyword and cannot be used as a {context} name")]
    ValidReservedName {
        /// The offending name.
        name: String,
        /// Where the name was going to be used.
        context: NameContext,
    },

    /// The name is a keyword SQLite never accepts unquoted.
    #[error("'{name}' is an invalid reserved keyword for a {context} name")]
    InvalidReservedName {
        /// The offending name.
        name: String,
        /// Where the name was going to be used.
        context: NameContext,
    },
}

/// Errors raised while validating, normalizing, or assembling table data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A table or attribute name failed validation.
    #[error("name validation error: {0}")]
    NameValidation(#[from] NameValidationError),

    /// The input has the wrong shape (e.g. missing attribute list, non-text name).
    #[error("type error: {0}")]
    TypeError(String),

    /// A required argument is empty or a record is null.
    #[error("value error: {0}")]
    ValueError(String),

    /// An attribute referenced by an index is not one of the table's columns.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),
}

/// Convenience alias for results with [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
