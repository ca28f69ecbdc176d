//! Error types for table loading.
//!
//! Covers every way a source can fail to become table data: I/O, JSON or
//! YAML parsing, unsupported document shapes, and name validation.

use simplesqlite_core::DataError;
use thiserror::Error;

/// Errors that can occur while loading tables from a source.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The source is empty, missing, or of an unknown format.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// The document parsed but does not describe any table.
    #[error("invalid table data: {0}")]
    InvalidData(String),

    /// The table name template is empty.
    #[error("table name is empty")]
    EmptyTableName,

    /// A resolved table name or a row failed validation.
    #[error(transparent)]
    DataError(#[from] DataError),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
