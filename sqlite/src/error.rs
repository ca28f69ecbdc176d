//! Error types for SQLite table operations.
//!
//! Engine failures are carried verbatim; validation and loading failures
//! keep the error of the crate that raised them.

use simplesqlite_core::DataError;
use simplesqlite_loader::LoaderError;
use thiserror::Error;

/// Errors that can occur while creating, filling or inspecting tables.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Name validation, type or value failure in the input data.
    #[error(transparent)]
    DataError(#[from] DataError),

    /// The table data could not be loaded.
    #[error("loader error: {0}")]
    LoaderError(#[from] LoaderError),

    /// The table exists and the overwrite policy is `fail`.
    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    /// The requested table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),
}

impl From<simplesqlite_core::NameValidationError> for SqliteError {
    fn from(err: simplesqlite_core::NameValidationError) -> Self {
        SqliteError::DataError(err.into())
    }
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
