//! Common error types for pmdash

use thiserror::Error;

/// Common result type for pmdash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the pmdash crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write rejected because it clashes with existing rows
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify a failed INSERT/UPDATE.
    ///
    /// Constraint violations are caller mistakes, everything else stays a
    /// database error.
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return Error::InvalidInput(format!("{} references a missing record", what));
            }
            if db_err.is_unique_violation() {
                return Error::Conflict(format!("{} already exists", what));
            }
            if db_err.is_check_violation() {
                return Error::InvalidInput(format!("{} has an out-of-range value", what));
            }
        }
        Error::Database(err)
    }

    /// Classify a failed DELETE. A foreign-key failure here means the row is
    /// still referenced elsewhere.
    pub fn from_delete(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return Error::Conflict(format!("{} is still referenced by other records", what));
            }
        }
        Error::Database(err)
    }
}
