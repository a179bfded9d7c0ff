//! Unified error types for the estate crate.

use sea_orm::DbErr;
use thiserror::Error;

/// Every failure an estate operation can report.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was left unset or blank
    #[error("Missing required value for field '{field}'")]
    MissingRequired {
        /// Column name of the offending field
        field: &'static str,
    },

    /// A sized string field exceeded its limit
    #[error("Value for field '{field}' is {len} characters long (max {max})")]
    FieldTooLong {
        /// Column name of the offending field
        field: &'static str,
        /// Declared size of the field
        max: usize,
        /// Actual length in characters
        len: usize,
    },

    /// A price was NaN or infinite
    #[error("Invalid amount for field '{field}': {amount}")]
    InvalidAmount {
        /// Column name of the offending field
        field: &'static str,
        /// The rejected value
        amount: f64,
    },

    /// A read-only field was written through the public update surface
    #[error("Field '{field}' is read-only")]
    ReadOnlyField {
        /// Column name of the offending field
        field: &'static str,
    },

    /// A search operator string was not recognized
    #[error("Unknown search operator: '{operator}'")]
    UnknownOperator {
        /// The operator text that failed to parse
        operator: String,
    },

    /// No property exists with the given ID
    #[error("Property not found: {id}")]
    PropertyNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// Date arithmetic left the supported range
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// What went out of range
        message: String,
    },

    /// The listings file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the configuration failure
        message: String,
    },

    /// The database layer failed
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
