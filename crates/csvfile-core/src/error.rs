//! Error types for csvfile-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving cell types or converting cell text
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Type identifier matches no registered name or alias
    #[error("unknown cell type: {0}")]
    UnknownType(String),

    /// Text is not one of the boolean words
    #[error("can't convert `{0}` into boolean")]
    InvalidBoolean(String),

    /// Text is not a base-10 integer
    #[error("can't convert `{0}` into int")]
    InvalidInt(String),

    /// Text is not a floating point number
    #[error("can't convert `{0}` into float")]
    InvalidFloat(String),

    /// Text is not a decimal number
    #[error("can't convert `{0}` into decimal")]
    InvalidDecimal(String),

    /// Text is not an ISO-8601 calendar date
    #[error("can't convert `{0}` into date")]
    InvalidDate(String),

    /// Text is not an ISO-8601 date-time
    #[error("can't convert `{0}` into datetime")]
    InvalidDateTime(String),

    /// Text is not well-formed JSON
    #[error("can't convert `{text}` into json: {message}")]
    InvalidJson { text: String, message: String },

    /// Value does not belong to the column type it is dumped through
    #[error("Invalid value type: expected {expected}, got {actual}")]
    InvalidValueType {
        expected: &'static str,
        actual: &'static str,
    },
}
