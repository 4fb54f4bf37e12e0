//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during typed CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Core error (e.g. unknown type in a header)
    #[error(transparent)]
    Core(#[from] csvfile_core::Error),

    /// A field failed its column's conversion
    #[error("row {row}, column {column}: {source}")]
    Cell {
        row: usize,
        column: usize,
        #[source]
        source: csvfile_core::Error,
    },

    /// Field count disagrees with column count
    #[error("length of row #{row} is {actual} while {expected} types were provided")]
    RowLengthMismatch {
        row: usize,
        actual: usize,
        expected: usize,
    },

    /// Field bytes are not valid text in the file's encoding
    #[error("row {row}, column {column}: invalid {encoding} text")]
    Decode {
        row: usize,
        column: usize,
        encoding: &'static str,
    },

    /// A value has characters the file's encoding can't represent
    #[error("row {row}, column {column}: text can't be written as {encoding}")]
    Encode {
        row: usize,
        column: usize,
        encoding: &'static str,
    },

    /// A header field can't be decoded from or encoded into the file's encoding
    #[error("header column {column}: text is not representable in {encoding}")]
    HeaderEncoding {
        column: usize,
        encoding: &'static str,
    },

    /// Encoding unknown or not usable for byte-wise CSV splitting
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// No header line to read
    #[error("can't read csv headers: the file is empty")]
    EmptyFile,

    /// A header name has no value in the record being written
    #[error("record has no field named `{0}`")]
    MissingKey(String),

    /// A model rejected a loaded record
    #[error("row {row}: {source}")]
    Model {
        row: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CsvError {
    /// The core conversion error behind this error, if any
    pub fn core(&self) -> Option<&csvfile_core::Error> {
        match self {
            CsvError::Core(e) | CsvError::Cell { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
