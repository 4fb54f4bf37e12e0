//! # csvfile-csv
//!
//! Typed CSV reader and writer for csvfile.
//!
//! [`TypedReader`] and [`TypedWriter`] convert rows through an explicit list
//! of [`CellType`](csvfile_core::CellType)s. [`DictReader`] and [`DictWriter`]
//! take the column names and types from a `name:type` header line instead.

mod dict;
mod error;
mod options;
mod reader;
mod writer;

pub use dict::{DictReader, DictWriter};
pub use error::{CsvError, CsvResult};
pub use options::{CsvOptions, LineTerminator, QuoteStyle};
pub use reader::TypedReader;
pub use writer::TypedWriter;

/// Every row must have exactly one field per column
pub(crate) fn check_row_length(row: usize, actual: usize, expected: usize) -> CsvResult<()> {
    if actual != expected {
        return Err(CsvError::RowLengthMismatch {
            row,
            actual,
            expected,
        });
    }
    Ok(())
}
