//! # csvfile
//!
//! Typed CSV files: each header field declares a column name and a scalar
//! type (`name:type`), and every field is converted to and from that type.
//!
//! ## Features
//!
//! - Column types: `str`, `bool`, `int`, `float`, `decimal`, `date`,
//!   `datetime` and `json`, each with short aliases (`s`, `b`, `i`, ...)
//! - Streaming readers and writers, one row at a time, with strict row
//!   length checks
//! - Header-driven record reading and writing
//! - Whole-file [`Table`]s that can be mutated and synced back to disk
//! - Optional binding of rows to your own types through [`Model`]
//!
//! ## Example
//!
//! ```rust
//! use csvfile::prelude::*;
//!
//! let text = "language,created:i\npython,1991\njavascript,1995\n";
//! let mut reader = DictReader::new(text.as_bytes(), &CsvOptions::default()).unwrap();
//!
//! let first = reader.next().unwrap().unwrap();
//! assert_eq!(first["language"], CellValue::from("python"));
//! assert_eq!(first["created"], CellValue::Integer(1991));
//! ```
//!
//! Tables are loaded whole and rewritten on sync:
//!
//! ```rust,no_run
//! use csvfile::prelude::*;
//!
//! let mut table: Table = Table::load("languages.csv").unwrap();
//! table.push([("language", CellValue::from("rust")), ("created", 2010.into())]);
//! table.sync().unwrap();
//! ```

pub mod model;
pub mod prelude;
pub mod table;

pub use model::Model;
pub use table::{LoadOptions, Table};

// Re-export core types
pub use csvfile_core::{BigDecimal, CellType, CellValue, Error, HeaderCell, Record, Result};

// Re-export I/O types
pub use csvfile_csv::{
    CsvError, CsvOptions, CsvResult, DictReader, DictWriter, LineTerminator, QuoteStyle,
    TypedReader, TypedWriter,
};

use std::path::Path;

/// Load a whole file into a [`Table`] of records
///
/// A missing file gives an empty table.
pub fn load<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    Table::load(path)
}
