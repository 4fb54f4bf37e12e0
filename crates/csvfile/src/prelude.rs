//! Prelude module - common imports for csvfile users
//!
//! ```rust
//! use csvfile::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellType,
    CellValue,
    // Error types
    CsvError,
    // I/O types
    CsvOptions,
    CsvResult,
    DictReader,
    DictWriter,
    HeaderCell,
    LineTerminator,
    // Table types
    LoadOptions,
    Model,
    QuoteStyle,
    Record,
    Table,
    TypedReader,
    TypedWriter,
};
