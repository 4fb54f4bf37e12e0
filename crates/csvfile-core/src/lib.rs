//! # csvfile-core
//!
//! Core data structures for the csvfile typed CSV library.
//!
//! This crate provides the types shared by the readers and writers:
//! - [`CellType`] - The registry of column types with their load/dump conversions
//! - [`CellValue`] - A typed value loaded from a field
//! - [`HeaderCell`] - A parsed `name:type` header field
//! - [`Record`] - An ordered name to value mapping for one row
//!
//! ## Example
//!
//! ```rust
//! use csvfile_core::{CellType, CellValue, HeaderCell};
//!
//! let header = HeaderCell::parse("created:i").unwrap();
//! assert_eq!(header.name, "created");
//! assert_eq!(header.cell_type, CellType::Int);
//!
//! let value = header.cell_type.loads("1991").unwrap();
//! assert_eq!(value, CellValue::Integer(1991));
//! assert_eq!(header.cell_type.dumps(&value).unwrap(), "1991");
//! ```

pub mod cell;
pub mod error;
pub mod header;
pub mod record;

// Re-exports for convenience
pub use cell::{CellType, CellValue};
pub use error::{Error, Result};
pub use header::HeaderCell;
pub use record::Record;

// Value types that appear in `CellValue`
pub use bigdecimal::BigDecimal;
