//! Cell-related types
//!
//! This module contains:
//! - [`CellType`] - The registry of scalar column types and their text conversions
//! - [`CellValue`] - A typed value produced by loading a field

mod cell_type;
mod value;

pub use cell_type::CellType;
pub use value::CellValue;
