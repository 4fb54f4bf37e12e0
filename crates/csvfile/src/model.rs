//! Binding table rows to caller-defined types

use std::convert::Infallible;

use csvfile_core::Record;

/// A row type a [`Table`](crate::Table) can load into and persist from
///
/// Implementors build themselves from a loaded [`Record`], which is where
/// their own validation happens, and turn themselves back into a record for
/// writing.
///
/// ```rust
/// use csvfile::{CellValue, Model, Record};
///
/// struct Language {
///     name: String,
///     created: i64,
/// }
///
/// impl Model for Language {
///     type Error = String;
///
///     fn columns() -> &'static [&'static str] {
///         &["name", "created:int"]
///     }
///
///     fn from_record(record: Record) -> Result<Self, String> {
///         let name = record.get("name").and_then(CellValue::as_str).ok_or("missing name")?;
///         let created = record.get("created").and_then(CellValue::as_i64).ok_or("missing created")?;
///         Ok(Language { name: name.to_string(), created })
///     }
///
///     fn to_record(&self) -> Record {
///         Record::from([
///             ("name", CellValue::from(self.name.as_str())),
///             ("created", self.created.into()),
///         ])
///     }
/// }
/// ```
pub trait Model: Sized {
    /// Error returned when a record is rejected
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// Raw header fields (`name:type`) in declared field order
    ///
    /// When non-empty these columns are written on sync instead of the
    /// header the table was loaded with.
    fn columns() -> &'static [&'static str] {
        &[]
    }

    /// Build a row from a loaded record
    fn from_record(record: Record) -> Result<Self, Self::Error>;

    /// Turn a row back into a record for writing
    fn to_record(&self) -> Record;
}

impl Model for Record {
    type Error = Infallible;

    fn from_record(record: Record) -> Result<Self, Infallible> {
        Ok(record)
    }

    fn to_record(&self) -> Record {
        self.clone()
    }
}
