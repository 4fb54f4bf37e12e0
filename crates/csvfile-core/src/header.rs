//! Header cell parsing
//!
//! A header field has the form `<name>[:<type>]`. The text is split on the
//! last colon, so names may contain colons themselves; both sides are
//! trimmed. Without a colon the column is a `str` column.

use std::fmt;
use std::str::FromStr;

use crate::cell::CellType;
use crate::error::{Error, Result};

/// One parsed header field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    /// Original text, written back verbatim
    pub raw: String,
    /// Trimmed column name, used as the record key
    pub name: String,
    /// Resolved column type
    pub cell_type: CellType,
}

impl HeaderCell {
    /// Parse a raw header field
    pub fn parse(raw: &str) -> Result<Self> {
        let (name, type_id) = match raw.rsplit_once(':') {
            Some((name, type_id)) => (name.trim(), type_id.trim()),
            None => (raw.trim(), CellType::Str.name()),
        };
        Ok(Self {
            raw: raw.to_string(),
            name: name.to_string(),
            cell_type: CellType::get(type_id)?,
        })
    }

    /// Parse every field of a header row
    pub fn parse_row<I, S>(fields: I) -> Result<Vec<HeaderCell>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        fields.into_iter().map(|f| Self::parse(f.as_ref())).collect()
    }

    /// Build a header cell from a name and type
    ///
    /// `str` columns are written without a type suffix.
    pub fn new<S: Into<String>>(name: S, cell_type: CellType) -> Self {
        let name = name.into();
        let raw = match cell_type {
            CellType::Str => name.clone(),
            other => format!("{name}:{other}"),
        };
        Self {
            raw,
            name,
            cell_type,
        }
    }
}

impl fmt::Display for HeaderCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for HeaderCell {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HeaderCell::parse(s)
    }
}
