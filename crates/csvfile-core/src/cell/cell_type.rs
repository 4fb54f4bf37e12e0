//! Cell type registry
//!
//! Every column of a typed CSV file is declared with one of a fixed set of
//! scalar types. Each type is known by a canonical name plus a set of short
//! aliases, and knows how to load a field's text into a [`CellValue`] and how
//! to dump a value back to text.
//!
//! | name       | aliases        |
//! |------------|----------------|
//! | `str`      | `s`            |
//! | `bool`     | `b`, `boolean` |
//! | `int`      | `i`            |
//! | `float`    | `f`            |
//! | `decimal`  | `n`            |
//! | `date`     | `d`            |
//! | `datetime` | `t`            |
//! | `json`     | `j`            |
//!
//! Identifier lookup is exact and case-sensitive.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use bigdecimal::BigDecimal;

use super::CellValue;
use crate::error::{Error, Result};

/// Words accepted by the `bool` type, compared after trimming and lowercasing
const BOOLEAN_WORDS: [(&str, bool); 12] = [
    ("true", true),
    ("false", false),
    ("t", true),
    ("f", false),
    ("1", true),
    ("0", false),
    ("y", true),
    ("n", false),
    ("yes", true),
    ("no", false),
    ("on", true),
    ("off", false),
];

const ZONED_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A scalar column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Str,
    Bool,
    Int,
    Float,
    Decimal,
    Date,
    DateTime,
    Json,
}

impl CellType {
    /// Every registered type, in lookup order
    pub const ALL: [CellType; 8] = [
        CellType::Str,
        CellType::Bool,
        CellType::Int,
        CellType::Float,
        CellType::Decimal,
        CellType::Date,
        CellType::DateTime,
        CellType::Json,
    ];

    /// Canonical identifier
    pub fn name(self) -> &'static str {
        match self {
            CellType::Str => "str",
            CellType::Bool => "bool",
            CellType::Int => "int",
            CellType::Float => "float",
            CellType::Decimal => "decimal",
            CellType::Date => "date",
            CellType::DateTime => "datetime",
            CellType::Json => "json",
        }
    }

    /// Alternate identifiers
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CellType::Str => &["s"],
            CellType::Bool => &["b", "boolean"],
            CellType::Int => &["i"],
            CellType::Float => &["f"],
            CellType::Decimal => &["n"],
            CellType::Date => &["d"],
            CellType::DateTime => &["t"],
            CellType::Json => &["j"],
        }
    }

    /// Check whether `identifier` names this type
    pub fn matches(self, identifier: &str) -> bool {
        self.name() == identifier || self.aliases().contains(&identifier)
    }

    /// Look up a type by name or alias; the first registered match wins
    pub fn get(identifier: &str) -> Result<CellType> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.matches(identifier))
            .ok_or_else(|| Error::UnknownType(identifier.to_string()))
    }

    /// Resolve a list of identifiers, failing on the first unknown one
    pub fn resolve_all<I, S>(identifiers: I) -> Result<Vec<CellType>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .map(|id| Self::get(id.as_ref()))
            .collect()
    }

    /// The natural column type of a value, `None` for null
    pub fn of(value: &CellValue) -> Option<CellType> {
        match value {
            CellValue::Null => None,
            CellValue::String(_) => Some(CellType::Str),
            CellValue::Boolean(_) => Some(CellType::Bool),
            CellValue::Integer(_) => Some(CellType::Int),
            CellValue::Float(_) => Some(CellType::Float),
            CellValue::Decimal(_) => Some(CellType::Decimal),
            CellValue::Date(_) => Some(CellType::Date),
            CellValue::DateTime(_) | CellValue::ZonedDateTime(_) => Some(CellType::DateTime),
            CellValue::Json(_) => Some(CellType::Json),
        }
    }

    /// Convert field text into a typed value
    pub fn loads(self, text: &str) -> Result<CellValue> {
        match self {
            CellType::Str => Ok(CellValue::string(text)),
            CellType::Bool => load_bool(text),
            CellType::Int => load_int(text),
            CellType::Float => text
                .trim()
                .parse::<f64>()
                .map(CellValue::Float)
                .map_err(|_| Error::InvalidFloat(text.to_string())),
            CellType::Decimal => load_decimal(text),
            CellType::Date => load_date(text)
                .map(CellValue::Date)
                .ok_or_else(|| Error::InvalidDate(text.to_string())),
            CellType::DateTime => load_datetime(text),
            CellType::Json => serde_json::from_str(text)
                .map(CellValue::Json)
                .map_err(|e| Error::InvalidJson {
                    text: text.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// Convert a typed value into field text
    ///
    /// Fails with [`Error::InvalidValueType`] when the value does not belong
    /// to this type. Null is not accepted here; blank handling belongs to the
    /// row writer.
    pub fn dumps(self, value: &CellValue) -> Result<String> {
        let text = match (self, value) {
            (CellType::Str, CellValue::String(s)) => s.clone(),
            (CellType::Bool, CellValue::Boolean(b)) => b.to_string(),
            (CellType::Int, CellValue::Integer(n)) => n.to_string(),
            // Debug keeps the fractional part of integral floats ("1.0")
            (CellType::Float, CellValue::Float(n)) => format!("{n:?}"),
            (CellType::Float, CellValue::Integer(n)) => format!("{:?}", *n as f64),
            (CellType::Decimal, CellValue::Decimal(d)) => d.to_plain_string(),
            (CellType::Decimal, CellValue::Integer(n)) => n.to_string(),
            (CellType::Date, CellValue::Date(d)) => d.format("%Y-%m-%d").to_string(),
            (CellType::DateTime, CellValue::DateTime(dt)) => {
                dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
            }
            (CellType::DateTime, CellValue::ZonedDateTime(dt)) => {
                dt.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string()
            }
            (CellType::Json, CellValue::Json(v)) => v.to_string(),
            (CellType::Json, CellValue::String(s)) => serde_json::Value::from(s.as_str()).to_string(),
            (CellType::Json, CellValue::Boolean(b)) => b.to_string(),
            (CellType::Json, CellValue::Integer(n)) => n.to_string(),
            (CellType::Json, CellValue::Float(n)) => serde_json::Value::from(*n).to_string(),
            (ty, other) => {
                return Err(Error::InvalidValueType {
                    expected: ty.name(),
                    actual: other.type_name(),
                })
            }
        };
        Ok(text)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CellType::get(s)
    }
}

fn load_bool(text: &str) -> Result<CellValue> {
    let word = text.to_lowercase();
    let word = word.trim();
    BOOLEAN_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, b)| CellValue::Boolean(*b))
        .ok_or_else(|| Error::InvalidBoolean(text.to_string()))
}

fn load_int(text: &str) -> Result<CellValue> {
    let err = || Error::InvalidInt(text.to_string());
    let trimmed = text.trim();
    let parsed = if trimmed.contains('_') {
        strip_digit_separators(trimmed).ok_or_else(err)?.parse::<i64>()
    } else {
        trimmed.parse::<i64>()
    };
    parsed.map(CellValue::Integer).map_err(|_| err())
}

/// Remove `_` separators, each of which must sit between two digits
fn strip_digit_separators(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        if !matches!(before, Some(c) if c.is_ascii_digit())
            || !matches!(after, Some(c) if c.is_ascii_digit())
        {
            return None;
        }
    }
    Some(s.replace('_', ""))
}

fn load_decimal(text: &str) -> Result<CellValue> {
    text.trim()
        .parse::<BigDecimal>()
        .map(CellValue::Decimal)
        .map_err(|_| Error::InvalidDecimal(text.to_string()))
}

fn load_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn load_datetime(text: &str) -> Result<CellValue> {
    if let Some(date) = load_date(text) {
        return Ok(CellValue::DateTime(date.and_time(NaiveTime::MIN)));
    }
    if !text.is_char_boundary(10) || load_date(&text[..10]).is_none() {
        return Err(Error::InvalidDateTime(text.to_string()));
    }

    let zoned = text.strip_suffix('Z').map(|rest| format!("{rest}+00:00"));
    let zoned_text = zoned.as_deref().unwrap_or(text);
    for fmt in ZONED_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(zoned_text, fmt) {
            return Ok(CellValue::ZonedDateTime(dt));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(CellValue::DateTime(dt));
        }
    }
    Err(Error::InvalidDateTime(text.to_string()))
}
