//! Typed cell values

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use bigdecimal::BigDecimal;

use super::CellType;

/// A cell value after conversion through its column's [`CellType`]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent value (a blank field in a non-str column)
    #[default]
    Null,

    /// Text value
    String(String),

    /// Boolean value
    Boolean(bool),

    /// Signed integer value
    Integer(i64),

    /// IEEE-754 double
    Float(f64),

    /// Arbitrary-precision decimal
    Decimal(BigDecimal),

    /// Calendar date
    Date(NaiveDate),

    /// Date-time without an offset
    DateTime(NaiveDateTime),

    /// Date-time with a fixed UTC offset
    ZonedDateTime(DateTime<FixedOffset>),

    /// Any JSON value
    Json(serde_json::Value),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Try to get the value as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            CellValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to get the value as a decimal, widening integers
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            CellValue::Decimal(d) => Some(d.clone()),
            CellValue::Integer(n) => Some(BigDecimal::from(*n)),
            _ => None,
        }
    }

    /// Try to get the value as a date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get the value as a naive date-time
    ///
    /// Zoned values are returned in their local wall-clock time.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::ZonedDateTime(dt) => Some(dt.naive_local()),
            _ => None,
        }
    }

    /// Try to get the value as a JSON value
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            CellValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::String(_) => "string",
            CellValue::Boolean(_) => "boolean",
            CellValue::Integer(_) => "integer",
            CellValue::Float(_) => "float",
            CellValue::Decimal(_) => "decimal",
            CellValue::Date(_) => "date",
            CellValue::DateTime(_) => "datetime",
            CellValue::ZonedDateTime(_) => "zoned datetime",
            CellValue::Json(_) => "json",
        }
    }
}

/// Renders the value the way its natural column type dumps it; null renders empty
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CellType::of(self) {
            Some(ty) => match ty.dumps(self) {
                Ok(text) => f.write_str(&text),
                Err(_) => Err(fmt::Error),
            },
            None => Ok(()),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<BigDecimal> for CellValue {
    fn from(d: BigDecimal) -> Self {
        CellValue::Decimal(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<DateTime<FixedOffset>> for CellValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        CellValue::ZonedDateTime(dt)
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        CellValue::Json(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::Integer(n) => serializer.serialize_i64(*n),
            CellValue::Float(n) => serializer.serialize_f64(*n),
            CellValue::Json(v) => serde::Serialize::serialize(v, serializer),
            // decimals and dates have no JSON scalar; use their column text
            other => serializer.collect_str(other),
        }
    }
}
