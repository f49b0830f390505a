//! Typed cell values

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

/// A typed value held by a cell.
///
/// The [`Display`](fmt::Display) rendering is what the write path classifies,
/// so it must stay parseable: booleans print as `true`/`false` and date-times
/// as ISO-8601.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
pub enum Scalar {
    /// Boolean value
    Boolean(bool),
    /// Whole number
    Integer(i64),
    /// Exact decimal number
    Decimal(Decimal),
    /// Floating point number that does not fit a [`Decimal`]
    Float(f64),
    /// Date and time of day, no time zone
    DateTime(NaiveDateTime),
    /// Text
    Text(String),
}

impl Scalar {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Scalar::Text(s.into())
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            // through the text form, which rounds correctly
            Scalar::Decimal(d) => d.to_string().parse().ok(),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Exact decimal view of the value, if it has one
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Scalar::Integer(i) => Some(Decimal::from(*i)),
            Scalar::Decimal(d) => Some(*d),
            Scalar::Float(f) => Decimal::from_f64_retain(*f),
            _ => None,
        }
    }

    /// Integer view of the value; decimals must have no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            Scalar::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Scalar::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Boolean(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Decimal(_) => "decimal",
            Scalar::Float(_) => "float",
            Scalar::DateTime(_) => "datetime",
            Scalar::Text(_) => "text",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Decimal(d) => write!(f, "{}", d),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::DateTime(dt) => {
                if dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f"))
                }
            }
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Integer(n as i64)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Self {
        Scalar::Decimal(d)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(dt: NaiveDateTime) -> Self {
        Scalar::DateTime(dt)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(d: NaiveDate) -> Self {
        Scalar::DateTime(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}
