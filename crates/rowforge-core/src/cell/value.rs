//! Cell value types

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};

use crate::error::{Error, Result};

/// Represents the value written into a cell
///
/// Text is held as a [`Cow`] so rows can be built from borrowed data without
/// allocating.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue<'a> {
    /// Empty cell; still occupies its column position
    #[default]
    Empty,

    /// String value, written inline
    String(Cow<'a, str>),

    /// Floating-point number
    Number(f64),

    /// Integer, written without a fractional part
    Integer(i64),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Date and time, written as a serial day number
    DateTime(NaiveDateTime),

    /// Formula with an optional cached result
    Formula {
        /// Formula text; a leading `=` is optional
        text: Cow<'a, str>,
        /// Result shown by readers that do not recalculate
        cached: Option<CachedValue<'a>>,
    },
}

/// Pre-computed result stored next to a formula
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue<'a> {
    Number(f64),
    String(Cow<'a, str>),
    Boolean(bool),
}

impl<'a> CellValue<'a> {
    /// Create a new string value
    pub fn string<S: Into<Cow<'a, str>>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Create a new formula value without a cached result
    pub fn formula<S: Into<Cow<'a, str>>>(text: S) -> Self {
        CellValue::Formula {
            text: text.into(),
            cached: None,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::String(_) => "string",
            CellValue::Number(_) => "number",
            CellValue::Integer(_) => "integer",
            CellValue::Boolean(_) => "boolean",
            CellValue::DateTime(_) => "date/time",
            CellValue::Formula { .. } => "formula",
        }
    }

    /// Check that the value can be encoded
    pub fn validate(&self) -> Result<()> {
        match self {
            CellValue::Number(n) => check_finite(*n),
            CellValue::DateTime(dt) => serial_date(dt).map(|_| ()),
            CellValue::Formula { text, cached } => {
                if formula_body(text).is_empty() {
                    return Err(Error::invalid_value("formula text is empty"));
                }
                match cached {
                    Some(CachedValue::Number(n)) => check_finite(*n),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    /// Convert into a value that owns its text
    pub fn into_owned(self) -> CellValue<'static> {
        match self {
            CellValue::Empty => CellValue::Empty,
            CellValue::String(s) => CellValue::String(Cow::Owned(s.into_owned())),
            CellValue::Number(n) => CellValue::Number(n),
            CellValue::Integer(i) => CellValue::Integer(i),
            CellValue::Boolean(b) => CellValue::Boolean(b),
            CellValue::DateTime(dt) => CellValue::DateTime(dt),
            CellValue::Formula { text, cached } => CellValue::Formula {
                text: Cow::Owned(text.into_owned()),
                cached: cached.map(|c| match c {
                    CachedValue::Number(n) => CachedValue::Number(n),
                    CachedValue::String(s) => CachedValue::String(Cow::Owned(s.into_owned())),
                    CachedValue::Boolean(b) => CachedValue::Boolean(b),
                }),
            },
        }
    }
}

fn check_finite(n: f64) -> Result<()> {
    if n.is_finite() {
        Ok(())
    } else {
        Err(Error::UnsupportedValue("non-finite number"))
    }
}

/// Formula text without its optional leading `=`
pub(crate) fn formula_body(text: &str) -> &str {
    text.strip_prefix('=').unwrap_or(text)
}

/// Earliest date the serial representation supports
const MIN_SERIAL_YEAR: i32 = 1900;

/// Latest year the container format can display
const MAX_SERIAL_YEAR: i32 = 9999;

/// `num_days_from_ce` of 1899-12-30, serial day 0
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// Convert a date/time to its serial day number
///
/// The serial is the number of days since 1899-12-30, with the time of day
/// as the fractional part.
pub fn serial_date(dt: &NaiveDateTime) -> Result<f64> {
    if dt.year() < MIN_SERIAL_YEAR {
        return Err(Error::UnsupportedValue("date before 1900-01-01"));
    }
    if dt.year() > MAX_SERIAL_YEAR {
        return Err(Error::UnsupportedValue("date after 9999-12-31"));
    }
    let days = (dt.num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE) as f64;
    let time = dt.time();
    let seconds = time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9;
    Ok(days + seconds / 86_400.0)
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Formula { text, .. } => write!(f, "={}", formula_body(text)),
        }
    }
}

impl<'a> From<&'a str> for CellValue<'a> {
    fn from(s: &'a str) -> Self {
        CellValue::String(Cow::Borrowed(s))
    }
}

impl From<String> for CellValue<'_> {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for CellValue<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue<'_> {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<f32> for CellValue<'_> {
    fn from(n: f32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue<'_> {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<i32> for CellValue<'_> {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<u32> for CellValue<'_> {
    fn from(n: u32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<bool> for CellValue<'_> {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<NaiveDateTime> for CellValue<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveDate> for CellValue<'_> {
    fn from(d: NaiveDate) -> Self {
        CellValue::DateTime(d.and_time(chrono::NaiveTime::MIN))
    }
}

/// Zoned timestamps are written in their own local time.
impl<Tz: TimeZone> From<DateTime<Tz>> for CellValue<'_> {
    fn from(dt: DateTime<Tz>) -> Self {
        CellValue::DateTime(dt.naive_local())
    }
}

impl<'a, T: Into<CellValue<'a>>> From<Option<T>> for CellValue<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}
