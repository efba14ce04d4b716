//! Cell values and the scalar classification rules.
//!
//! A grid cell holds one of three stored kinds, mirroring the `n`/`b`/`s` type
//! tags of spreadsheet containers. Dates are not a stored kind of their own:
//! they become a number (a day serial) carrying a date number format, and
//! they come back from a grid as plain numbers.
//!
//! | Tree scalar | Cell |
//! |---|---|
//! | `Null` | no cell at all |
//! | `Number` | number |
//! | `Bool` | boolean |
//! | `Date` | number (day serial) + date format |
//! | `String`, `BigInt`, anything else | string |

use crate::{DateSystem, GridOptions, Number, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Milliseconds between 1899-12-30T00:00:00Z and the Unix epoch (25569 days).
const SERIAL_EPOCH_OFFSET_MS: i64 = 25_569 * MS_PER_DAY;

const MS_PER_DAY: i64 = 86_400_000;

/// The stored type tag of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellType {
    Number,
    Boolean,
    String,
}

impl CellType {
    /// The single-letter tag spreadsheet containers use for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CellType::Number => "n",
            CellType::Boolean => "b",
            CellType::String => "s",
        }
    }
}

/// The value stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum CellValue {
    #[serde(rename = "n")]
    Number(Number),
    #[serde(rename = "b")]
    Bool(bool),
    #[serde(rename = "s")]
    String(String),
}

/// A single grid cell.
///
/// # Examples
///
/// ```rust
/// use serde_grid::{Cell, CellType};
///
/// let cell = Cell::string("name");
/// assert_eq!(cell.cell_type(), CellType::String);
/// assert_eq!(cell.key_text(), "name");
///
/// assert_eq!(Cell::number(3).key_text(), "3");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(default, rename = "z", skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

impl Cell {
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Cell {
            value: CellValue::String(s.into()),
            number_format: None,
        }
    }

    #[must_use]
    pub fn number(n: impl Into<Number>) -> Self {
        Cell {
            value: CellValue::Number(n.into()),
            number_format: None,
        }
    }

    #[must_use]
    pub fn bool(b: bool) -> Self {
        Cell {
            value: CellValue::Bool(b),
            number_format: None,
        }
    }

    /// A number cell holding a day serial, displayed with `format`.
    #[must_use]
    pub fn date(serial: f64, format: impl Into<String>) -> Self {
        Cell {
            value: CellValue::Number(Number::Float(serial)),
            number_format: Some(format.into()),
        }
    }

    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        match self.value {
            CellValue::Number(_) => CellType::Number,
            CellValue::Bool(_) => CellType::Boolean,
            CellValue::String(_) => CellType::String,
        }
    }

    /// The text this cell contributes when read as an object key.
    #[must_use]
    pub fn key_text(&self) -> Cow<'_, str> {
        match &self.value {
            CellValue::String(s) => Cow::Borrowed(s),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Bool(true) => Cow::Borrowed("true"),
            CellValue::Bool(false) => Cow::Borrowed("false"),
        }
    }

    /// The leaf this cell decodes to. Date cells decode as numbers.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match &self.value {
            CellValue::Number(n) => Value::Number(*n),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::String(s) => Value::String(s.clone()),
        }
    }
}

/// Returns `true` when `key` is a non-negative integer string, the only hint
/// that a block of keys was an array.
///
/// # Examples
///
/// ```rust
/// use serde_grid::cell::is_index_key;
///
/// assert!(is_index_key("0"));
/// assert!(is_index_key("17"));
/// assert!(!is_index_key("-1"));
/// assert!(!is_index_key("1.5"));
/// assert!(!is_index_key(""));
/// ```
#[must_use]
pub fn is_index_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Converts a date to a spreadsheet day serial.
///
/// The serial counts days (fractions included) since 1899-12-30T00:00:00Z;
/// the 1904 system adds 1462 days.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use serde_grid::{cell::date_to_serial, DateSystem};
///
/// let date = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
/// assert_eq!(date_to_serial(&date, DateSystem::Excel1900), 36526.5);
/// assert_eq!(date_to_serial(&date, DateSystem::Excel1904), 37988.5);
/// ```
#[must_use]
pub fn date_to_serial(date: &DateTime<Utc>, system: DateSystem) -> f64 {
    let millis = date.timestamp_millis() + SERIAL_EPOCH_OFFSET_MS;
    millis as f64 / MS_PER_DAY as f64 + system.offset_days()
}

/// Classifies a tree node into the cell that stores it.
///
/// `None` means "no cell": null is encoded by absence. Composite nodes are
/// never passed here by the encoder; if they are, they fall through to the
/// string catch-all like any other unclassifiable value.
#[must_use]
pub fn classify(value: &Value, options: &GridOptions) -> Option<Cell> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(Cell::number(*n)),
        Value::Bool(b) => Some(Cell::bool(*b)),
        Value::Date(dt) => Some(Cell::date(
            date_to_serial(dt, options.date_system),
            options.date_format.as_str(),
        )),
        Value::String(s) => Some(Cell::string(s.as_str())),
        other => Some(Cell::string(other.to_string())),
    }
}
