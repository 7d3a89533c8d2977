//! Type-directed conversion of raw widget input.
//!
//! Widgets hand back a [`RawInput`]; [`Converter::convert`] turns it into a
//! `serde_json::Value` shaped like the field's declared type. List and
//! mapping text is parsed strictly: comma-separated scalars, or JSON
//! literals for anything richer. Bad input is a [`ConversionError`] for that
//! field, never a silently empty value.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};

use crate::error::ConversionError;
use crate::types::TypeTag;

/// Canonical text form of a datetime, accepted by chrono's serde support.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Canonical text form of a date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A widget's native output for one field during one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Nothing was submitted.
    Absent,
    /// Text from a text input or textarea.
    Text(String),
    /// Value of an integer number input.
    Integer(i64),
    /// Value of a fractional number input.
    Float(f64),
    /// Toggle state.
    Boolean(bool),
    /// Datetime picker value.
    DateTime(NaiveDateTime),
    /// Date picker value.
    Date(NaiveDate),
}

impl RawInput {
    /// Whether the input carries no usable value.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for RawInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for RawInput {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for RawInput {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for RawInput {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Converts raw input into typed values and back into seed text.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    separator: char,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(',')
    }
}

impl Converter {
    /// Creates a converter splitting scalar lists on `separator`.
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Converts `raw` according to `tag`.
    pub fn convert(&self, tag: &TypeTag, raw: &RawInput) -> Result<Value, ConversionError> {
        match tag {
            TypeTag::Optional(inner) => {
                if raw.is_blank() {
                    Ok(Value::Null)
                } else {
                    self.convert(inner, raw)
                }
            }
            TypeTag::String | TypeTag::Other => Ok(Value::String(raw.to_string())),
            TypeTag::Integer => convert_integer(raw),
            TypeTag::Float => convert_float(raw),
            TypeTag::Boolean => convert_boolean(raw),
            TypeTag::DateTime => convert_datetime(raw),
            TypeTag::Date => convert_date(raw),
            TypeTag::List(inner) => self.convert_list(inner, &raw.to_string()),
            TypeTag::Mapping(..) | TypeTag::Model(_) => parse_json_object(&raw.to_string()),
        }
    }

    fn convert_list(&self, inner: &TypeTag, text: &str) -> Result<Value, ConversionError> {
        match inner {
            TypeTag::String | TypeTag::Other => Ok(Value::Array(
                self.split(text)
                    .map(|item| Value::String(item.to_string()))
                    .collect(),
            )),
            TypeTag::Integer => self
                .split(text)
                .map(|item| {
                    parse_integer(item).ok_or_else(|| {
                        ConversionError::new(format!("'{item}' is not a valid integer."))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            TypeTag::Float => self
                .split(text)
                .map(|item| {
                    item.parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .ok_or_else(|| {
                            ConversionError::new(format!("'{item}' is not a valid number."))
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => parse_json_array(text),
        }
    }

    fn split<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> {
        text.split(self.separator)
            .map(str::trim)
            .filter(|item| !item.is_empty())
    }

    /// Serializes list items back into the text a list widget is seeded
    /// with. Strings and numbers are joined with the separator; anything
    /// else is written as JSON.
    pub fn join_list(&self, items: &[Value]) -> String {
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(&format!("{} ", self.separator))
    }
}

// 2^63 and 2^64, exactly representable as f64.
const I64_END: f64 = 9_223_372_036_854_775_808.0;
const U64_END: f64 = 18_446_744_073_709_551_616.0;

/// Whole numbers span `i64::MIN..=u64::MAX`, the range a JSON number holds.
fn convert_integer(raw: &RawInput) -> Result<Value, ConversionError> {
    let number = match raw {
        RawInput::Integer(n) => Some(Value::from(*n)),
        RawInput::Float(f) => float_to_integer(*f),
        RawInput::Text(s) => parse_integer(s.trim()),
        _ => None,
    };
    number.ok_or_else(|| ConversionError::new("Enter a whole number."))
}

fn parse_integer(text: &str) -> Option<Value> {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .ok()
}

fn float_to_integer(f: f64) -> Option<Value> {
    if !f.is_finite() || f.fract() != 0.0 {
        None
    } else if (-I64_END..I64_END).contains(&f) {
        Some(Value::from(f as i64))
    } else if (0.0..U64_END).contains(&f) {
        Some(Value::from(f as u64))
    } else {
        None
    }
}

fn convert_float(raw: &RawInput) -> Result<Value, ConversionError> {
    let number = match raw {
        RawInput::Float(f) => Some(*f),
        RawInput::Integer(n) => Some(*n as f64),
        RawInput::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| ConversionError::new("Enter a number."))
}

fn convert_boolean(raw: &RawInput) -> Result<Value, ConversionError> {
    match raw {
        RawInput::Boolean(b) => Ok(Value::Bool(*b)),
        RawInput::Absent => Ok(Value::Bool(false)),
        RawInput::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "off" | "0" | "no" | "" => Ok(Value::Bool(false)),
            _ => Err(ConversionError::new("Enter true or false.")),
        },
        _ => Err(ConversionError::new("Enter true or false.")),
    }
}

fn convert_datetime(raw: &RawInput) -> Result<Value, ConversionError> {
    let datetime = match raw {
        RawInput::DateTime(dt) => Some(*dt),
        RawInput::Date(d) => d.and_hms_opt(0, 0, 0),
        RawInput::Text(s) => parse_datetime(s.trim()),
        _ => None,
    };
    datetime
        .map(|dt| Value::String(dt.format(DATETIME_FORMAT).to_string()))
        .ok_or_else(|| ConversionError::new("Enter a valid date/time."))
}

fn convert_date(raw: &RawInput) -> Result<Value, ConversionError> {
    let date = match raw {
        RawInput::Date(d) => Some(*d),
        RawInput::DateTime(dt) => Some(dt.date()),
        RawInput::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok(),
        _ => None,
    };
    date.map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
        .ok_or_else(|| ConversionError::new("Enter a valid date."))
}

/// Parses the datetime spellings a picker or a person is likely to submit.
/// A bare date means midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_json_array(text: &str) -> Result<Value, ConversionError> {
    if text.trim().is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Array(_)) => Ok(value),
        Ok(_) => Err(ConversionError::new("Enter a JSON array, e.g. [1, 2].")),
        Err(e) => Err(ConversionError::new(format!("Enter a valid JSON array: {e}."))),
    }
}

fn parse_json_object(text: &str) -> Result<Value, ConversionError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ConversionError::new(
            "Enter a JSON object, e.g. {\"key\": \"value\"}.",
        )),
        Err(e) => Err(ConversionError::new(format!("Enter a valid JSON object: {e}."))),
    }
}
