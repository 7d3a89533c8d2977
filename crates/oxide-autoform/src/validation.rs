//! Field constraints.
//!
//! Constraints run over converted values, after every field parsed and
//! before the model is constructed. `null` (an empty optional) passes every
//! constraint except [`Constraint::Required`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

/// A declarative check on one field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Value must be present and not blank.
    Required,
    /// Number must be greater than or equal to the bound.
    Ge(f64),
    /// Number must be strictly greater than the bound.
    Gt(f64),
    /// Number must be less than or equal to the bound.
    Le(f64),
    /// Number must be strictly less than the bound.
    Lt(f64),
    /// Minimum number of characters, items, or entries.
    MinLength(usize),
    /// Maximum number of characters, items, or entries.
    MaxLength(usize),
    /// Text must match the regular expression.
    Pattern(Pattern),
    /// Text must look like an email address.
    Email,
    /// Text must be an http(s) URL.
    Url,
}

/// A regular expression, compiled once when the constraint is built.
///
/// Patterns compare by their source text. A pattern that does not compile
/// fails every value it checks.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    /// Compiles `source`.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn validate(&self, text: &str) -> Result<(), String> {
        let re = self
            .compiled
            .as_ref()
            .map_err(|e| format!("Invalid pattern: {e}"))?;
        if re.is_match(text) {
            Ok(())
        } else {
            Err(format!("Enter a value matching {}.", self.source))
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Constraint {
    /// Shorthand for `Constraint::Pattern`.
    pub fn pattern(source: impl Into<String>) -> Self {
        Self::Pattern(Pattern::new(source))
    }

    /// Validates a value and returns an error message if invalid.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if let Self::Required = self {
            return match value {
                Value::Null => Err("This field is required.".to_string()),
                Value::String(s) if s.trim().is_empty() => {
                    Err("This field is required.".to_string())
                }
                _ => Ok(()),
            };
        }
        if value.is_null() {
            return Ok(());
        }

        match self {
            Self::Required => Ok(()),
            Self::Ge(min) => check_number(value, |n| n >= *min, || {
                format!("Ensure this value is greater than or equal to {min}.")
            }),
            Self::Gt(min) => check_number(value, |n| n > *min, || {
                format!("Ensure this value is greater than {min}.")
            }),
            Self::Le(max) => check_number(value, |n| n <= *max, || {
                format!("Ensure this value is less than or equal to {max}.")
            }),
            Self::Lt(max) => check_number(value, |n| n < *max, || {
                format!("Ensure this value is less than {max}.")
            }),
            Self::MinLength(min) => match measure(value) {
                Some((len, unit)) if len < *min => Err(format!(
                    "Ensure this value has at least {min} {unit}."
                )),
                _ => Ok(()),
            },
            Self::MaxLength(max) => match measure(value) {
                Some((len, unit)) if len > *max => Err(format!(
                    "Ensure this value has at most {max} {unit}."
                )),
                _ => Ok(()),
            },
            Self::Pattern(pattern) => match value {
                Value::String(text) => pattern.validate(text),
                _ => Ok(()),
            },
            Self::Email => match value {
                Value::String(text) if !EMAIL_RE.is_match(text) => {
                    Err("Enter a valid email address.".to_string())
                }
                _ => Ok(()),
            },
            Self::Url => match value {
                Value::String(text)
                    if !(text.starts_with("http://") || text.starts_with("https://")) =>
                {
                    Err("Enter a valid URL.".to_string())
                }
                _ => Ok(()),
            },
        }
    }
}

fn check_number(
    value: &Value,
    accept: impl Fn(f64) -> bool,
    message: impl Fn() -> String,
) -> Result<(), String> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(
            s.trim()
                .parse::<f64>()
                .map_err(|_| "Enter a valid number.".to_string())?,
        ),
        _ => None,
    };

    match number {
        Some(n) if !accept(n) => Err(message()),
        _ => Ok(()),
    }
}

fn measure(value: &Value) -> Option<(usize, &'static str)> {
    match value {
        Value::String(s) => Some((s.chars().count(), "characters")),
        Value::Array(items) => Some((items.len(), "items")),
        Value::Object(entries) => Some((entries.len(), "entries")),
        _ => None,
    }
}
