//! Error types for form synthesis.

use thiserror::Error;

/// Errors produced while turning submitted input into a model instance.
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more fields could not be converted to their declared type.
    #[error("could not convert input: {0}")]
    Conversion(ValidationErrors),

    /// Converted values violate field constraints or the model's own checks.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The assembled mapping does not deserialize into the model.
    #[error("could not construct model: {0}")]
    Construct(String),
}

impl FormError {
    /// Returns the per-field errors, if this error carries any.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Conversion(errors) | Self::Validation(errors) => Some(errors),
            Self::Construct(_) => None,
        }
    }
}

/// A single field's raw input that does not parse into its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConversionError {
    /// Human-readable reason.
    pub message: String,
}

impl ConversionError {
    /// Creates a new conversion error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Collection of validation errors keyed by dotted field path.
///
/// Fields keep the order in which their first error was added, which is
/// declaration order for errors produced by a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.errors.push((field.to_string(), vec![message])),
        }
    }

    /// Moves every error of `other` into `self`, with its field paths
    /// nested under `prefix`.
    pub fn merge(&mut self, prefix: &str, other: Self) {
        for (field, messages) in other.errors {
            let path = join_path(prefix, &field);
            for message in messages {
                self.add(&path, message);
            }
        }
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Returns all errors as a flat list.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| (field.as_str(), msg.as_str()))
            })
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.all_errors().into_iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Joins a field path and a child name: `order.lines`, `lines[0]`.
pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        prefix.to_string()
    } else if name.starts_with('[') {
        format!("{prefix}{name}")
    } else {
        format!("{prefix}.{name}")
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_keep_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "This field is required.");
        errors.add("age", "Enter a whole number.");
        errors.add("name", "Ensure this value has at least 2 characters.");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name").map(<[String]>::len), Some(2));
        assert_eq!(
            errors.to_string(),
            "name: This field is required.; name: Ensure this value has at least 2 characters.; age: Enter a whole number."
        );
    }

    #[test]
    fn test_merge_nests_paths() {
        let mut errors = ValidationErrors::new();
        errors.add("lines", "one");

        let mut item = ValidationErrors::new();
        item.add("qty", "two");
        let mut items = ValidationErrors::new();
        items.merge("[1]", item);
        errors.merge("lines", items);

        let mut own = ValidationErrors::new();
        own.add("", "three");
        errors.merge("address", own);

        assert_eq!(
            errors.all_errors(),
            vec![("lines", "one"), ("lines[1].qty", "two"), ("address", "three")]
        );
    }

    #[test]
    fn test_construct_error_has_no_field_errors() {
        let err = FormError::Construct("missing field `name`".to_string());
        assert!(err.field_errors().is_none());
        assert_eq!(
            err.to_string(),
            "could not construct model: missing field `name`"
        );
    }
}
