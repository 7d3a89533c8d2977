//! The presentation-layer seam.
//!
//! A [`Presenter`] solicits one value per [`WidgetRequest`] and displays
//! whatever the synthesizer reports. It owns all widget state; the
//! synthesizer keeps none between passes.

use std::collections::HashMap;

use serde_json::Value;

use crate::convert::RawInput;
use crate::error::ValidationErrors;
use crate::widgets::WidgetRequest;

/// Presentation layer driven by a form pass.
pub trait Presenter {
    /// Returns the value of one control, in field declaration order.
    fn request_input(&mut self, request: &WidgetRequest) -> RawInput;

    /// Shows a pass-level error message.
    fn display_error(&mut self, message: &str);

    /// Shows a structured value, such as a constructed instance or a schema.
    fn display_structured(&mut self, value: &Value);

    /// Starts the group of controls for a nested model.
    fn begin_section(&mut self, _label: &str) {}

    /// Ends the group started by the matching `begin_section`.
    fn end_section(&mut self) {}

    /// Receives per-field errors after a failed pass.
    fn display_field_errors(&mut self, _errors: &ValidationErrors) {}
}

/// Presenter answering requests from already-submitted text values.
///
/// Fields without a submitted value keep their seed. Everything displayed
/// is recorded for the caller to inspect.
#[derive(Debug, Clone, Default)]
pub struct SubmittedValues {
    values: HashMap<String, String>,
    requested: Vec<String>,
    sections: Vec<String>,
    errors: Vec<String>,
    field_errors: ValidationErrors,
    structured: Vec<Value>,
}

impl SubmittedValues {
    /// Creates a presenter over `values`, keyed by dotted field path.
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    /// Creates a presenter from `(name, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Names of the fields requested so far, in request order.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Labels of the sections entered so far.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Error messages displayed so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Field errors of the last failed pass.
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// Structured values displayed so far.
    pub fn structured(&self) -> &[Value] {
        &self.structured
    }
}

impl Presenter for SubmittedValues {
    fn request_input(&mut self, request: &WidgetRequest) -> RawInput {
        self.requested.push(request.name.clone());
        self.values
            .get(&request.name)
            .map_or_else(|| request.seed.clone(), |text| RawInput::Text(text.clone()))
    }

    fn display_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn display_structured(&mut self, value: &Value) {
        self.structured.push(value.clone());
    }

    fn begin_section(&mut self, label: &str) {
        self.sections.push(label.to_string());
    }

    fn display_field_errors(&mut self, errors: &ValidationErrors) {
        self.field_errors = errors.clone();
    }
}
