//! Widget selection and HTML rendering.
//!
//! [`WidgetKind::for_type`] picks the control for a [`TypeTag`]; a
//! [`WidgetRequest`] is what the synthesizer hands the presentation layer
//! for each field. The Bootstrap widgets in this module render requests as
//! HTML.

mod bootstrap;

pub use bootstrap::{BootstrapCheckbox, BootstrapTextInput, BootstrapTextarea};

use std::collections::BTreeMap;

use crate::config::SynthConfig;
use crate::convert::RawInput;
use crate::types::TypeTag;

/// Increment of a number input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberStep {
    /// Whole numbers only.
    Integer,
    /// Fractional values in steps of the given size.
    Fractional(f64),
}

/// The kind of control a field is rendered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetKind {
    /// Single-line text.
    TextInput,
    /// Numeric input.
    NumberInput {
        /// Increment.
        step: NumberStep,
    },
    /// On/off toggle.
    Checkbox,
    /// Multi-line text, used for lists and mappings.
    TextArea,
    /// Date and time picker.
    DateTimePicker,
    /// Date picker.
    DatePicker,
}

impl WidgetKind {
    /// Selects the control for a type. Nested models have no control of
    /// their own and yield `None`.
    pub fn for_type(tag: &TypeTag, config: &SynthConfig) -> Option<Self> {
        let kind = match tag {
            TypeTag::String | TypeTag::Other => Self::TextInput,
            TypeTag::Integer => Self::NumberInput {
                step: NumberStep::Integer,
            },
            TypeTag::Float => Self::NumberInput {
                step: NumberStep::Fractional(config.float_step),
            },
            TypeTag::Boolean => Self::Checkbox,
            TypeTag::List(_) | TypeTag::Mapping(..) => Self::TextArea,
            TypeTag::DateTime => Self::DateTimePicker,
            TypeTag::Date => Self::DatePicker,
            TypeTag::Optional(inner) => match inner.as_ref() {
                TypeTag::Model(_) => Self::TextArea,
                other => return Self::for_type(other, config),
            },
            TypeTag::Model(_) => return None,
        };
        Some(kind)
    }
}

/// One field's request to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRequest {
    /// Dotted path of the field (`shipping_address.city`).
    pub name: String,
    /// Text shown next to the control.
    pub label: String,
    /// Control to render.
    pub kind: WidgetKind,
    /// Declared type of the field.
    pub type_tag: TypeTag,
    /// Value the control starts with.
    pub seed: RawInput,
    /// Extra guidance shown under the control.
    pub help_text: Option<String>,
    /// Whether the field must be filled in.
    pub required: bool,
}

/// Attributes that can be applied to a widget.
#[derive(Debug, Clone, Default)]
pub struct WidgetAttrs {
    /// HTML attributes, rendered in name order.
    pub attrs: BTreeMap<String, String>,
}

impl WidgetAttrs {
    /// Creates new empty widget attributes.
    pub fn new() -> Self {
        Self {
            attrs: BTreeMap::new(),
        }
    }

    /// Sets an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    /// Renders every attribute except `id` and `class` as ` key="value"`.
    fn extra_html(&self) -> String {
        self.attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "class" && k.as_str() != "id")
            .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
            .collect()
    }
}

/// Trait for form widgets that render HTML inputs.
pub trait Widget: Send + Sync {
    /// Renders the widget as HTML.
    ///
    /// # Arguments
    /// * `name` - The field name (used for the name attribute)
    /// * `value` - The current value (if any)
    /// * `attrs` - Additional HTML attributes
    fn render(&self, name: &str, value: Option<&str>, attrs: &WidgetAttrs) -> String;

    /// Returns the HTML input type.
    fn input_type(&self) -> &str {
        "text"
    }
}

/// Builds the Bootstrap widget for a request.
pub fn bootstrap_widget(request: &WidgetRequest, config: &SynthConfig) -> Box<dyn Widget> {
    match request.kind {
        WidgetKind::TextInput => Box::new(BootstrapTextInput::new()),
        WidgetKind::NumberInput { step } => Box::new(BootstrapTextInput::number(step)),
        WidgetKind::Checkbox => {
            let checkbox = if config.switch_checkboxes {
                BootstrapCheckbox::switch()
            } else {
                BootstrapCheckbox::new()
            };
            Box::new(checkbox.label(&request.label))
        }
        WidgetKind::TextArea => Box::new(BootstrapTextarea::new(config.textarea_rows)),
        WidgetKind::DateTimePicker => Box::new(BootstrapTextInput::datetime()),
        WidgetKind::DatePicker => Box::new(BootstrapTextInput::date()),
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_type() {
        let config = SynthConfig::default();
        assert_eq!(
            WidgetKind::for_type(&TypeTag::String, &config),
            Some(WidgetKind::TextInput)
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::Integer, &config),
            Some(WidgetKind::NumberInput {
                step: NumberStep::Integer
            })
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::Float, &config),
            Some(WidgetKind::NumberInput {
                step: NumberStep::Fractional(0.1)
            })
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::Boolean, &config),
            Some(WidgetKind::Checkbox)
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::list(TypeTag::Integer), &config),
            Some(WidgetKind::TextArea)
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::optional(TypeTag::DateTime), &config),
            Some(WidgetKind::DateTimePicker)
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::Other, &config),
            Some(WidgetKind::TextInput)
        );
        assert_eq!(
            WidgetKind::for_type(&TypeTag::Model(Default::default()), &config),
            None
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_widget_attrs_extra_html_is_sorted_and_skips_id_class() {
        let mut attrs = WidgetAttrs::new();
        attrs.set("required", "required");
        attrs.set("id", "id_name");
        attrs.set("class", "is-invalid");
        attrs.set("data-x", "1");
        assert_eq!(attrs.extra_html(), r#" data-x="1" required="required""#);
    }
}
