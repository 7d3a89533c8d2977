//! The form pass: plan widgets, collect input, assemble the model.
//!
//! A pass is stateless. [`FormSynthesizer::plan`] and
//! [`FormSynthesizer::collect`] are pure functions of the schema and their
//! inputs; [`FormSynthesizer::run`] drives a [`Presenter`] through one
//! complete render → collect → convert → construct cycle.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::SynthConfig;
use crate::convert::{parse_datetime, Converter, RawInput, DATE_FORMAT};
use crate::error::{join_path, FormError, Result, ValidationErrors};
use crate::present::Presenter;
use crate::schema::{construct, FieldSpec, Model, ModelSchema};
use crate::types::TypeTag;
use crate::widgets::{WidgetKind, WidgetRequest};

/// Raw inputs of one pass, keyed by dotted field path.
pub type RawInputs = HashMap<String, RawInput>;

/// Turns schemas into widget requests and submitted input into models.
#[derive(Debug, Clone)]
pub struct FormSynthesizer {
    config: SynthConfig,
    converter: Converter,
}

impl Default for FormSynthesizer {
    fn default() -> Self {
        Self::new(SynthConfig::default())
    }
}

impl FormSynthesizer {
    /// Creates a synthesizer with the given configuration.
    pub fn new(config: SynthConfig) -> Self {
        let converter = Converter::new(config.list_separator);
        Self { config, converter }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Lists the widget requests for every field, nested models flattened
    /// into dotted names, in declaration order.
    pub fn plan(
        &self,
        schema: &ModelSchema,
        current: Option<&Map<String, Value>>,
    ) -> Vec<WidgetRequest> {
        let mut requests = Vec::new();
        self.plan_fields(schema, "", current, &mut requests);
        requests
    }

    fn plan_fields(
        &self,
        schema: &ModelSchema,
        prefix: &str,
        current: Option<&Map<String, Value>>,
        out: &mut Vec<WidgetRequest>,
    ) {
        for field in schema.fields() {
            let path = join_path(prefix, &field.name);
            let value = current.and_then(|c| c.get(&field.name));
            match field.type_tag.as_model() {
                Some(nested) => {
                    self.plan_fields(nested, &path, value.and_then(Value::as_object), out);
                }
                None => out.extend(self.request_for(field, &path, value)),
            }
        }
    }

    /// Builds the request for a single field. Returns `None` for nested
    /// models, which are rendered through their own fields.
    ///
    /// The seed is the current value if there is one, then the field's
    /// default, then the empty value of the control.
    pub fn request_for(
        &self,
        field: &FieldSpec,
        path: &str,
        current: Option<&Value>,
    ) -> Option<WidgetRequest> {
        let kind = WidgetKind::for_type(&field.type_tag, &self.config)?;
        let known = current
            .filter(|v| !v.is_null())
            .or(field.default.as_ref());

        Some(WidgetRequest {
            name: path.to_string(),
            label: field.label(),
            kind,
            type_tag: field.type_tag.clone(),
            seed: self.seed(&field.type_tag, known),
            help_text: self.hint(&field.type_tag),
            required: field.is_required(),
        })
    }

    fn seed(&self, tag: &TypeTag, value: Option<&Value>) -> RawInput {
        match tag {
            TypeTag::Optional(inner) => match value {
                Some(v) => self.seed(inner, Some(v)),
                None => RawInput::Absent,
            },
            TypeTag::String | TypeTag::Other => RawInput::Text(match value {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            }),
            TypeTag::Integer => match value {
                Some(Value::Number(n)) if n.as_i64().is_none() && n.is_u64() => {
                    RawInput::Text(n.to_string())
                }
                _ => RawInput::Integer(value.and_then(Value::as_i64).unwrap_or(0)),
            },
            TypeTag::Float => RawInput::Float(value.and_then(Value::as_f64).unwrap_or(0.0)),
            TypeTag::Boolean => RawInput::Boolean(value.and_then(Value::as_bool).unwrap_or(false)),
            TypeTag::DateTime => value
                .and_then(Value::as_str)
                .and_then(parse_datetime)
                .map_or(RawInput::Absent, RawInput::DateTime),
            TypeTag::Date => value
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .map_or(RawInput::Absent, RawInput::Date),
            TypeTag::List(inner) => {
                let items = value.and_then(Value::as_array);
                if is_comma_list(inner) {
                    RawInput::Text(
                        items
                            .map(|items| self.converter.join_list(items))
                            .unwrap_or_default(),
                    )
                } else {
                    RawInput::Text(items.map_or_else(
                        || "[]".to_string(),
                        |items| Value::Array(items.clone()).to_string(),
                    ))
                }
            }
            TypeTag::Mapping(..) | TypeTag::Model(_) => RawInput::Text(
                value
                    .filter(|v| v.is_object())
                    .map_or_else(|| "{}".to_string(), Value::to_string),
            ),
        }
    }

    fn hint(&self, tag: &TypeTag) -> Option<String> {
        if !self.config.json_hints {
            return None;
        }
        match tag.required_type() {
            TypeTag::List(inner) if !is_comma_list(inner) => {
                Some(format!("List of {inner} - Enter as JSON array"))
            }
            TypeTag::Mapping(key, value) => Some(format!(
                "Mapping of {key} to {value} - Enter as JSON object"
            )),
            TypeTag::Model(schema) => Some(format!("{} - Enter as JSON object", schema.name)),
            _ => None,
        }
    }

    /// Converts every field and checks every constraint.
    ///
    /// All conversion failures are gathered before giving up, then all
    /// constraint violations, so the caller can show one message per field.
    /// Fields with no submitted input fall back to their default.
    pub fn collect(&self, schema: &ModelSchema, raw: &RawInputs) -> Result<Map<String, Value>> {
        let mut errors = ValidationErrors::new();
        let mapping = self.convert_fields(schema, "", raw, &mut errors);
        if !errors.is_empty() {
            warn!(model = %schema.name, fields = errors.len(), "form input did not convert");
            return Err(FormError::Conversion(errors));
        }

        schema.check(&mapping, "", &mut errors);
        if !errors.is_empty() {
            warn!(model = %schema.name, fields = errors.len(), "form input failed validation");
            return Err(FormError::Validation(errors));
        }

        debug!(model = %schema.name, "form input collected");
        Ok(mapping)
    }

    fn convert_fields(
        &self,
        schema: &ModelSchema,
        prefix: &str,
        raw: &RawInputs,
        errors: &mut ValidationErrors,
    ) -> Map<String, Value> {
        let absent = RawInput::Absent;
        let mut mapping = Map::new();

        for field in schema.fields() {
            let path = join_path(prefix, &field.name);

            if let Some(nested) = field.type_tag.as_model() {
                let inner = self.convert_fields(nested, &path, raw, errors);
                mapping.insert(field.name.clone(), Value::Object(inner));
                continue;
            }

            let input = raw.get(&path).unwrap_or(&absent);
            if let (RawInput::Absent, Some(default)) = (input, &field.default) {
                mapping.insert(field.name.clone(), default.clone());
                continue;
            }

            match self.converter.convert(&field.type_tag, input) {
                Ok(value) => {
                    debug!(field = %path, "converted field");
                    mapping.insert(field.name.clone(), value);
                }
                Err(err) => errors.add(&path, err.message),
            }
        }

        mapping
    }

    /// Collects and constructs a model from raw inputs.
    pub fn assemble<M: Model>(&self, raw: &RawInputs) -> Result<M> {
        let schema = M::schema();
        self.collect(&schema, raw).and_then(construct::<M>)
    }

    /// Runs one complete pass over `presenter`.
    ///
    /// Inputs are requested in declaration order, nested models inside
    /// their own section. On failure the presenter is shown
    /// `Validation error: <details>` plus the per-field errors, and no
    /// instance is returned.
    pub fn run<M: Model, P: Presenter + ?Sized>(
        &self,
        presenter: &mut P,
        current: Option<&M>,
    ) -> Option<M> {
        let schema = M::schema();
        let current = current.and_then(|instance| match serde_json::to_value(instance) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        });

        let raw = self.solicit_all(&schema, current.as_ref(), presenter);
        report(presenter, self.collect(&schema, &raw).and_then(construct::<M>))
    }

    /// Runs one pass for a schema without a Rust type behind it, returning
    /// the validated mapping.
    pub fn run_schema<P: Presenter + ?Sized>(
        &self,
        schema: &ModelSchema,
        presenter: &mut P,
        current: Option<&Map<String, Value>>,
    ) -> Option<Map<String, Value>> {
        let raw = self.solicit_all(schema, current, presenter);
        report(presenter, self.collect(schema, &raw))
    }

    fn solicit_all<P: Presenter + ?Sized>(
        &self,
        schema: &ModelSchema,
        current: Option<&Map<String, Value>>,
        presenter: &mut P,
    ) -> RawInputs {
        let mut raw = RawInputs::new();
        self.solicit(schema, "", current, presenter, &mut raw);
        debug!(model = %schema.name, inputs = raw.len(), "form pass solicited inputs");
        raw
    }

    fn solicit<P: Presenter + ?Sized>(
        &self,
        schema: &ModelSchema,
        prefix: &str,
        current: Option<&Map<String, Value>>,
        presenter: &mut P,
        raw: &mut RawInputs,
    ) {
        for field in schema.fields() {
            let path = join_path(prefix, &field.name);
            let value = current.and_then(|c| c.get(&field.name));

            if let Some(nested) = field.type_tag.as_model() {
                presenter.begin_section(&field.label());
                self.solicit(nested, &path, value.and_then(Value::as_object), presenter, raw);
                presenter.end_section();
            } else if let Some(request) = self.request_for(field, &path, value) {
                let input = presenter.request_input(&request);
                raw.insert(request.name, input);
            }
        }
    }
}

fn report<T, P: Presenter + ?Sized>(presenter: &mut P, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            presenter.display_error(&format!("Validation error: {err}"));
            if let Some(errors) = err.field_errors() {
                presenter.display_field_errors(errors);
            }
            None
        }
    }
}

fn is_comma_list(inner: &TypeTag) -> bool {
    matches!(
        inner,
        TypeTag::String | TypeTag::Other | TypeTag::Integer | TypeTag::Float
    )
}

/// Renders `M` on `presenter` with the default configuration, under an
/// optional section title, and returns the instance if the input is valid.
pub fn model_inputs<M: Model, P: Presenter + ?Sized>(
    presenter: &mut P,
    title: Option<&str>,
) -> Option<M> {
    let synth = FormSynthesizer::default();
    match title {
        Some(title) => {
            presenter.begin_section(title);
            let instance = synth.run(presenter, None);
            presenter.end_section();
            instance
        }
        None => synth.run(presenter, None),
    }
}
