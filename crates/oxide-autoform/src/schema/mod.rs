//! Model schemas: ordered field descriptions plus the construct step.
//!
//! A [`ModelSchema`] is usually produced by `#[derive(Model)]`, but can be
//! assembled by hand with the builder methods for data that has no Rust
//! type behind it.

mod json_schema;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{join_path, FormError, Result, ValidationErrors};
use crate::types::{FieldType, TypeTag};
use crate::validation::Constraint;

/// Description of one model field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name, as it appears in the serialized model.
    pub name: String,
    /// How the field is rendered and converted. Fixed once the schema is built.
    pub type_tag: TypeTag,
    /// Optional human-readable description, shown next to the name.
    pub description: Option<String>,
    /// Value used when nothing better is known.
    pub default: Option<Value>,
    /// Constraints checked before the model is constructed.
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Creates a field with an explicit type tag.
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            description: None,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Creates a field whose tag comes from a Rust type.
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        Self::new(name, T::type_tag())
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// The label shown to the user: the name, followed by the description
    /// in parentheses when there is one.
    pub fn label(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("{} ({description})", self.name)
            }
            _ => self.name.clone(),
        }
    }

    /// Whether the field must be filled in.
    pub fn is_required(&self) -> bool {
        self.constraints.contains(&Constraint::Required)
    }

    /// Checks every constraint against a converted value.
    pub fn check(&self, value: &Value) -> std::result::Result<(), Vec<String>> {
        let failures: Vec<String> = self
            .constraints
            .iter()
            .filter_map(|c| c.validate(value).err())
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}

/// Ordered field descriptions for one model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSchema {
    /// Model name (usually the Rust type name).
    pub name: String,
    /// Display title.
    pub title: Option<String>,
    /// Model-level description.
    pub description: Option<String>,
    fields: Vec<FieldSpec>,
}

impl ModelSchema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the display title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Appends a field. Fields render in the order they are added.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Title if set, otherwise the name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Checks field constraints over an assembled mapping, recursing into
    /// nested models wherever they occur: directly, optional, or inside
    /// lists and mappings. Error keys are paths under `prefix`, such as
    /// `shipping_address.city` or `lines[0].qty`.
    pub fn check(&self, mapping: &Map<String, Value>, prefix: &str, errors: &mut ValidationErrors) {
        for field in &self.fields {
            let path = join_path(prefix, &field.name);
            let value = mapping.get(&field.name).unwrap_or(&Value::Null);

            if let Err(messages) = field.check(value) {
                for message in messages {
                    errors.add(&path, message);
                }
            }

            check_nested(&field.type_tag, value, &path, errors);
        }
    }
}

fn check_nested(tag: &TypeTag, value: &Value, path: &str, errors: &mut ValidationErrors) {
    match (tag, value) {
        (TypeTag::Model(schema), Value::Object(inner)) => schema.check(inner, path, errors),
        (TypeTag::Optional(inner), _) => check_nested(inner, value, path, errors),
        (TypeTag::List(inner), Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_nested(inner, item, &join_path(path, &format!("[{i}]")), errors);
            }
        }
        (TypeTag::Mapping(_, inner), Value::Object(entries)) => {
            for (key, item) in entries {
                check_nested(inner, item, &join_path(path, key), errors);
            }
        }
        _ => {}
    }
}

/// A type that can be rendered as a form and rebuilt from it.
///
/// Implement with `#[derive(Model)]`; the struct must also derive serde's
/// `Serialize` and `Deserialize`.
pub trait Model: Serialize + DeserializeOwned {
    /// Returns the schema describing this model's fields.
    fn schema() -> ModelSchema;

    /// Model-level checks run after construction.
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Ok(())
    }

    /// Runs [`Model::validate`] on this model and on every model nested in
    /// its fields. `#[derive(Model)]` walks the fields; a hand-written
    /// model only checks itself.
    fn validate_all(&self) -> std::result::Result<(), ValidationErrors> {
        self.validate()
    }
}

/// Builds a model from a converted mapping.
///
/// Field constraints have already been checked by the caller; this step
/// enforces the types themselves (through serde) and the model-level
/// hooks of the model and everything nested in it.
pub fn construct<M: Model>(mapping: Map<String, Value>) -> Result<M> {
    let instance: M = serde_json::from_value(Value::Object(mapping))
        .map_err(|e| FormError::Construct(e.to_string()))?;
    instance.validate_all().map_err(FormError::Validation)?;
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ModelSchema {
        ModelSchema::new("Person")
            .field(FieldSpec::of::<String>("name").description("Full name"))
            .field(FieldSpec::of::<i64>("age").constraint(Constraint::Ge(0.0)))
    }

    #[test]
    fn test_field_label() {
        let schema = person();
        assert_eq!(schema.fields()[0].label(), "name (Full name)");
        assert_eq!(schema.fields()[1].label(), "age");
    }

    #[test]
    fn test_field_order_is_preserved() {
        let schema = person();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_check_collects_dotted_paths() {
        let schema = ModelSchema::new("Order").field(FieldSpec::new(
            "customer",
            TypeTag::Model(person()),
        ));
        let mapping = serde_json::json!({ "customer": { "name": "Ann", "age": -1 } });
        let mut errors = ValidationErrors::new();
        schema.check(mapping.as_object().unwrap(), "", &mut errors);

        assert_eq!(
            errors.get("customer.age"),
            Some(&["Ensure this value is greater than or equal to 0.".to_string()][..])
        );
    }

    #[test]
    fn test_check_reaches_models_in_options_lists_and_mappings() {
        let schema = ModelSchema::new("Team")
            .field(FieldSpec::new("lead", TypeTag::optional(TypeTag::Model(person()))))
            .field(FieldSpec::new("members", TypeTag::list(TypeTag::Model(person()))))
            .field(FieldSpec::new(
                "by_role",
                TypeTag::mapping(TypeTag::String, TypeTag::Model(person())),
            ));
        let mapping = serde_json::json!({
            "lead": { "name": "Ann", "age": -1 },
            "members": [{ "name": "Bo", "age": 4 }, { "name": "Cy", "age": -2 }],
            "by_role": { "owner": { "name": "Di", "age": -3 } }
        });
        let mut errors = ValidationErrors::new();
        schema.check(mapping.as_object().unwrap(), "", &mut errors);

        let paths: Vec<&str> = errors.all_errors().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["lead.age", "members[1].age", "by_role.owner.age"]);
    }

    #[test]
    fn test_check_skips_empty_optional_model() {
        let schema = ModelSchema::new("Team").field(FieldSpec::new(
            "lead",
            TypeTag::optional(TypeTag::Model(person())),
        ));
        let mapping = serde_json::json!({ "lead": null });
        let mut errors = ValidationErrors::new();
        schema.check(mapping.as_object().unwrap(), "", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        assert_eq!(person().display_title(), "Person");
        assert_eq!(person().title("People").display_title(), "People");
    }
}
