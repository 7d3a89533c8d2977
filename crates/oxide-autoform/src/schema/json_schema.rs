//! JSON Schema export for displaying a model's shape.

use serde_json::{json, Map, Value};

use super::{FieldSpec, ModelSchema};
use crate::types::TypeTag;
use crate::validation::Constraint;

impl ModelSchema {
    /// Describes the model as a JSON Schema object.
    ///
    /// Nested models are inlined. A field is listed as required unless it
    /// is optional or has a default.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields() {
            properties.insert(field.name.clone(), field_schema(field));
            if !field.type_tag.is_optional() && field.default.is_none() {
                required.push(Value::String(field.name.clone()));
            }
        }

        let mut schema = Map::new();
        schema.insert("title".into(), json!(self.display_title()));
        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        Value::Object(schema)
    }
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut schema = match type_schema(&field.type_tag) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    schema.insert("title".into(), json!(field.name));
    if let Some(description) = &field.description {
        schema.insert("description".into(), json!(description));
    }
    if let Some(default) = &field.default {
        schema.insert("default".into(), default.clone());
    }

    let value_type = field.type_tag.required_type();
    for constraint in &field.constraints {
        match constraint {
            Constraint::Ge(n) => {
                schema.insert("minimum".into(), json!(n));
            }
            Constraint::Gt(n) => {
                schema.insert("exclusiveMinimum".into(), json!(n));
            }
            Constraint::Le(n) => {
                schema.insert("maximum".into(), json!(n));
            }
            Constraint::Lt(n) => {
                schema.insert("exclusiveMaximum".into(), json!(n));
            }
            Constraint::MinLength(n) => {
                schema.insert(length_keyword(value_type, "min").into(), json!(n));
            }
            Constraint::MaxLength(n) => {
                schema.insert(length_keyword(value_type, "max").into(), json!(n));
            }
            Constraint::Pattern(pattern) => {
                schema.insert("pattern".into(), json!(pattern.as_str()));
            }
            Constraint::Email => {
                schema.insert("format".into(), json!("email"));
            }
            Constraint::Url => {
                schema.insert("format".into(), json!("uri"));
            }
            Constraint::Required => {}
        }
    }

    Value::Object(schema)
}

fn type_schema(tag: &TypeTag) -> Value {
    match tag {
        TypeTag::String => json!({ "type": "string" }),
        TypeTag::Integer => json!({ "type": "integer" }),
        TypeTag::Float => json!({ "type": "number" }),
        TypeTag::Boolean => json!({ "type": "boolean" }),
        TypeTag::List(inner) => json!({ "type": "array", "items": type_schema(inner) }),
        TypeTag::Mapping(_, value) => {
            json!({ "type": "object", "additionalProperties": type_schema(value) })
        }
        TypeTag::DateTime => json!({ "type": "string", "format": "date-time" }),
        TypeTag::Date => json!({ "type": "string", "format": "date" }),
        TypeTag::Optional(inner) => json!({ "anyOf": [type_schema(inner), { "type": "null" }] }),
        TypeTag::Model(schema) => schema.json_schema(),
        TypeTag::Other => json!({}),
    }
}

fn length_keyword(tag: &TypeTag, bound: &str) -> String {
    let noun = match tag {
        TypeTag::List(_) => "Items",
        TypeTag::Mapping(..) => "Properties",
        _ => "Length",
    };
    format!("{bound}{noun}")
}
