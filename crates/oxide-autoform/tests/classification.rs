//! Tests for type classification, structural and textual.

mod common;
use common::*;

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use oxide_autoform::{FieldType, FormSynthesizer, Model, SynthConfig, TypeTag, WidgetKind};

#[test]
fn test_structural_classification() {
    assert_eq!(String::type_tag(), TypeTag::String);
    assert_eq!(u16::type_tag(), TypeTag::Integer);
    assert_eq!(f32::type_tag(), TypeTag::Float);
    assert_eq!(bool::type_tag(), TypeTag::Boolean);
    assert_eq!(NaiveDateTime::type_tag(), TypeTag::DateTime);
    assert_eq!(NaiveDate::type_tag(), TypeTag::Date);
    assert_eq!(Vec::<i32>::type_tag(), TypeTag::list(TypeTag::Integer));
    assert_eq!(
        HashMap::<String, f64>::type_tag(),
        TypeTag::mapping(TypeTag::String, TypeTag::Float)
    );
    assert_eq!(
        BTreeMap::<String, Vec<bool>>::type_tag(),
        TypeTag::mapping(TypeTag::String, TypeTag::list(TypeTag::Boolean))
    );
    assert_eq!(
        Option::<Vec<String>>::type_tag(),
        TypeTag::optional(TypeTag::list(TypeTag::String))
    );
}

#[test]
fn test_derived_models_classify_as_models() {
    let TypeTag::Model(schema) = Address::type_tag() else {
        panic!("expected a model tag");
    };
    assert_eq!(schema, Address::schema());
}

#[test]
fn test_textual_exact_identifiers() {
    assert_eq!("i64".parse::<TypeTag>().unwrap(), TypeTag::Integer);
    assert_eq!("std::string::String".parse::<TypeTag>().unwrap(), TypeTag::String);
    assert_eq!(
        "Option<chrono::NaiveDateTime>".parse::<TypeTag>().unwrap(),
        TypeTag::optional(TypeTag::DateTime)
    );
    assert_eq!(
        "list[int]".parse::<TypeTag>().unwrap(),
        TypeTag::list(TypeTag::Integer)
    );
    assert_eq!(
        "dict[str, str]".parse::<TypeTag>().unwrap(),
        TypeTag::mapping(TypeTag::String, TypeTag::String)
    );
}

#[test]
fn test_lookalike_names_are_not_misclassified() {
    // Names that merely contain "int", "list" or "str".
    for name in ["Point", "Interval", "Stringy", "Blacklist", "Strategy", "Dictionary"] {
        assert_eq!(TypeTag::from_type_name(name), TypeTag::Other, "{name}");
    }
    assert_eq!(
        TypeTag::from_type_name("Vec<Point>"),
        TypeTag::list(TypeTag::Other)
    );
    assert_eq!(TypeTag::from_type_name("Vec<Point"), TypeTag::Other);
}

#[test]
fn test_opaque_field_is_free_text() {
    let schema = Shape::schema();
    let origin = schema.get("origin").unwrap();
    assert_eq!(origin.type_tag, TypeTag::Other);

    let requests = FormSynthesizer::default().plan(&schema, None);
    assert_eq!(requests[1].kind, WidgetKind::TextInput);

    let shape: Shape = submit_ok(&[("name", "tri"), ("origin", "1,2")]);
    assert_eq!(shape.origin, Point("1,2".to_string()));
}

#[test]
fn test_lists_of_unknown_types_are_textareas() {
    let tag = TypeTag::from_type_name("Vec<Point>");
    assert_eq!(
        WidgetKind::for_type(&tag, &SynthConfig::default()),
        Some(WidgetKind::TextArea)
    );
}
