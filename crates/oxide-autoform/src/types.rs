//! Field type classification.
//!
//! Every field of a [`ModelSchema`] carries a [`TypeTag`] that decides which
//! widget renders it and how its raw input is converted back. Tags come from
//! the Rust type itself through [`FieldType`], or from a textual type
//! expression through [`TypeTag::from_type_name`]. Both match on exact type
//! identity: a type called `Point` is never an integer just because its name
//! contains `int`.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ValidationErrors;
use crate::schema::ModelSchema;

/// The closed set of field kinds a form knows how to render and convert.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTag {
    /// Free text.
    String,
    /// Whole number.
    Integer,
    /// Floating-point number.
    Float,
    /// True/false toggle.
    Boolean,
    /// Ordered sequence of the inner type.
    List(Box<TypeTag>),
    /// Key/value mapping.
    Mapping(Box<TypeTag>, Box<TypeTag>),
    /// Date and time of day, without timezone.
    DateTime,
    /// Calendar date.
    Date,
    /// The inner type, or nothing.
    Optional(Box<TypeTag>),
    /// A nested model rendered field by field.
    Model(ModelSchema),
    /// Anything else; rendered and submitted as plain text.
    Other,
}

impl TypeTag {
    /// Shorthand for `TypeTag::List`.
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Shorthand for `TypeTag::Mapping`.
    pub fn mapping(key: Self, value: Self) -> Self {
        Self::Mapping(Box::new(key), Box::new(value))
    }

    /// Shorthand for `TypeTag::Optional`.
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Returns whether the field may be left empty.
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Strips one `Optional` layer, if present.
    pub fn required_type(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// Returns the nested schema when the field is itself a model.
    pub fn as_model(&self) -> Option<&ModelSchema> {
        match self {
            Self::Model(schema) => Some(schema),
            _ => None,
        }
    }

    /// Classifies a textual type expression.
    ///
    /// Accepts Rust spellings (`i64`, `Vec<String>`, `Option<f64>`,
    /// `std::collections::HashMap<String, i32>`, `chrono::NaiveDate`) and the
    /// common annotation spellings (`int`, `list[str]`, `dict[str, int]`,
    /// `Optional[float]`). Only the last path segment is inspected, and it
    /// must match exactly. Anything unrecognized or malformed is `Other`.
    pub fn from_type_name(name: &str) -> Self {
        let Some(tokens) = tokenize(name) else {
            return Self::Other;
        };
        let mut parser = TypeExprParser { tokens, pos: 0 };
        match parser.parse_type() {
            Some(tag) if parser.pos == parser.tokens.len() => tag,
            _ => Self::Other,
        }
    }
}

impl FromStr for TypeTag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_type_name(s))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Boolean => f.write_str("boolean"),
            Self::List(inner) => write!(f, "list of {inner}"),
            Self::Mapping(key, value) => write!(f, "mapping of {key} to {value}"),
            Self::DateTime => f.write_str("datetime"),
            Self::Date => f.write_str("date"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Model(schema) => write!(f, "{}", schema.name),
            Self::Other => f.write_str("text"),
        }
    }
}

/// Types that know their own [`TypeTag`].
///
/// `#[derive(Model)]` implements this for every model so it can be nested
/// inside another one. A model cannot contain itself, directly or through a
/// list, option or mapping: its tag would be infinitely deep.
pub trait FieldType {
    /// Returns the tag describing how this type is rendered and converted.
    fn type_tag() -> TypeTag;

    /// Runs the model-level checks of every model inside this value. Error
    /// keys are relative to the value: `[0].zip` for the first item of a
    /// list, `zip` for a model itself.
    fn validate_value(&self) -> ValidationErrors {
        ValidationErrors::new()
    }
}

macro_rules! impl_field_type {
    ($tag:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn type_tag() -> TypeTag {
                    $tag
                }
            }
        )+
    };
}

impl_field_type!(TypeTag::Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_field_type!(TypeTag::Float => f32, f64);
impl_field_type!(TypeTag::String => String);
impl_field_type!(TypeTag::Boolean => bool);
impl_field_type!(TypeTag::DateTime => NaiveDateTime);
impl_field_type!(TypeTag::Date => NaiveDate);
impl_field_type!(TypeTag::Other => serde_json::Value);

fn validate_items<'a, T: FieldType + 'a>(items: impl Iterator<Item = &'a T>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for (i, item) in items.enumerate() {
        errors.merge(&format!("[{i}]"), item.validate_value());
    }
    errors
}

fn validate_entries<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> ValidationErrors
where
    K: fmt::Display + 'a,
    V: FieldType + 'a,
{
    let mut errors = ValidationErrors::new();
    for (key, value) in entries {
        errors.merge(&key.to_string(), value.validate_value());
    }
    errors
}

impl<T: FieldType> FieldType for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::list(T::type_tag())
    }

    fn validate_value(&self) -> ValidationErrors {
        validate_items(self.iter())
    }
}

impl<T: FieldType> FieldType for VecDeque<T> {
    fn type_tag() -> TypeTag {
        TypeTag::list(T::type_tag())
    }

    fn validate_value(&self) -> ValidationErrors {
        validate_items(self.iter())
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn type_tag() -> TypeTag {
        TypeTag::optional(T::type_tag())
    }

    fn validate_value(&self) -> ValidationErrors {
        self.as_ref()
            .map(T::validate_value)
            .unwrap_or_default()
    }
}

impl<K: FieldType + fmt::Display, V: FieldType, S> FieldType for HashMap<K, V, S> {
    fn type_tag() -> TypeTag {
        TypeTag::mapping(K::type_tag(), V::type_tag())
    }

    fn validate_value(&self) -> ValidationErrors {
        validate_entries(self.iter())
    }
}

impl<K: FieldType + fmt::Display, V: FieldType> FieldType for BTreeMap<K, V> {
    fn type_tag() -> TypeTag {
        TypeTag::mapping(K::type_tag(), V::type_tag())
    }

    fn validate_value(&self) -> ValidationErrors {
        validate_entries(self.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Open,
    Close,
    Comma,
}

fn tokenize(input: &str) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '<' | '[' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '>' | ']' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            c if c.is_alphanumeric() || c == '_' || c == ':' || c == '.' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == ':' || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(&input[start..end]));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

struct TypeExprParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TypeExprParser<'a> {
    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn parse_type(&mut self) -> Option<TypeTag> {
        let Some(Token::Ident(path)) = self.next() else {
            return None;
        };
        let ident = path
            .rsplit(|c: char| c == ':' || c == '.')
            .next()
            .unwrap_or(path)
            .to_string();

        let mut args = Vec::new();
        if self.peek() == Some(Token::Open) {
            self.pos += 1;
            loop {
                args.push(self.parse_type()?);
                match self.next()? {
                    Token::Comma => {}
                    Token::Close => break,
                    _ => return None,
                }
            }
        }

        Some(classify_ident(&ident, args))
    }
}

fn classify_ident(ident: &str, mut args: Vec<TypeTag>) -> TypeTag {
    match (ident, args.len()) {
        ("String" | "str", 0) => TypeTag::String,
        (
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "u128" | "usize" | "int",
            0,
        ) => TypeTag::Integer,
        ("f32" | "f64" | "float", 0) => TypeTag::Float,
        ("bool", 0) => TypeTag::Boolean,
        ("NaiveDateTime" | "DateTime" | "datetime", 0) => TypeTag::DateTime,
        ("NaiveDate" | "date", 0) => TypeTag::Date,
        ("Vec" | "VecDeque" | "List" | "list" | "Sequence", 1) => TypeTag::list(args.remove(0)),
        ("Vec" | "VecDeque" | "List" | "list" | "Sequence", 0) => TypeTag::list(TypeTag::Other),
        ("Option" | "Optional", 1) => TypeTag::optional(args.remove(0)),
        ("HashMap" | "BTreeMap" | "Dict" | "dict" | "Mapping", 2) => {
            let value = args.remove(1);
            TypeTag::mapping(args.remove(0), value)
        }
        ("HashMap" | "BTreeMap" | "Dict" | "dict" | "Mapping", 0) => {
            TypeTag::mapping(TypeTag::String, TypeTag::Other)
        }
        _ => TypeTag::Other,
    }
}
