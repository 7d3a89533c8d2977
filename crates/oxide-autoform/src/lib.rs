//! # oxide-autoform
//!
//! Schema-driven form synthesis: describe a model once and get input
//! widgets, typed conversion, validation and construction for free.
//!
//! This crate provides:
//! - Field type classification ([`TypeTag`], [`FieldType`])
//! - Model schemas with field constraints ([`ModelSchema`], [`Constraint`])
//! - A stateless form pass over any presentation layer ([`FormSynthesizer`], [`Presenter`])
//! - A Bootstrap 5 HTML presenter ([`BootstrapForm`])
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_autoform::{
//!     Constraint, FieldSpec, FormSynthesizer, ModelSchema, SubmittedValues,
//! };
//!
//! let schema = ModelSchema::new("Person")
//!     .field(FieldSpec::of::<String>("name"))
//!     .field(FieldSpec::of::<i64>("age").constraint(Constraint::Ge(0.0)))
//!     .field(FieldSpec::of::<Vec<String>>("tags"));
//!
//! let mut presenter = SubmittedValues::from_pairs([
//!     ("name", "Alice"),
//!     ("age", "30"),
//!     ("tags", "x, y, z"),
//! ]);
//!
//! let synth = FormSynthesizer::default();
//! let person = synth.run_schema(&schema, &mut presenter, None).unwrap();
//! assert_eq!(person["tags"], serde_json::json!(["x", "y", "z"]));
//! ```
//!
//! ## Typed models
//!
//! With `#[derive(Model)]` from `oxide-autoform-derive`, [`FormSynthesizer::run`]
//! returns the struct itself:
//!
//! ```rust,ignore
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! struct UserProfile {
//!     name: String,
//!     #[field(ge = 0)]
//!     age: i64,
//!     interests: Vec<String>,
//! }
//!
//! let profile: Option<UserProfile> = synth.run(&mut presenter, None);
//! ```
//!
//! A failed pass returns `None` and shows `Validation error: <details>`
//! on the presenter.

mod config;
mod convert;
mod error;
mod form;
mod present;
mod schema;
mod synth;
mod types;
pub mod validation;
pub mod widgets;

pub use config::SynthConfig;
pub use convert::{parse_datetime, Converter, RawInput, DATETIME_FORMAT, DATE_FORMAT};
pub use error::{ConversionError, FormError, Result, ValidationErrors};
pub use form::{render_bootstrap_field, render_page, BootstrapForm};
pub use present::{Presenter, SubmittedValues};
pub use schema::{construct, FieldSpec, Model, ModelSchema};
pub use synth::{model_inputs, FormSynthesizer, RawInputs};
pub use types::{FieldType, TypeTag};
pub use validation::Constraint;
pub use widgets::{NumberStep, WidgetKind, WidgetRequest};
