#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use oxide_autoform::{FormSynthesizer, Model, SubmittedValues, ValidationErrors};
use oxide_autoform_derive::Model;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct UserProfile {
    pub name: String,
    #[field(ge = 0)]
    pub age: i64,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Address {
    #[field(description = "Street address")]
    pub street: String,
    #[field(description = "City")]
    pub city: String,
    #[field(description = "Postal/ZIP code")]
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Order {
    #[field(description = "Order ID")]
    pub order_id: String,
    #[field(description = "Order items as JSON string")]
    pub items: Vec<HashMap<String, String>>,
    pub shipping_address: Address,
    #[field(description = "Priority shipping")]
    pub priority: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(title = "Job Settings")]
pub struct JobSettings {
    #[field(default = 3)]
    pub retries: i64,
    #[field(default = 0.5, ge = 0.0, le = 1.0)]
    pub ratio: f64,
    pub limit: Option<i64>,
    pub starts_at: NaiveDateTime,
    pub deadline: Option<NaiveDate>,
    pub labels: BTreeMap<String, String>,
    pub scores: Vec<f64>,
}

/// Account sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(validate = "check_passwords")]
pub struct Signup {
    /// Login name
    #[field(required, min_length = 3, max_length = 20, pattern = "^[a-z0-9_]+$")]
    pub username: String,
    #[field(email)]
    pub email: String,
    #[field(url)]
    pub homepage: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

fn check_passwords(signup: &Signup) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if signup.password != signup.password_confirm {
        errors.add("password_confirm", "Passwords do not match.");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(validate = "check_zip")]
pub struct Destination {
    pub city: String,
    pub zip: String,
}

fn check_zip(destination: &Destination) -> Result<(), ValidationErrors> {
    if destination.zip.len() == 5 && destination.zip.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut errors = ValidationErrors::new();
    errors.add("zip", "Enter a five-digit ZIP code.");
    Err(errors)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct LineItem {
    pub sku: String,
    #[field(ge = 0)]
    pub qty: i64,
}

/// Models nested directly, optionally, in a list and in a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Shipment {
    pub destination: Destination,
    pub sample: Option<LineItem>,
    pub lines: Vec<LineItem>,
    pub returns: BTreeMap<String, Destination>,
}

/// A type the classifier knows nothing about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Shape {
    pub name: String,
    #[field(opaque)]
    pub origin: Point,
}

/// Runs one pass of `M` over submitted text values.
pub fn submit<M: Model>(pairs: &[(&str, &str)]) -> (Option<M>, SubmittedValues) {
    let mut presenter = SubmittedValues::from_pairs(pairs.iter().copied());
    let instance = FormSynthesizer::default().run(&mut presenter, None);
    (instance, presenter)
}

pub fn submit_ok<M: Model>(pairs: &[(&str, &str)]) -> M {
    let (instance, presenter) = submit::<M>(pairs);
    instance.unwrap_or_else(|| panic!("Expected a valid pass, got {:?}", presenter.errors()))
}

pub fn submit_err<M: Model + std::fmt::Debug>(pairs: &[(&str, &str)]) -> SubmittedValues {
    let (instance, presenter) = submit::<M>(pairs);
    assert!(instance.is_none(), "Expected a failed pass, got {instance:?}");
    presenter
}
