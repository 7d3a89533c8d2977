//! Example models shipped with the demo.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use oxide_autoform::Model;
use oxide_autoform_derive::Model;
use serde::{Deserialize, Serialize};

/// A minimal profile: text, a bounded integer and a comma list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(title = "User Profile")]
pub struct UserProfile {
    pub name: String,
    #[field(ge = 0)]
    pub age: i64,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
#[model(title = "LLM Settings")]
pub struct LlmSettings {
    #[field(description = "Name of the LLM model to use")]
    pub model_name: String,
    #[field(description = "Temperature for sampling (0.0-2.0)", ge = 0.0, le = 2.0)]
    pub temperature: f64,
    #[field(description = "Maximum number of tokens to generate", ge = 1, le = 4096)]
    pub max_tokens: i64,
    #[field(description = "Top-p sampling parameter (0.0-1.0)", ge = 0.0, le = 1.0)]
    pub top_p: f64,
    #[field(description = "Presence penalty (-2.0 to 2.0)", ge = -2.0, le = 2.0)]
    pub presence_penalty: f64,
    #[field(description = "Frequency penalty (-2.0 to 2.0)", ge = -2.0, le = 2.0)]
    pub frequency_penalty: f64,
    #[field(description = "Stop sequences (comma-separated)")]
    pub stop_sequences: Vec<String>,
    #[field(description = "System prompt for the model")]
    pub system_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Product {
    #[field(description = "Product name")]
    pub name: String,
    #[field(description = "Product price (must be positive)", gt = 0)]
    pub price: f64,
    #[field(description = "Product description")]
    pub description: String,
    #[field(description = "Product tags (comma-separated)")]
    pub tags: Vec<String>,
    #[field(description = "Whether the product is in stock")]
    pub in_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Event {
    #[field(description = "Event title")]
    pub title: String,
    #[field(description = "Event date and time")]
    pub date: NaiveDateTime,
    #[field(description = "Event location")]
    pub location: String,
    #[field(description = "Maximum number of participants (optional)")]
    pub max_participants: Option<i64>,
    #[field(description = "Event description")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Address {
    #[field(description = "Street address")]
    pub street: String,
    #[field(description = "City")]
    pub city: String,
    #[field(description = "State/Province")]
    pub state: String,
    #[field(description = "Postal/ZIP code")]
    pub postal_code: String,
    #[field(description = "Country")]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Model)]
pub struct Order {
    #[field(description = "Order ID")]
    pub order_id: String,
    #[field(description = "Customer name")]
    pub customer_name: String,
    #[field(description = "Order items as JSON string")]
    pub items: Vec<HashMap<String, String>>,
    pub shipping_address: Address,
    #[field(description = "Priority shipping")]
    pub priority: bool,
}

/// Models selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExampleModel {
    UserProfile,
    LlmSettings,
    Product,
    Event,
    Address,
    Order,
}

/// Runs `$body` with `$m` bound to the model type behind `$model`.
macro_rules! with_model {
    ($model:expr, |$m:ident| $body:expr) => {
        match $model {
            $crate::models::ExampleModel::UserProfile => {
                type $m = $crate::models::UserProfile;
                $body
            }
            $crate::models::ExampleModel::LlmSettings => {
                type $m = $crate::models::LlmSettings;
                $body
            }
            $crate::models::ExampleModel::Product => {
                type $m = $crate::models::Product;
                $body
            }
            $crate::models::ExampleModel::Event => {
                type $m = $crate::models::Event;
                $body
            }
            $crate::models::ExampleModel::Address => {
                type $m = $crate::models::Address;
                $body
            }
            $crate::models::ExampleModel::Order => {
                type $m = $crate::models::Order;
                $body
            }
        }
    };
}

pub(crate) use with_model;

impl ExampleModel {
    /// Returns the schema of the model.
    pub fn schema(self) -> oxide_autoform::ModelSchema {
        with_model!(self, |M| M::schema())
    }

    /// Returns the command-line name of the model.
    pub fn cli_name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }
}
