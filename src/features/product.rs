use super::amount::round_serialize;
use serde::{Deserialize, Serialize};

/// A stocked product, identified by its label
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    label: String,

    #[serde(serialize_with = "round_serialize")]
    price: f64,

    /// Units on hand, updated in place through the stock
    quantity: i32,
}

impl Product {
    pub fn new(label: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            label: label.into(),
            price,
            quantity,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Set the product's quantity.
    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
    }
}
