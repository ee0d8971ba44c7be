use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::{CartEntry, CartStore};

/// A row of the cart table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub quantity: i64,
    #[schema(example = "100.00")]
    pub final_price: String,
}

impl From<&CartEntry> for CartLine {
    fn from(entry: &CartEntry) -> Self {
        let record = entry.record();
        Self {
            id: record.id,
            title: record.title.clone(),
            price: record.price,
            discount_percentage: record.discount_percentage,
            quantity: entry.quantity(),
            final_price: entry.final_price_display(),
        }
    }
}

/// The cart as one consistent read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub total_quantity: i64,
    #[schema(example = "100.00")]
    pub total_price: String,
}

impl CartSnapshot {
    pub fn capture(store: &CartStore) -> Self {
        Self {
            items: store.cart_items().iter().map(CartLine::from).collect(),
            total_quantity: store.total_quantity(),
            total_price: store.total_price_display(),
        }
    }
}

/// A quantity as typed by the user: a number, or raw text from the field.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: QuantityInput,
}
