use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One purchasable item as delivered by the catalog feed.
///
/// Extra fields in the feed (description, stock, brand, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub thumbnail: String,
}

impl ProductRecord {
    /// Price of a single unit after the flat percentage discount.
    pub fn unit_price(&self) -> f64 {
        self.price * (1.0 - self.discount_percentage / 100.0)
    }
}

/// Catalog payload as served by the feed: either `{ "products": [...] }` or
/// a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    Wrapped { products: Vec<ProductRecord> },
    Bare(Vec<ProductRecord>),
}

impl CatalogPayload {
    pub fn into_records(self) -> Vec<ProductRecord> {
        match self {
            CatalogPayload::Wrapped { products } => products,
            CatalogPayload::Bare(products) => products,
        }
    }
}
