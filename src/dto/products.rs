use serde::Serialize;
use utoipa::ToSchema;

use crate::store::CartEntry;

/// A catalog card: the record plus its live cart state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductCard {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub thumbnail: String,
    pub quantity: i64,
    pub in_cart: bool,
    #[schema(example = "160.00")]
    pub final_price: String,
}

impl From<&CartEntry> for ProductCard {
    fn from(entry: &CartEntry) -> Self {
        let record = entry.record();
        Self {
            id: record.id,
            title: record.title.clone(),
            price: record.price,
            discount_percentage: record.discount_percentage,
            thumbnail: record.thumbnail.clone(),
            quantity: entry.quantity(),
            in_cart: entry.in_cart(),
            final_price: entry.final_price_display(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductCard>)]
    pub items: Vec<ProductCard>,
}

/// One page of the catalog plus the catalog size.
#[derive(Debug)]
pub struct ProductPage {
    pub items: ProductList,
    pub total: usize,
}
