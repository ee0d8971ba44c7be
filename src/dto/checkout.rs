use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::cart::CartLine;

/// What the stubbed checkout hands back. Nothing is charged and the cart
/// is left as it was.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub order_ref: Uuid,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<CartLine>,
    pub total_quantity: i64,
    #[schema(example = "260.00")]
    pub total_price: String,
}
