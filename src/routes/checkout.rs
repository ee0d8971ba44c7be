use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::checkout::CheckoutSummary,
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Checkout summary; nothing is charged", body = ApiResponse<CheckoutSummary>),
        (status = 400, description = "Cart is empty"),
    ),
    tag = "Checkout"
)]
pub async fn checkout(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CheckoutSummary>>> {
    let summary = state.store().await?.checkout().await?;
    tracing::info!(order_ref = %summary.order_ref, total = %summary.total_price, "checkout stub");
    Ok(Json(ApiResponse::success(
        "Checkout complete",
        summary,
        Some(Meta::empty()),
    )))
}
