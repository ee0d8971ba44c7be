use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use crate::{
    dto::cart::{CartLine, CartSnapshot, SetQuantityRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    service::Step,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list))
        .route("/{product_id}", post(add_to_cart).delete(remove_from_cart))
        .route("/{product_id}/quantity", put(set_quantity))
        .route("/{product_id}/increment", post(increment))
        .route("/{product_id}/decrement", post(decrement))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines and totals", body = ApiResponse<CartSnapshot>),
        (status = 503, description = "Catalog not yet available"),
    ),
    tag = "Cart"
)]
pub async fn cart_list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartSnapshot>>> {
    let cart = state.store().await?.cart().await?;
    let meta = Meta::count(cart.items.len());
    Ok(Json(ApiResponse::success("OK", cart, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Added one more to the cart", body = ApiResponse<CartLine>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let line = state.store().await?.add_to_cart(product_id).await?;
    Ok(Json(ApiResponse::success("Added to cart", line, None)))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Removed from cart, quantity reset", body = ApiResponse<CartLine>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let line = state.store().await?.remove_item(product_id).await?;
    Ok(Json(ApiResponse::success(
        "Removed from cart",
        line,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/cart/{product_id}/quantity",
    params(
        ("product_id" = u64, Path, description = "Product ID")
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity set", body = ApiResponse<CartLine>),
        (status = 400, description = "Quantity refused"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn set_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
    Json(payload): Json<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let line = state
        .store()
        .await?
        .set_quantity(product_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::success("Quantity updated", line, None)))
}

#[utoipa::path(
    post,
    path = "/api/cart/{product_id}/increment",
    params(
        ("product_id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Quantity raised by one", body = ApiResponse<CartLine>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn increment(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let line = state.store().await?.step(product_id, Step::Up).await?;
    Ok(Json(ApiResponse::success("Quantity updated", line, None)))
}

#[utoipa::path(
    post,
    path = "/api/cart/{product_id}/decrement",
    params(
        ("product_id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Quantity lowered by one", body = ApiResponse<CartLine>),
        (status = 400, description = "Quantity refused"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn decrement(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let line = state.store().await?.step(product_id, Step::Down).await?;
    Ok(Json(ApiResponse::success("Quantity updated", line, None)))
}
