use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::products::{ProductCard, ProductList},
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(Pagination),
    responses(
        (status = 200, description = "Catalog page with live cart state", body = ApiResponse<ProductList>),
        (status = 503, description = "Catalog not yet available"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (page, per_page, _) = pagination.normalize();
    let (offset, limit) = pagination.window();
    let result = state.store().await?.products(offset, limit).await?;

    let total = i64::try_from(result.total).unwrap_or(i64::MAX);
    let meta = Meta::new(page, per_page, total);
    Ok(Json(ApiResponse::success("Products", result.items, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = u64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductCard>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ApiResponse<ProductCard>>> {
    let card = state.store().await?.product(id).await?;
    Ok(Json(ApiResponse::success("Product", card, None)))
}
