use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartLine, CartSnapshot, QuantityInput, SetQuantityRequest},
        checkout::CheckoutSummary,
        products::{ProductCard, ProductList},
    },
    models::ProductRecord,
    response::{ApiResponse, Meta},
    routes::{cart, checkout, health, params, products},
    store::QuantityPolicy,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::set_quantity,
        cart::increment,
        cart::decrement,
        checkout::checkout
    ),
    components(
        schemas(
            ProductRecord,
            ProductCard,
            ProductList,
            CartLine,
            CartSnapshot,
            QuantityInput,
            SetQuantityRequest,
            CheckoutSummary,
            QuantityPolicy,
            params::Pagination,
            Meta,
            ApiResponse<ProductCard>,
            ApiResponse<ProductList>,
            ApiResponse<CartLine>,
            ApiResponse<CartSnapshot>,
            ApiResponse<CheckoutSummary>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog with live cart state"),
        (name = "Cart", description = "Cart operations"),
        (name = "Checkout", description = "Stubbed checkout"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
