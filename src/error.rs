use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

/// Failures of the cart store itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("entry {id} not found")]
    EntryNotFound { id: u64 },

    #[error("duplicate product id {id} in catalog")]
    DuplicateId { id: u64 },

    #[error("invalid quantity `{input}`")]
    InvalidQuantity { input: String },

    #[error("negative quantity {value} rejected")]
    NegativeQuantity { value: i64 },

    #[error("cart is empty")]
    EmptyCart,

    #[error("cart store could not be started")]
    Unavailable,

    #[error("cart store command failed")]
    CommandFailed,

    #[error("cart store has stopped")]
    Stopped,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures while fetching the catalog snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed")]
    Http(#[from] reqwest::Error),

    #[error("catalog file unreadable")]
    Io(#[from] std::io::Error),

    #[error("catalog payload malformed")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Catalog not yet available")]
    CatalogUnavailable,

    #[error("Cart store stopped")]
    StoreStopped,

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EntryNotFound { .. } => AppError::NotFound,
            StoreError::InvalidQuantity { .. }
            | StoreError::NegativeQuantity { .. }
            | StoreError::EmptyCart => AppError::BadRequest(err.to_string()),
            StoreError::Unavailable => AppError::CatalogUnavailable,
            StoreError::Stopped => AppError::StoreStopped,
            StoreError::DuplicateId { .. } | StoreError::CommandFailed => {
                AppError::Internal(err.into())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CatalogUnavailable | AppError::StoreStopped => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
