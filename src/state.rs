use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    service::StoreHandle,
};

/// Where the catalog load stands.
#[derive(Debug, Clone)]
pub enum CatalogStatus {
    Loading,
    Ready(StoreHandle),
    Failed(String),
}

impl CatalogStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogStatus::Loading => "loading",
            CatalogStatus::Ready(store) if !store.is_running() => "stopped",
            CatalogStatus::Ready(_) => "ready",
            CatalogStatus::Failed(_) => "failed",
        }
    }
}

/// Shared application state, built once at the root and handed to every
/// handler through axum's `State`.
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<RwLock<CatalogStatus>>,
}

impl AppState {
    /// State for a service whose catalog is still being fetched.
    pub fn loading() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(CatalogStatus::Loading)),
        }
    }

    pub fn ready(store: StoreHandle) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(CatalogStatus::Ready(store))),
        }
    }

    pub async fn install(&self, store: StoreHandle) {
        *self.catalog.write().await = CatalogStatus::Ready(store);
    }

    pub async fn fail(&self, reason: impl Into<String>) {
        *self.catalog.write().await = CatalogStatus::Failed(reason.into());
    }

    pub async fn status(&self) -> CatalogStatus {
        self.catalog.read().await.clone()
    }

    /// The store, `CatalogUnavailable` while there is none, or `StoreStopped`
/// once its thread has exited.
    pub async fn store(&self) -> AppResult<StoreHandle> {
        match &*self.catalog.read().await {
            CatalogStatus::Ready(store) if !store.is_running() => Err(AppError::StoreStopped),
            CatalogStatus::Ready(store) => Ok(store.clone()),
            CatalogStatus::Loading | CatalogStatus::Failed(_) => Err(AppError::CatalogUnavailable),
        }
    }
}
