//! Catalog snapshot loading.
//!
//! The catalog is fetched once at startup. Nothing here retries; a failed
//! load leaves the service in its "catalog not yet available" state.

use std::future::Future;
use std::path::PathBuf;

use crate::error::CatalogError;
use crate::models::{CatalogPayload, ProductRecord};

/// Anything that can produce the catalog snapshot.
pub trait CatalogSource {
    fn load(&self) -> impl Future<Output = Result<Vec<ProductRecord>, CatalogError>> + Send;
}

/// Fetches the catalog from a DummyJSON-style HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    pub url: String,
}

impl CatalogSource for HttpCatalog {
    async fn load(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        tracing::info!(url = %self.url, "fetching catalog");
        let client = reqwest::Client::new();
        let payload = client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<CatalogPayload>()
            .await?;
        Ok(payload.into_records())
    }
}

/// Reads the catalog from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    pub path: PathBuf,
}

impl CatalogSource for FileCatalog {
    async fn load(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        tracing::info!(path = %self.path.display(), "reading catalog");
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let payload: CatalogPayload = serde_json::from_str(&raw)?;
        Ok(payload.into_records())
    }
}

/// The catalog location chosen by configuration.
#[derive(Debug, Clone)]
pub enum Catalog {
    Http(HttpCatalog),
    File(FileCatalog),
}

impl CatalogSource for Catalog {
    async fn load(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let records = match self {
            Catalog::Http(source) => source.load().await?,
            Catalog::File(source) => source.load().await?,
        };
        tracing::info!(products = records.len(), "catalog loaded");
        Ok(records)
    }
}
