use std::env;
use std::path::PathBuf;

use crate::catalog::{Catalog, FileCatalog, HttpCatalog};
use crate::store::QuantityPolicy;

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub catalog: Catalog,
    pub quantity_policy: QuantityPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        // A local file wins over the remote feed.
        let catalog = match env::var("CATALOG_PATH") {
            Ok(path) if !path.trim().is_empty() => Catalog::File(FileCatalog {
                path: PathBuf::from(path),
            }),
            _ => Catalog::Http(HttpCatalog {
                url: env::var("CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string()),
            }),
        };

        let quantity_policy = match env::var("CART_QUANTITY_POLICY") {
            Ok(raw) => raw.parse::<QuantityPolicy>()?,
            Err(_) => QuantityPolicy::default(),
        };

        Ok(Self {
            host,
            port,
            catalog,
            quantity_policy,
        })
    }
}
