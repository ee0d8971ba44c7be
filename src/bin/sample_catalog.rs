use std::path::PathBuf;

use reactive_cart::models::ProductRecord;
use serde_json::json;

/// Write a small demo catalog for use with `CATALOG_PATH`.
///
/// Usage: `sample_catalog [path]` (default `catalog.json`).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("catalog.json"));

    let products = sample_products();
    let body = serde_json::to_string_pretty(&json!({ "products": products }))?;
    tokio::fs::write(&path, body).await?;

    println!("Wrote {} products to {}", products.len(), path.display());
    Ok(())
}

fn sample_products() -> Vec<ProductRecord> {
    let products = [
        ("Axum Hoodie", 55.0, 10.0),
        ("Ferris Mug", 12.0, 0.0),
        ("Rust Sticker Pack", 5.0, 0.0),
        ("E-book: Async Rust", 25.0, 20.0),
        ("Crab Plushie", 19.99, 5.0),
        ("Borrow Checker T-Shirt", 24.99, 15.0),
    ];

    products
        .into_iter()
        .zip(1u64..)
        .map(|((title, price, discount), id)| ProductRecord {
            id,
            title: title.to_string(),
            price,
            discount_percentage: discount,
            thumbnail: format!("https://cdn.example.com/products/{id}/thumbnail.png"),
        })
        .collect()
}
