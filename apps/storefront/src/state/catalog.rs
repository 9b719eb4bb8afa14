//! # Catalog Loading
//!
//! The built-in storefront catalog, or a TOML file that replaces it.
//!
//! ```toml
//! [[products]]
//! id = "rolex-green"
//! name = "Rolex Land-Dweller"
//! price = "250.00"
//! img = "images/rolex-green.jpg"
//! ```
//!
//! Prices are written as decimal strings so the file never holds a float.

use std::path::Path;

use serde::Deserialize;
use tracing::info;
use zaynar_core::{Catalog, Money, Product};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    id: String,
    name: String,
    price: String,
    #[serde(default)]
    img: String,
}

/// Loads the catalog from `path`, or the built-in one when `None`.
pub fn load_catalog(path: Option<&Path>) -> AppResult<Catalog> {
    let Some(path) = path else {
        let catalog = Catalog::storefront();
        info!(products = catalog.len(), "Using built-in catalog");
        return Ok(catalog);
    };

    let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let catalog = parse_catalog(&contents)?;
    info!(?path, products = catalog.len(), "Loaded catalog file");
    Ok(catalog)
}

/// Parses catalog TOML.
pub fn parse_catalog(contents: &str) -> AppResult<Catalog> {
    let file: CatalogFile = toml::from_str(contents)?;

    if file.products.is_empty() {
        return Err(AppError::Catalog("catalog has no products".into()));
    }

    let products = file
        .products
        .into_iter()
        .map(|entry| {
            let price: Money = entry
                .price
                .parse()
                .map_err(|e| AppError::Catalog(format!("product '{}': {}", entry.id, e)))?;
            Ok(Product::new(entry.id, entry.name, price, entry.img))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Catalog::new(products).map_err(|e| AppError::Catalog(e.to_string()))
}
