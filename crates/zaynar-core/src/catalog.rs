//! # Product Catalog
//!
//! The static list of products the storefront sells.
//!
//! The catalog is built once at startup and only ever read. The cart looks
//! products up here by id (the "add to bag" buttons) or by name (the
//! reject-duplicate flow); nothing is ever looked up in rendered markup.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price, validate_product_id, validate_product_name};

/// Read-only product catalog, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, validating every product.
    ///
    /// ## Errors
    /// - `CoreError::Validation` if an id, name or price is malformed
    /// - `CoreError::DuplicateProduct` if two products share an id or a name
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_name = HashMap::with_capacity(products.len());

        for (index, product) in products.iter().enumerate() {
            validate_product_id(&product.id)?;
            validate_product_name(&product.name)?;
            validate_price(product.price)?;

            if by_id.insert(product.id.clone(), index).is_some() {
                return Err(CoreError::DuplicateProduct {
                    field: "id".to_string(),
                    value: product.id.clone(),
                });
            }
            if by_name.insert(product.name.clone(), index).is_some() {
                return Err(CoreError::DuplicateProduct {
                    field: "name".to_string(),
                    value: product.name.clone(),
                });
            }
        }

        debug!(count = products.len(), "Catalog built");

        Ok(Catalog {
            products,
            by_id,
            by_name,
        })
    }

    /// The storefront's built-in product list.
    pub fn storefront() -> Self {
        let products = vec![
            Product::new(
                "patek-silver",
                "Patek Philippe Nautilus",
                Money::from_major(450),
                "img/product 1.jpg",
            ),
            Product::new(
                "rado-skeleton",
                "Rado True Square",
                Money::from_major(275),
                "img/IMG-20251104-WA0016.jpg",
            ),
            Product::new(
                "rolex-green",
                "Rolex Land-Dweller",
                Money::from_major(250),
                "img/product 3.jpg",
            ),
            Product::new(
                "chenxi-chrono",
                "Chenxi Chronograph",
                Money::from_major(130),
                "img/IMG-20251029-WA0013.jpg",
            ),
            Product::new(
                "bestwin-gold",
                "Bestwin Geometric",
                Money::from_major(150),
                "New img/golden steps green.jpg",
            ),
            Product::new(
                "tissot-gold",
                "Tissot 1853 Chrono",
                Money::from_major(220),
                "New img/golden chain watch.png",
            ),
            Product::new(
                "wallet-black",
                "Classic Noir Wallet",
                Money::from_major(60),
                "New img/wallet.png",
            ),
            Product::new(
                "wallet-tan",
                "Heritage Tan Wallet",
                Money::from_major(45),
                "New img/wallet 3.png",
            ),
        ];

        let by_id = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let by_name = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();

        Catalog {
            products,
            by_id,
            by_name,
        }
    }

    /// Looks a product up by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.by_id.get(id).map(|&i| &self.products[i])
    }

    /// Looks a product up by its exact display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.by_name.get(name).map(|&i| &self.products[i])
    }

    /// Checks whether a product id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Iterates products in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_catalog_is_valid() {
        let builtin = Catalog::storefront();
        let rebuilt = Catalog::new(builtin.iter().cloned().collect()).unwrap();

        assert_eq!(rebuilt.len(), 8);
        assert_eq!(
            builtin.get("patek-silver").unwrap().price,
            Money::from_major(450)
        );
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let catalog = Catalog::storefront();

        let by_id = catalog.get("wallet-tan").unwrap();
        let by_name = catalog.find_by_name("Heritage Tan Wallet").unwrap();
        assert_eq!(by_id, by_name);

        assert!(catalog.get("missing").is_none());
        assert!(catalog.find_by_name("heritage tan wallet").is_none());
    }

    #[test]
    fn test_iteration_keeps_display_order() {
        let catalog = Catalog::storefront();
        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"patek-silver"));
        assert_eq!(ids.last(), Some(&"wallet-tan"));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let result = Catalog::new(vec![
            Product::new(
                "w1",
                "One",
                Money::from_major(1),
                "",
            ),
            Product::new(
                "w1",
                "Two",
                Money::from_major(2),
                "",
            ),
        ]);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateProduct { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let result = Catalog::new(vec![
            Product::new(
                "w1",
                "Same",
                Money::from_major(1),
                "",
            ),
            Product::new(
                "w2",
                "Same",
                Money::from_major(2),
                "",
            ),
        ]);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateProduct { ref field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let result = Catalog::new(vec![Product::new("w1", "One", Money::from_cents(-1), "")]);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}
