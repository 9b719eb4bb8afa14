//! # Domain Types
//!
//! Core domain types shared by the cart, the snapshot store and the
//! presentation layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                 ┌─────────────────┐               │
//! │  │    Product      │   snapshot at   │    LineItem     │               │
//! │  │  ─────────────  │ ──────────────► │  ─────────────  │               │
//! │  │  id (slug)      │   add time      │  id             │               │
//! │  │  name           │                 │  name           │               │
//! │  │  price          │                 │  price (frozen) │               │
//! │  │  image          │                 │  image          │               │
//! │  └─────────────────┘                 │  qty (>= 1)     │               │
//! │                                      └─────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `LineItem` is also the persisted record: the cart snapshot is a JSON
//! array of these, using the short field names the storefront page has
//! always written (`id`, `name`, `price`, `img`, `qty`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product listed on the storefront.
///
/// Products are static reference data: loaded once at startup, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique slug identifier (e.g. `patek-silver`).
    pub id: String,

    /// Display name shown in the cart drawer.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Image reference, relative to the storefront's asset root.
    #[serde(rename = "img")]
    pub image: String,
}

impl Product {
    /// Creates a product.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One entry in the cart.
///
/// ## Price Freezing
/// Name, price and image are copied from the product when the line is
/// created. A catalog reload never changes what is already in the bag.
///
/// ## Snapshot Scale
/// `list_price` is written next to `price` so a restore can tell cent
/// records from the legacy page's dollar records, which lack it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product identifier this line references.
    pub id: String,

    /// Product name at time of adding.
    pub name: String,

    /// Unit price at time of adding.
    pub price: Money,

    /// Image reference at time of adding.
    #[serde(rename = "img", default)]
    pub image: String,

    /// Quantity, always >= 1.
    #[serde(rename = "qty", default = "default_quantity")]
    pub quantity: u32,

    /// Catalog price when the line was created, in cents.
    #[serde(rename = "list", default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<Money>,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// Creates a single-unit line from a product.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
            list_price: Some(product.price),
        }
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn watch() -> Product {
        Product::new("w1", "Test Watch", Money::from_major(100), "img/w1.jpg")
    }

    #[test]
    fn test_line_item_from_product() {
        let line = LineItem::from_product(&watch());
        assert_eq!(line.id, "w1");
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total(), Money::from_major(100));
    }

    #[test]
    fn test_line_total_scales_with_quantity() {
        let mut line = LineItem::from_product(&watch());
        line.quantity = 3;
        assert_eq!(line.line_total(), Money::from_major(300));
    }

    #[test]
    fn test_line_item_uses_storefront_field_names() {
        let line = LineItem::from_product(&watch());
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["id"], "w1");
        assert_eq!(json["price"], 10000);
        assert_eq!(json["img"], "img/w1.jpg");
        assert_eq!(json["qty"], 1);
        assert_eq!(json["list"], 10000);
    }

    #[test]
    fn test_line_item_without_qty_is_single_unit() {
        let line: LineItem =
            serde_json::from_str(r#"{"id":"w1","name":"Test Watch","price":10000}"#).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.image, "");
        assert_eq!(line.list_price, None);
    }
}
