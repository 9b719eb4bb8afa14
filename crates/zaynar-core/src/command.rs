//! # Cart Commands
//!
//! The single inbound command type the presentation layer sends to the
//! cart store. Every click that changes the bag becomes one of these.
//!
//! ```text
//! "Add to bag" button (data-id)  ──► AddItem { product_id }
//! Legacy "add" (name + price)    ──► AddNamed { name, price }
//! "Remove" link (data-index)     ──► RemoveItem { index }
//! Quantity stepper               ──► UpdateQuantity { index, quantity }
//! "Empty bag"                    ──► Clear
//! ```
//!
//! Commands are serde-tagged so a web front end can post them as JSON:
//! `{"type":"add_item","product_id":"wallet-tan"}`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// A cart mutation requested by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartCommand {
    /// Add one unit of a catalog product by id.
    AddItem { product_id: String },

    /// Add a product by display name at the shown price.
    AddNamed { name: String, price: Money },

    /// Remove the line at a position.
    RemoveItem { index: usize },

    /// Set the quantity of the line at a position (0 removes it).
    UpdateQuantity { index: usize, quantity: u32 },

    /// Remove every line.
    Clear,
}

impl CartCommand {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::AddItem { .. } => "add_item",
            CartCommand::AddNamed { .. } => "add_named",
            CartCommand::RemoveItem { .. } => "remove_item",
            CartCommand::UpdateQuantity { .. } => "update_quantity",
            CartCommand::Clear => "clear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_json_shape() {
        let cmd: CartCommand =
            serde_json::from_str(r#"{"type":"add_item","product_id":"wallet-tan"}"#).unwrap();
        assert_eq!(
            cmd,
            CartCommand::AddItem {
                product_id: "wallet-tan".to_string()
            }
        );

        let cmd: CartCommand = serde_json::from_str(r#"{"type":"remove_item","index":2}"#).unwrap();
        assert_eq!(cmd, CartCommand::RemoveItem { index: 2 });
        assert_eq!(cmd.name(), "remove_item");

        let cmd: CartCommand = serde_json::from_str(r#"{"type":"clear"}"#).unwrap();
        assert_eq!(cmd, CartCommand::Clear);
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let result = serde_json::from_str::<CartCommand>(r#"{"type":"remove_item","index":-1}"#);
        assert!(result.is_err());
    }
}
