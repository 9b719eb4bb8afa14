//! # zaynar-core: Pure Cart Logic for the Zaynar Storefront
//!
//! This crate is the **heart** of the storefront cart. It contains the cart
//! state machine and everything it needs as pure functions, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Zaynar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation layer (web page / CLI)                │   │
//! │  │        "Add to bag" ──► Cart drawer ──► "Remove" link           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartCommand                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 CartStore (apps/storefront)                     │   │
//! │  │        dispatch ─► mutate ─► persist ─► notify                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ zaynar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  Catalog  │  │           │  │ LineItem  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO RENDERING • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                zaynar-db (persisted snapshot slot)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and line item types
//! - [`catalog`] - Static product catalog with id and name lookup
//! - [`cart`] - The cart state machine and its duplicate policies
//! - [`command`] - Inbound commands from the presentation layer
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use zaynar_core::{AddOutcome, Cart, Catalog, DuplicatePolicy, Money};
//!
//! let catalog = Catalog::storefront();
//! let mut cart = Cart::new(DuplicatePolicy::Merge);
//!
//! cart.add(&catalog, "wallet-tan").unwrap();
//! let outcome = cart.add(&catalog, "wallet-tan").unwrap();
//! assert!(matches!(outcome, AddOutcome::Merged { quantity: 2, .. }));
//!
//! let totals = cart.totals();
//! assert_eq!(totals.item_count, 2);
//! assert_eq!(totals.subtotal, Money::from_major(90));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod command;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, CartPhase, CartTotals, DuplicatePolicy, QuantityOutcome};
pub use catalog::Catalog;
pub use command::CartCommand;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{LineItem, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single cart.
///
/// ## Business Reason
/// Keeps the drawer renderable and the persisted snapshot small.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering from a stuck "add" button.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Highest unit price a product or line may carry, in cents ($10,000,000.00).
///
/// ## Business Reason
/// With at most 100 lines of 999 units each, totals stay far inside the
/// range of `Money`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Storage key the cart snapshot is written under by default.
pub const DEFAULT_SNAPSHOT_KEY: &str = "cart";
