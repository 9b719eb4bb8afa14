//! # Cart
//!
//! The in-memory cart: an ordered list of line items plus the rules for
//! adding, removing and re-counting them.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation               Lookup               Cart change               │
//! │  ─────────               ──────               ───────────               │
//! │                                                                         │
//! │  add(id) ──────────────► catalog.get(id) ───► push / qty += 1           │
//! │                                                                         │
//! │  add_named(name, $) ───► catalog.find_by_name ► push / Duplicate        │
//! │                                                                         │
//! │  update_quantity(i, n) ► items[i] ──────────► qty = n (0 removes)       │
//! │                                                                         │
//! │  remove_at(i) ─────────► bounds check ──────► items.remove(i)           │
//! │                                                                         │
//! │  clear() ──────────────────────────────────► items.clear()              │
//! │                                                                         │
//! │  totals() ─────────────────────────────────► (read only)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicate Policy
//! Two storefront variants disagree on what a second "add" of the same
//! product means. The cart does not guess: the owner picks a
//! [`DuplicatePolicy`] when constructing it.
//!
//! | Policy   | Line identity | Second add                         |
//! |----------|---------------|------------------------------------|
//! | `Merge`  | product id    | quantity + 1                       |
//! | `Reject` | product name  | `AddOutcome::Duplicate`, no change |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::LineItem;
use crate::validation::{validate_cart_size, validate_price, validate_quantity};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Policy and Phase
// =============================================================================

/// What adding an already-present product does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Lines are keyed by product id; a second add increments the quantity.
    #[default]
    Merge,

    /// Lines are keyed by product name and always hold one unit; a second
    /// add is refused and reported to the caller.
    Reject,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Merge => write!(f, "merge"),
            DuplicatePolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(DuplicatePolicy::Merge),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(ValidationError::InvalidFormat {
                field: "duplicate_policy".to_string(),
                reason: format!("unknown policy '{}', expected merge or reject", other),
            }),
        }
    }
}

/// The two states the presentation layer cares about.
///
/// `Empty` shows the "Your bag is empty." placeholder and hides the count
/// badge; `NonEmpty` renders the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CartPhase {
    Empty,
    NonEmpty,
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of an add operation.
///
/// Only `Added` and `Merged` change the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new line was appended at `index`.
    Added { index: usize },

    /// An existing line's quantity was raised to `quantity`.
    Merged { index: usize, quantity: u32 },

    /// Refused under `DuplicatePolicy::Reject`; the line is already there.
    Duplicate { name: String },

    /// The product is not in the catalog; nothing happened.
    UnknownProduct,
}

impl AddOutcome {
    /// Checks whether the cart was modified.
    pub fn is_mutation(&self) -> bool {
        matches!(self, AddOutcome::Added { .. } | AddOutcome::Merged { .. })
    }
}

/// Result of a quantity update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuantityOutcome {
    /// The line at `index` now holds `quantity`.
    Updated { index: usize, quantity: u32 },

    /// Quantity 0 was requested; the line was removed.
    Removed { item: LineItem },

    /// The line already held that quantity.
    Unchanged,

    /// No line at that index.
    OutOfRange,

    /// Quantities above 1 are refused under `DuplicatePolicy::Reject`.
    Rejected,
}

impl QuantityOutcome {
    /// Checks whether the cart was modified.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            QuantityOutcome::Updated { .. } | QuantityOutcome::Removed { .. }
        )
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Cart totals summary.
///
/// `item_count` sums quantities. Under the reject policy every line holds
/// one unit, so it equals the number of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u32,
    pub line_count: usize,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.items.iter().map(|i| i.quantity).sum(),
            line_count: cart.items.len(),
            subtotal: cart.items.iter().map(LineItem::line_total).sum(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Every line references a product that was in the catalog when added
/// - Quantity is in `1..=MAX_ITEM_QUANTITY`; a line reaching 0 is removed
/// - Under `Merge`, ids are unique; under `Reject`, names are unique and
///   every quantity is 1
/// - At most `MAX_CART_ITEMS` lines
///
/// Every method either fully applies its change or leaves the cart as it
/// was.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cart {
    items: Vec<LineItem>,
    policy: DuplicatePolicy,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Cart {
            items: Vec::new(),
            policy,
        }
    }

    /// Rebuilds a cart from persisted lines.
    ///
    /// Lines that would break an invariant are dropped rather than failing
    /// the whole restore: unknown products, zero or oversized quantities,
    /// prices outside the allowed range, duplicates, and anything past the
    /// line limit. Lines without a list price were written in dollars by
    /// the legacy page and are dropped too. Returns the cart and the
    /// number of dropped lines.
    pub fn restore(
        policy: DuplicatePolicy,
        catalog: &Catalog,
        lines: Vec<LineItem>,
    ) -> (Self, usize) {
        let mut cart = Cart::new(policy);
        let mut dropped = 0;

        for mut line in lines {
            let keep = catalog.contains(&line.id)
                && line.list_price.is_some_and(|list| validate_price(list).is_ok())
                && validate_quantity(line.quantity).is_ok()
                && validate_price(line.price).is_ok()
                && validate_cart_size(cart.items.len()).is_ok()
                && cart.position_of_duplicate(&line.id, &line.name).is_none();

            if !keep {
                warn!(
                    product_id = %line.id,
                    qty = line.quantity,
                    "Dropping invalid persisted line"
                );
                dropped += 1;
                continue;
            }

            if policy == DuplicatePolicy::Reject {
                line.quantity = 1;
            }
            cart.items.push(line);
        }

        (cart, dropped)
    }

    /// Adds one unit of a catalog product by id.
    ///
    /// ## Behavior
    /// - Unknown id: `UnknownProduct`, no change
    /// - `Merge` and already present: quantity + 1
    /// - `Reject` and already present: `Duplicate`, no change
    /// - Otherwise: appends a new single-unit line
    ///
    /// ## Errors
    /// Quantity or line limits; the cart is left unchanged.
    pub fn add(&mut self, catalog: &Catalog, product_id: &str) -> CoreResult<AddOutcome> {
        let Some(product) = catalog.get(product_id) else {
            debug!(product_id = %product_id, "Ignoring add of unknown product");
            return Ok(AddOutcome::UnknownProduct);
        };

        self.insert(LineItem::from_product(product))
    }

    /// Adds a product by display name at the price the caller shows.
    ///
    /// The name must exist in the catalog. The supplied price is frozen on
    /// the new line. Under `Merge` an existing line for the same product
    /// is incremented instead, keeping its original price.
    pub fn add_named(
        &mut self,
        catalog: &Catalog,
        name: &str,
        price: Money,
    ) -> CoreResult<AddOutcome> {
        validate_price(price)?;

        let Some(product) = catalog.find_by_name(name) else {
            debug!(name = %name, "Ignoring add of unknown product name");
            return Ok(AddOutcome::UnknownProduct);
        };

        if product.price != price {
            debug!(
                product_id = %product.id,
                catalog_price = %product.price,
                given_price = %price,
                "Named add price differs from catalog"
            );
        }

        let mut line = LineItem::from_product(product);
        line.price = price;
        self.insert(line)
    }

    fn insert(&mut self, line: LineItem) -> CoreResult<AddOutcome> {
        if let Some(index) = self.position_of_duplicate(&line.id, &line.name) {
            return match self.policy {
                DuplicatePolicy::Reject => {
                    debug!(name = %line.name, "Duplicate add rejected");
                    Ok(AddOutcome::Duplicate { name: line.name })
                }
                DuplicatePolicy::Merge => {
                    let existing = &mut self.items[index];
                    let quantity = existing.quantity + 1;
                    if quantity > MAX_ITEM_QUANTITY {
                        return Err(CoreError::QuantityTooLarge {
                            requested: quantity,
                            max: MAX_ITEM_QUANTITY,
                        });
                    }
                    existing.quantity = quantity;
                    Ok(AddOutcome::Merged { index, quantity })
                }
            };
        }

        validate_cart_size(self.items.len()).map_err(|_| CoreError::CartTooLarge {
            max: crate::MAX_CART_ITEMS,
        })?;

        self.items.push(line);
        Ok(AddOutcome::Added {
            index: self.items.len() - 1,
        })
    }

    /// Finds the line a new line with this id/name would collide with.
    fn position_of_duplicate(&self, id: &str, name: &str) -> Option<usize> {
        match self.policy {
            DuplicatePolicy::Merge => self.items.iter().position(|i| i.id == id),
            DuplicatePolicy::Reject => self.items.iter().position(|i| i.name == name),
        }
    }

    /// Removes the line at `index`.
    ///
    /// Returns `None` and leaves the cart unchanged when out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "Ignoring out-of-range removal");
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Sets the quantity of the line at `index`.
    ///
    /// ## Behavior
    /// - Quantity 0: removes the line
    /// - Quantity above 1 under `Reject`: `Rejected`
    /// - Quantity above `MAX_ITEM_QUANTITY`: error
    pub fn update_quantity(
        &mut self,
        index: usize,
        quantity: u32,
    ) -> CoreResult<QuantityOutcome> {
        if index >= self.items.len() {
            return Ok(QuantityOutcome::OutOfRange);
        }

        if quantity == 0 {
            let item = self.items.remove(index);
            return Ok(QuantityOutcome::Removed { item });
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if self.policy == DuplicatePolicy::Reject && quantity > 1 {
            return Ok(QuantityOutcome::Rejected);
        }

        let line = &mut self.items[index];
        if line.quantity == quantity {
            return Ok(QuantityOutcome::Unchanged);
        }
        line.quantity = quantity;
        Ok(QuantityOutcome::Updated { index, quantity })
    }

    /// Clears all lines, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    /// Computes item count and subtotal.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Returns `Empty` or `NonEmpty`.
    pub fn phase(&self) -> CartPhase {
        if self.items.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::NonEmpty
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
