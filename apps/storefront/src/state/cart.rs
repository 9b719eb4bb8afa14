//! # Cart Store
//!
//! Owns the authoritative cart, its persisted mirror and the change hook.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Operations                                 │
//! │                                                                         │
//! │  CartCommand              Cart change              Side effects         │
//! │  ───────────              ───────────              ────────────         │
//! │                                                                         │
//! │  AddItem ────────────────► cart.add() ───────────► persist + notify    │
//! │                                                                         │
//! │  AddNamed ───────────────► cart.add_named() ─────► persist + notify    │
//! │                                                                         │
//! │  RemoveItem ─────────────► cart.remove_at() ─────► persist + notify    │
//! │                                                                         │
//! │  UpdateQuantity ─────────► cart.update_quantity() ► persist + notify   │
//! │                                                                         │
//! │  Clear ──────────────────► cart.clear() ─────────► persist + notify    │
//! │                                                                         │
//! │  NOTE: No-ops (unknown product, bad index, duplicate) skip both side    │
//! │        effects. A failed persist is reported, never fatal.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Format
//! ```json
//! [
//!   { "id": "rolex-green", "name": "Rolex Land-Dweller", "price": 25000,
//!     "img": "images/rolex-green.jpg", "qty": 2, "list": 25000 }
//! ]
//! ```
//!
//! Records without `list` come from the legacy page, which stored dollars
//! in `price`. They are dropped on restore.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zaynar_core::{
    AddOutcome, Cart, CartCommand, CartPhase, CartTotals, Catalog, DuplicatePolicy, LineItem,
    Money, QuantityOutcome, DEFAULT_SNAPSHOT_KEY,
};
use zaynar_db::SnapshotStore;

use crate::error::AppResult;
use crate::state::observer::{CartObserver, NoOpObserver};

// =============================================================================
// Reports
// =============================================================================

/// What a command did to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    Added { index: usize },
    Merged { index: usize, quantity: u32 },
    /// Refused under the reject policy; shown to the shopper as a notice.
    Duplicate { name: String },
    UnknownProduct,
    Removed { item: LineItem },
    OutOfRange,
    QuantityUpdated { index: usize, quantity: u32 },
    Unchanged,
    Rejected,
    Cleared { removed: usize },
}

impl CommandOutcome {
    /// Checks whether the cart was modified.
    pub fn is_mutation(&self) -> bool {
        match self {
            CommandOutcome::Added { .. }
            | CommandOutcome::Merged { .. }
            | CommandOutcome::Removed { .. }
            | CommandOutcome::QuantityUpdated { .. } => true,
            CommandOutcome::Cleared { removed } => *removed > 0,
            CommandOutcome::Duplicate { .. }
            | CommandOutcome::UnknownProduct
            | CommandOutcome::OutOfRange
            | CommandOutcome::Unchanged
            | CommandOutcome::Rejected => false,
        }
    }
}

impl From<AddOutcome> for CommandOutcome {
    fn from(outcome: AddOutcome) -> Self {
        match outcome {
            AddOutcome::Added { index } => CommandOutcome::Added { index },
            AddOutcome::Merged { index, quantity } => CommandOutcome::Merged { index, quantity },
            AddOutcome::Duplicate { name } => CommandOutcome::Duplicate { name },
            AddOutcome::UnknownProduct => CommandOutcome::UnknownProduct,
        }
    }
}

impl From<QuantityOutcome> for CommandOutcome {
    fn from(outcome: QuantityOutcome) -> Self {
        match outcome {
            QuantityOutcome::Updated { index, quantity } => {
                CommandOutcome::QuantityUpdated { index, quantity }
            }
            QuantityOutcome::Removed { item } => CommandOutcome::Removed { item },
            QuantityOutcome::Unchanged => CommandOutcome::Unchanged,
            QuantityOutcome::OutOfRange => CommandOutcome::OutOfRange,
            QuantityOutcome::Rejected => CommandOutcome::Rejected,
        }
    }
}

/// Result of one command, returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport {
    pub outcome: CommandOutcome,
    pub phase: CartPhase,
    pub totals: CartTotals,

    /// Set when the cart changed but the snapshot could not be written.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub persist_error: Option<String>,
}

/// Result of restoring the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreSummary {
    pub restored: usize,
    pub dropped: usize,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The single owner of cart state for a session.
///
/// ## Invariants
/// - Mutations take `&mut self`, so one runs to completion before the next
/// - The in-memory cart is updated before the snapshot is written; a failed
///   write never rolls it back
pub struct CartStore {
    cart: Cart,
    catalog: Arc<Catalog>,
    store: Arc<dyn SnapshotStore>,
    key: String,
    observer: Arc<dyn CartObserver>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("key", &self.key)
            .field("catalog_len", &self.catalog.len())
            .finish()
    }
}

impl CartStore {
    /// Creates a store with an empty cart. Call [`load_persisted`] to
    /// restore the previous session.
    ///
    /// [`load_persisted`]: CartStore::load_persisted
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn SnapshotStore>,
        policy: DuplicatePolicy,
    ) -> Self {
        CartStore {
            cart: Cart::new(policy),
            catalog,
            store,
            key: DEFAULT_SNAPSHOT_KEY.to_string(),
            observer: Arc::new(NoOpObserver),
        }
    }

    /// Uses `key` instead of the default snapshot key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn CartObserver>) -> Self {
        self.observer = observer;
        self
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of the product with id `product_id`.
    pub async fn add(&mut self, product_id: &str) -> AppResult<CommandReport> {
        let outcome = self.cart.add(&self.catalog, product_id)?;
        Ok(self.finish(outcome.into()).await)
    }

    /// Adds a product by display name at the shown price.
    pub async fn add_named(&mut self, name: &str, price: Money) -> AppResult<CommandReport> {
        let outcome = self.cart.add_named(&self.catalog, name, price)?;
        if let AddOutcome::Duplicate { name } = &outcome {
            info!(name = %name, "Product is already in the cart");
        }
        Ok(self.finish(outcome.into()).await)
    }

    /// Removes the line at `index`; out of range is a no-op.
    pub async fn remove_at(&mut self, index: usize) -> CommandReport {
        let outcome = match self.cart.remove_at(index) {
            Some(item) => CommandOutcome::Removed { item },
            None => CommandOutcome::OutOfRange,
        };
        self.finish(outcome).await
    }

    /// Sets a line's quantity; 0 removes the line.
    pub async fn update_quantity(
        &mut self,
        index: usize,
        quantity: u32,
    ) -> AppResult<CommandReport> {
        let outcome = self.cart.update_quantity(index, quantity)?;
        Ok(self.finish(outcome.into()).await)
    }

    /// Empties the cart.
    pub async fn clear(&mut self) -> CommandReport {
        let removed = self.cart.clear();
        self.finish(CommandOutcome::Cleared { removed }).await
    }

    /// Routes a presentation-layer command to the matching operation.
    pub async fn dispatch(&mut self, command: CartCommand) -> AppResult<CommandReport> {
        debug!(command = command.name(), "Dispatching cart command");

        match command {
            CartCommand::AddItem { product_id } => self.add(&product_id).await,
            CartCommand::AddNamed { name, price } => self.add_named(&name, price).await,
            CartCommand::RemoveItem { index } => Ok(self.remove_at(index).await),
            CartCommand::UpdateQuantity { index, quantity } => {
                self.update_quantity(index, quantity).await
            }
            CartCommand::Clear => Ok(self.clear().await),
        }
    }

    /// Persists and notifies when `outcome` changed the cart.
    async fn finish(&mut self, outcome: CommandOutcome) -> CommandReport {
        let mut persist_error = None;

        if outcome.is_mutation() {
            if let Err(e) = self.persist().await {
                warn!(
                    key = %self.key,
                    error = %e,
                    "Failed to persist cart, keeping in-memory state"
                );
                persist_error = Some(e.to_string());
            }
            self.observer.cart_changed();
        }

        CommandReport {
            outcome,
            phase: self.cart.phase(),
            totals: self.cart.totals(),
            persist_error,
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Restores the last snapshot into memory.
    ///
    /// Never fails: a store error, a missing key or a snapshot that is not a
    /// JSON array all yield an empty cart. Records that do not decode, or
    /// that reference unknown products, bad quantities or bad prices, are
    /// dropped.
    pub async fn load_persisted(&mut self) -> RestoreSummary {
        let policy = self.cart.policy();

        let raw = match self.store.load(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No persisted cart");
                self.cart = Cart::new(policy);
                return RestoreSummary::default();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read persisted cart, starting empty");
                self.cart = Cart::new(policy);
                return RestoreSummary::default();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Persisted cart is malformed, starting empty");
                self.cart = Cart::new(policy);
                return RestoreSummary::default();
            }
        };

        let total = records.len();
        let lines: Vec<LineItem> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(line) => Some(line),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable cart record");
                    None
                }
            })
            .collect();
        let undecodable = total - lines.len();

        let (cart, invalid) = Cart::restore(policy, &self.catalog, lines);
        self.cart = cart;

        let summary = RestoreSummary {
            restored: self.cart.len(),
            dropped: undecodable + invalid,
        };
        info!(
            restored = summary.restored,
            dropped = summary.dropped,
            "Restored persisted cart"
        );
        summary
    }

    /// Writes the current cart to the snapshot store.
    pub async fn persist(&self) -> AppResult<()> {
        let json = serde_json::to_string(self.cart.items())?;
        self.store.save(&self.key, &json).await?;
        debug!(key = %self.key, lines = self.cart.len(), "Cart persisted");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Item count and subtotal.
    pub fn compute_totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn phase(&self) -> CartPhase {
        self.cart.phase()
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.cart.policy()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot_key(&self) -> &str {
        &self.key
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::observer::ChangeFlag;
    use zaynar_core::Product;
    use zaynar_db::MemorySnapshotStore;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![
                Product::new("w1", "Watch One", Money::from_major(100), "img/w1.jpg"),
                Product::new("w2", "Watch Two", Money::from_major(250), "img/w2.jpg"),
            ])
            .unwrap(),
        )
    }

    fn store_with(
        snapshots: Arc<MemorySnapshotStore>,
        policy: DuplicatePolicy,
    ) -> (CartStore, Arc<ChangeFlag>) {
        let flag = Arc::new(ChangeFlag::new());
        let store = CartStore::new(catalog(), snapshots, policy).with_observer(flag.clone());
        (store, flag)
    }

    #[tokio::test]
    async fn test_add_persists_and_notifies() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, flag) = store_with(snapshots.clone(), DuplicatePolicy::Merge);

        let report = store.add("w1").await.unwrap();
        assert_eq!(report.outcome, CommandOutcome::Added { index: 0 });
        assert_eq!(report.phase, CartPhase::NonEmpty);
        assert!(report.persist_error.is_none());
        assert!(flag.take());

        let raw = snapshots.load("cart").await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["id"], "w1");
        assert_eq!(json[0]["price"], 10000);
        assert_eq!(json[0]["qty"], 1);
    }

    #[tokio::test]
    async fn test_unknown_product_skips_side_effects() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, flag) = store_with(snapshots.clone(), DuplicatePolicy::Merge);

        let report = store.add("nope").await.unwrap();
        assert_eq!(report.outcome, CommandOutcome::UnknownProduct);
        assert_eq!(report.phase, CartPhase::Empty);
        assert!(!flag.take());
        assert_eq!(snapshots.load("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_three_adds_then_remove() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, flag) = store_with(snapshots, DuplicatePolicy::Merge);

        for _ in 0..3 {
            store.add("w1").await.unwrap();
        }
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 3);
        let totals = store.compute_totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal.to_string(), "$300.00");
        assert_eq!(flag.count(), 3);

        let report = store.remove_at(0).await;
        assert!(matches!(report.outcome, CommandOutcome::Removed { .. }));
        assert_eq!(report.phase, CartPhase::Empty);
        assert_eq!(report.totals, CartTotals::default());
    }

    #[tokio::test]
    async fn test_out_of_range_removal_is_silent() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, flag) = store_with(snapshots, DuplicatePolicy::Merge);
        store.add("w1").await.unwrap();
        flag.take();

        let report = store.remove_at(5).await;
        assert_eq!(report.outcome, CommandOutcome::OutOfRange);
        assert_eq!(store.items().len(), 1);
        assert!(!flag.take());
    }

    #[tokio::test]
    async fn test_reject_duplicate_named_add() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, flag) = store_with(snapshots, DuplicatePolicy::Reject);

        store
            .add_named("Watch Two", Money::from_major(250))
            .await
            .unwrap();
        flag.take();
        let before = store.items().to_vec();

        let report = store
            .add_named("Watch Two", Money::from_major(250))
            .await
            .unwrap();
        assert_eq!(
            report.outcome,
            CommandOutcome::Duplicate {
                name: "Watch Two".to_string()
            }
        );
        assert_eq!(store.items(), before.as_slice());
        assert!(!flag.take());
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trip() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, _) = store_with(snapshots.clone(), DuplicatePolicy::Merge);
        store.add("w1").await.unwrap();
        store.add("w2").await.unwrap();
        store.add("w1").await.unwrap();

        let (mut fresh, _) = store_with(snapshots, DuplicatePolicy::Merge);
        let summary = fresh.load_persisted().await;

        assert_eq!(summary, RestoreSummary { restored: 2, dropped: 0 });
        assert_eq!(fresh.items(), store.items());
        assert_eq!(fresh.compute_totals(), store.compute_totals());
    }

    #[tokio::test]
    async fn test_malformed_snapshot_yields_empty_cart() {
        let snapshots = Arc::new(MemorySnapshotStore::with_entry("cart", "{not json"));
        let (mut store, _) = store_with(snapshots, DuplicatePolicy::Merge);

        assert_eq!(store.load_persisted().await, RestoreSummary::default());
        assert_eq!(store.phase(), CartPhase::Empty);
    }

    #[tokio::test]
    async fn test_load_drops_unknown_and_zero_quantity_records() {
        let raw = r#"[
            {"id":"w1","name":"Watch One","price":10000,"img":"img/w1.jpg","qty":2,"list":10000},
            {"id":"retired","name":"Old Watch","price":5000,"img":"","qty":1,"list":5000},
            {"id":"w2","name":"Watch Two","price":25000,"img":"img/w2.jpg","qty":0,"list":25000},
            {"id":42}
        ]"#;
        let snapshots = Arc::new(MemorySnapshotStore::with_entry("cart", raw));
        let (mut store, flag) = store_with(snapshots, DuplicatePolicy::Merge);

        let summary = store.load_persisted().await;
        assert_eq!(summary, RestoreSummary { restored: 1, dropped: 3 });
        assert_eq!(store.items()[0].id, "w1");
        assert_eq!(store.items()[0].quantity, 2);
        assert!(!flag.take());
    }

    #[tokio::test]
    async fn test_load_drops_legacy_dollar_records() {
        let raw = r#"[{"id":"w1","name":"Watch One","price":100,"img":"img/w1.jpg","qty":1}]"#;
        let snapshots = Arc::new(MemorySnapshotStore::with_entry("cart", raw));
        let (mut store, _) = store_with(snapshots, DuplicatePolicy::Merge);

        let summary = store.load_persisted().await;
        assert_eq!(summary, RestoreSummary { restored: 0, dropped: 1 });

        store.add("w1").await.unwrap();
        assert_eq!(store.items()[0].quantity, 1);
        assert_eq!(store.items()[0].price, Money::from_major(100));
        assert_eq!(store.compute_totals().subtotal, Money::from_major(100));
    }

    #[tokio::test]
    async fn test_failing_store_keeps_memory_and_reports() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        snapshots.set_reject_writes(true);
        let (mut store, flag) = store_with(snapshots.clone(), DuplicatePolicy::Merge);

        let report = store.add("w1").await.unwrap();
        assert!(report.persist_error.is_some());
        assert_eq!(store.items().len(), 1);
        assert!(flag.take());
        assert_eq!(snapshots.load("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dispatch_routes_commands() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, _) = store_with(snapshots, DuplicatePolicy::Merge);

        let command: CartCommand =
            serde_json::from_str(r#"{"type":"add_item","product_id":"w2"}"#).unwrap();
        store.dispatch(command).await.unwrap();

        let report = store
            .dispatch(CartCommand::UpdateQuantity { index: 0, quantity: 3 })
            .await
            .unwrap();
        assert_eq!(
            report.outcome,
            CommandOutcome::QuantityUpdated { index: 0, quantity: 3 }
        );
        assert_eq!(report.totals.subtotal, Money::from_major(750));

        let report = store.dispatch(CartCommand::Clear).await.unwrap();
        assert_eq!(report.outcome, CommandOutcome::Cleared { removed: 1 });
        assert_eq!(report.phase, CartPhase::Empty);
    }

    #[tokio::test]
    async fn test_clearing_empty_cart_does_not_notify() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, flag) = store_with(snapshots, DuplicatePolicy::Merge);

        let report = store.clear().await;
        assert_eq!(report.outcome, CommandOutcome::Cleared { removed: 0 });
        assert!(!flag.take());
    }

    #[tokio::test]
    async fn test_quantity_limit_is_an_error() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (mut store, _) = store_with(snapshots, DuplicatePolicy::Merge);
        store.add("w1").await.unwrap();

        let result = store.update_quantity(0, 1000).await;
        assert!(result.is_err());
        assert_eq!(store.items()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_custom_snapshot_key() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let mut store = CartStore::new(catalog(), snapshots.clone(), DuplicatePolicy::Merge)
            .with_key("session-7");
        store.add("w1").await.unwrap();

        assert!(snapshots.load("session-7").await.unwrap().is_some());
        assert_eq!(snapshots.load("cart").await.unwrap(), None);
    }
}
