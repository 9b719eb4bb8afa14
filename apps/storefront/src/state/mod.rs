//! # State Module
//!
//! Everything a storefront session holds between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State                                        │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │ StorefrontConfig │   │     Catalog      │   │  SnapshotStore   │     │
//! │  │  (config.rs)     │   │  (catalog.rs)    │   │  (zaynar-db)     │     │
//! │  └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘     │
//! │           │ policy, key          │ Arc                  │ Arc           │
//! │           └──────────────────────┼──────────────────────┘               │
//! │                                  ▼                                      │
//! │                        ┌──────────────────┐                             │
//! │                        │    CartStore     │──► CartObserver             │
//! │                        │   (cart.rs)      │    (observer.rs)            │
//! │                        └──────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod config;
mod observer;

pub use cart::{CartStore, CommandOutcome, CommandReport, RestoreSummary};
pub use catalog::{load_catalog, parse_catalog};
pub use config::{
    CartSettings, CatalogSettings, DisplaySettings, StorageSettings, StorefrontConfig,
};
pub use observer::{CartObserver, ChangeFlag, NoOpObserver};
