//! # zaynar-db: Snapshot Storage for the Zaynar Cart
//!
//! This crate provides the durable key-value slot the cart is mirrored to.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Zaynar Data Flow                                 │
//! │                                                                         │
//! │  CartStore::persist()                                                  │
//! │       │  save("cart", "[{...},{...}]")                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     zaynar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   SnapshotStore    │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  Sqlite / Memory   │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        SQLite: kv_store(key, value, updated_at)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`store`] - The `SnapshotStore` trait and its in-memory implementation
//! - [`repository`] - SQLite-backed repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zaynar_db::{Database, DbConfig, SnapshotStore};
//!
//! let db = Database::new(DbConfig::new("zaynar.db")).await?;
//! let store = db.snapshots();
//!
//! store.save("cart", "[]").await?;
//! assert_eq!(store.load("cart").await?.as_deref(), Some("[]"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::SqliteSnapshotStore;
pub use store::{MemorySnapshotStore, SnapshotStore};
