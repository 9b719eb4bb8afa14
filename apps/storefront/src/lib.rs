//! # Zaynar Storefront
//!
//! The cart store, its configuration and the `zaynar` command line.
//!
//! ## Module Organization
//! ```text
//! zaynar_storefront/
//! ├── lib.rs          ◄─── You are here (tracing, session setup, run)
//! ├── cli.rs          ◄─── clap arguments
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore
//! │   ├── catalog.rs  ◄─── Built-in / TOML catalog
//! │   ├── config.rs   ◄─── StorefrontConfig
//! │   └── observer.rs ◄─── Change hook
//! ├── commands/
//! │   ├── cart.rs     ◄─── Dispatch and drawer rendering
//! │   └── catalog.rs  ◄─── Product listing
//! └── error.rs        ◄─── AppError
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use zaynar_core::Catalog;
use zaynar_db::{Database, DbConfig, MemorySnapshotStore, SnapshotStore};

use cli::{Cli, Command};
use error::AppResult;
use state::{load_catalog, CartObserver, CartStore, ChangeFlag, StorefrontConfig};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,zaynar=debug,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=zaynar_storefront=trace` - Trace the storefront only
///
/// Logs go to stderr so command output stays clean on stdout.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the snapshot store the config points at.
pub async fn open_snapshot_store(config: &StorefrontConfig) -> AppResult<Arc<dyn SnapshotStore>> {
    if config.storage.ephemeral {
        info!("Using in-memory cart storage");
        return Ok(Arc::new(MemorySnapshotStore::new()));
    }

    let path = config.resolve_database_path()?;
    info!(?path, "Opening cart database");
    let db = Database::new(DbConfig::new(path)).await?;
    Ok(Arc::new(db.snapshots()))
}

/// Builds the cart store and restores the previous session.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Open snapshot store (SQLite file or memory)                         │
/// │  2. CartStore::new(catalog, store, policy)                              │
/// │  3. load_persisted()  (bad data → empty cart, never fatal)              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn open_store(
    config: &StorefrontConfig,
    catalog: Arc<Catalog>,
    observer: Arc<dyn CartObserver>,
) -> AppResult<CartStore> {
    let snapshots = open_snapshot_store(config).await?;

    let mut store = CartStore::new(catalog, snapshots, config.cart.duplicate_policy)
        .with_key(config.storage.snapshot_key.clone())
        .with_observer(observer);
    store.load_persisted().await;

    Ok(store)
}

/// Runs one `zaynar` invocation and returns the text to print.
pub async fn run(cli: Cli) -> AppResult<String> {
    let mut config = StorefrontConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let catalog = Arc::new(load_catalog(config.catalog.path.as_deref())?);

    if matches!(cli.command, Command::Catalog) {
        return commands::catalog::list(&catalog, &config.display, cli.json);
    }

    let cart_commands = cli.command.cart_commands()?;
    let flag = Arc::new(ChangeFlag::new());
    let mut store = open_store(&config, catalog, flag.clone()).await?;

    if cart_commands.is_empty() {
        return commands::cart::show(&store, &config.display, cli.json);
    }

    commands::cart::execute(&mut store, &flag, cart_commands, &config.display, cli.json).await
}
