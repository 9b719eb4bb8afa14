//! # Storefront Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults          built-in catalog, merge policy, "cart" key       │
//! │  2. Config file       --config <path>, or <config dir>/zaynar.toml     │
//! │  3. Environment       ZAYNAR_* variables                               │
//! │  4. Command line      --db, --policy, --ephemeral                      │
//! │  5. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! [storage]
//! database_path = "/var/lib/zaynar/zaynar.db"
//! snapshot_key = "cart"
//!
//! [cart]
//! duplicate_policy = "merge"   # or "reject"
//!
//! [catalog]
//! path = "catalog.toml"
//!
//! [display]
//! currency_symbol = "$"
//! ```
//!
//! ## Environment Variables
//! - `ZAYNAR_DB_PATH`
//! - `ZAYNAR_SNAPSHOT_KEY`
//! - `ZAYNAR_DUPLICATE_POLICY`
//! - `ZAYNAR_CATALOG_PATH`
//! - `ZAYNAR_CURRENCY_SYMBOL`

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zaynar_core::{DuplicatePolicy, DEFAULT_SNAPSHOT_KEY};

use crate::error::{AppError, AppResult};

const CONFIG_FILE_NAME: &str = "zaynar.toml";
const DATABASE_FILE_NAME: &str = "zaynar.db";

// =============================================================================
// Sections
// =============================================================================

/// Where the cart snapshot is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Key the snapshot is stored under.
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,

    /// Keep the cart in memory only (nothing survives the process).
    #[serde(default)]
    pub ephemeral: bool,
}

fn default_snapshot_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            snapshot_key: default_snapshot_key(),
            ephemeral: false,
        }
    }
}

/// Cart behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Product catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// TOML catalog file. `None` uses the built-in storefront catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Placeholder shown while the cart is empty.
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_empty_message() -> String {
    "Your bag is empty.".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            empty_message: default_empty_message(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl StorefrontConfig {
    /// Loads configuration from file and environment on top of defaults.
    ///
    /// An explicit `config_path` must exist; the default path is optional.
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading storefront config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    /// Parses config TOML.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `ZAYNAR_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ZAYNAR_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("ZAYNAR_SNAPSHOT_KEY") {
            self.storage.snapshot_key = key;
        }

        if let Some(policy) = lookup("ZAYNAR_DUPLICATE_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding duplicate policy from environment");
                    self.cart.duplicate_policy = parsed;
                }
                Err(e) => warn!("Ignoring ZAYNAR_DUPLICATE_POLICY: {}", e),
            }
        }

        if let Some(path) = lookup("ZAYNAR_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("ZAYNAR_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.storage.snapshot_key.trim().is_empty() {
            return Err(AppError::Config("snapshot_key must not be empty".into()));
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config("database_path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Resolves the SQLite file, creating the data directory if needed.
    pub fn resolve_database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs()
            .ok_or_else(|| AppError::Config("could not determine app data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| AppError::io(data_dir, e))?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// `<platform config dir>/zaynar.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "zaynar", "storefront")
    }
}
