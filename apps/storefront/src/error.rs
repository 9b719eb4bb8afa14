//! # Storefront Error Types
//!
//! The application-level error, plus the machine-readable code a web front
//! end (or `zaynar --json`) receives.
//!
//! ## Serialization
//! ```json
//! {
//!   "code": "CART_ERROR",
//!   "message": "Quantity 1000 exceeds maximum allowed (999)"
//! }
//! ```
//!
//! Ignored adds, out-of-range removals and duplicate notices never reach
//! this type: they are outcomes, not errors.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use zaynar_core::CoreError;
use zaynar_db::DbError;

/// Storefront errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A config or catalog file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config or catalog file is not valid TOML.
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// The catalog file describes an unusable catalog.
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    /// A command from the presentation layer could not be decoded.
    #[error("Invalid command: {0}")]
    Command(String),

    /// A cart rule was violated; the cart is unchanged.
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// The snapshot store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// The cart could not be encoded as a snapshot.
    #[error("Snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Error codes for JSON responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigError,
    CatalogError,
    ValidationError,
    CartError,
    StorageError,
}

/// Serialized error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    /// Machine-readable category.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Config(_) | AppError::Io { .. } | AppError::Toml(_) => ErrorCode::ConfigError,
            AppError::Catalog(_) => ErrorCode::CatalogError,
            AppError::Command(_) => ErrorCode::ValidationError,
            AppError::Cart(CoreError::Validation(_)) => ErrorCode::ValidationError,
            AppError::Cart(_) => ErrorCode::CartError,
            AppError::Storage(_) | AppError::Snapshot(_) => ErrorCode::StorageError,
        }
    }

    /// Builds the JSON body for this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storefront operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use zaynar_core::ValidationError;

    #[test]
    fn test_error_codes() {
        let err = AppError::from(CoreError::CartTooLarge { max: 100 });
        assert_eq!(err.code(), ErrorCode::CartError);

        let err = AppError::from(CoreError::Validation(ValidationError::Required {
            field: "price".to_string(),
        }));
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = AppError::from(DbError::PoolExhausted);
        assert_eq!(err.code(), ErrorCode::StorageError);
    }

    #[test]
    fn test_error_body_serializes() {
        let err = AppError::Config("snapshot_key must not be empty".to_string());
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["code"], "CONFIG_ERROR");
        assert_eq!(
            json["message"],
            "Invalid configuration: snapshot_key must not be empty"
        );
    }
}
