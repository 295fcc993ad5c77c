//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for front ends. Server-class errors are
//! captured to Sentry when [`AppError::report`] is called.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::stores::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A persisted store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Checkout was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error is our fault or the catalog's, not the user's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Catalog(err) => !matches!(err, CatalogError::NotFound(_)),
            Self::Storage(_) => true,
            Self::Store(err) => !matches!(err, StoreError::Cart(_)),
            Self::Checkout(err) => matches!(err, CheckoutError::Store(_)),
            Self::Config(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Log the error and capture server-class errors to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }
}
