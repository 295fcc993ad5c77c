//! ShopHub storefront library.
//!
//! Catalog access, persisted cart and wishlist stores, listing filters and
//! checkout, shared by the CLI and the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod stores;

pub use catalog::{CatalogClient, CatalogError, FeedRequest, FeedState, ProductFeed};
pub use checkout::{CheckoutError, OrderConfirmation};
pub use config::{CatalogConfig, ConfigError, StorefrontConfig};
pub use error::AppError;
pub use state::Storefront;
