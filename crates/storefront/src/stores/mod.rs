//! Persisted client-side state.
//!
//! Each store owns its in-memory state, applies reducer actions from
//! `shophub-core`, and mirrors the result to a [`KeyValueStore`]:
//!
//! - [`CartStore`] - cart lines (key `cart`) plus an unpersisted promo code
//! - [`WishlistStore`] - liked products (key `wishlist`)
//! - [`FilterStore`] - listing filters, never persisted
//!
//! Persisted values are read once when a store is opened and rewritten whole
//! on every mutation.

pub mod cart;
pub mod filters;
pub mod wishlist;

pub use cart::CartStore;
pub use filters::FilterStore;
pub use wishlist::WishlistStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shophub_core::CartError;
use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

/// Errors raised by the persisted stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A persisted record could not be decoded.
    #[error("corrupted '{key}' record: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// State could not be encoded for storage.
    #[error("failed to encode '{key}' record: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The cart rejected the action.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Read and decode the record under `key`, or `T::default()` if absent.
fn load_record<T>(storage: &dyn KeyValueStore, key: &'static str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match storage.get(key)? {
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { key, source })
        }
        None => Ok(T::default()),
    }
}

/// Encode `value` and overwrite the record under `key`.
fn save_record<T>(storage: &dyn KeyValueStore, key: &'static str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
    storage.set(key, &raw)?;
    Ok(())
}
