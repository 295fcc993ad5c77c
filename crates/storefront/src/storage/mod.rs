//! Key-value storage port.
//!
//! Stores persist whole JSON values under fixed keys. The port only moves
//! strings; encoding and decoding belong to the stores.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-process map, used by tests and throwaway sessions
//! - [`FileStore`] - one `<key>.json` file per key in a data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage key of the persisted cart lines.
pub const CART_KEY: &str = "cart";

/// Storage key of the persisted wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used by this backend.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Durable string key-value storage.
///
/// Every write replaces the whole value; there are no partial updates.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
