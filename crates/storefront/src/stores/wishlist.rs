//! Persisted wishlist store.

use std::sync::Arc;

use shophub_core::{Product, ProductId, Wishlist};
use tracing::debug;

use super::{StoreError, load_record, save_record};
use crate::storage::{KeyValueStore, WISHLIST_KEY};

/// Wishlist mirrored to storage under the `wishlist` key.
pub struct WishlistStore {
    storage: Arc<dyn KeyValueStore>,
    wishlist: Wishlist,
}

impl WishlistStore {
    /// Open the store, loading any persisted products.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the persisted record is not a valid
    /// product list, or [`StoreError::Storage`] if it cannot be read.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let items: Vec<Product> = load_record(storage.as_ref(), WISHLIST_KEY)?;
        Ok(Self {
            storage,
            wishlist: Wishlist::from_items(items),
        })
    }

    /// Current wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Whether a product is liked.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.wishlist.contains(id)
    }

    /// Add the product if absent, remove it if present, then persist.
    ///
    /// Returns `true` when the product is in the wishlist afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the wishlist cannot be persisted. The
    /// in-memory toggle has already happened in that case.
    pub fn toggle_wishlist(&mut self, product: Product) -> Result<bool, StoreError> {
        let id = product.id;
        let liked = self.wishlist.toggle(product);
        save_record(self.storage.as_ref(), WISHLIST_KEY, self.wishlist.items())?;
        debug!(product_id = %id, liked, total = self.wishlist.len(), "Wishlist toggled");
        Ok(liked)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::Map;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Fragrance {id}"),
            description: String::new(),
            brand: "Royal_Mirage".to_string(),
            category: "fragrances".to_string(),
            price: Decimal::new(13, 0),
            discount_percentage: Decimal::new(1615, 2),
            rating: 4.26,
            stock: 65,
            images: Vec::new(),
            thumbnail: String::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_toggle_persists_each_time() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = WishlistStore::open(storage.clone()).unwrap();

        assert!(store.toggle_wishlist(product(1)).unwrap());
        let saved = storage.get(WISHLIST_KEY).unwrap().unwrap();
        assert!(saved.contains("Fragrance 1"));

        assert!(!store.toggle_wishlist(product(1)).unwrap());
        assert_eq!(storage.get(WISHLIST_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_restores_items() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = WishlistStore::open(storage.clone()).unwrap();
        store.toggle_wishlist(product(1)).unwrap();
        store.toggle_wishlist(product(2)).unwrap();

        let reopened = WishlistStore::open(storage).unwrap();
        assert_eq!(reopened.wishlist(), store.wishlist());
        assert!(reopened.contains(ProductId::new(2)));
    }

    #[test]
    fn test_double_toggle_restores_original() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = WishlistStore::open(storage).unwrap();
        store.toggle_wishlist(product(1)).unwrap();
        let before = store.wishlist().clone();

        store.toggle_wishlist(product(7)).unwrap();
        store.toggle_wishlist(product(7)).unwrap();
        assert_eq!(store.wishlist(), &before);
    }

    #[test]
    fn test_corrupted_record_is_reported() {
        let storage = Arc::new(MemoryStore::with_entries([(WISHLIST_KEY, "{\"id\": 1}")]));
        assert!(matches!(
            WishlistStore::open(storage),
            Err(StoreError::Corrupt { key: "wishlist", .. })
        ));
    }
}
