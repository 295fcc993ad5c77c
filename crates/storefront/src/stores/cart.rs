//! Persisted cart store.

use std::sync::Arc;

use chrono::Utc;
use shophub_core::{Cart, CartAction, CartLine, CartLineId, Persistence, Product, PromoPolicy};
use tracing::{debug, info};

use super::{StoreError, load_record, save_record};
use crate::storage::{CART_KEY, KeyValueStore};

/// Cart state mirrored to storage under the `cart` key.
///
/// Only the line list is persisted. The promo code lives for the lifetime of
/// the store, matching the behavior of the browser storefront.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    policy: PromoPolicy,
    cart: Cart,
}

impl CartStore {
    /// Open the store, loading any persisted lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the persisted record is not a valid
    /// line list, or [`StoreError::Storage`] if it cannot be read.
    pub fn open(storage: Arc<dyn KeyValueStore>, policy: PromoPolicy) -> Result<Self, StoreError> {
        let lines: Vec<CartLine> = load_record(storage.as_ref(), CART_KEY)?;
        debug!(lines = lines.len(), "Loaded cart");
        Ok(Self {
            storage,
            policy,
            cart: Cart::from_lines(lines),
        })
    }

    /// Current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Promo codes this cart accepts.
    #[must_use]
    pub const fn policy(&self) -> &PromoPolicy {
        &self.policy
    }

    /// Apply an action and sync storage.
    ///
    /// Returns whether the cart changed. Add, remove and quantity updates
    /// rewrite the whole line list even when nothing changed; clearing erases
    /// the record; promo actions leave storage alone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cart`] if the reducer rejects the action, or a
    /// storage error if persisting fails. In the latter case the in-memory
    /// state has already changed.
    pub fn dispatch(&mut self, action: CartAction) -> Result<bool, StoreError> {
        let transition = self.cart.reduce(action, &self.policy, Utc::now())?;

        match transition.persistence {
            Persistence::WriteLines => {
                save_record(self.storage.as_ref(), CART_KEY, self.cart.lines())?;
            }
            Persistence::Erase => self.storage.remove(CART_KEY)?,
            Persistence::Untouched => {}
        }

        debug!(
            changed = transition.changed,
            lines = self.cart.lines().len(),
            items = self.cart.item_count(),
            "Cart updated"
        );
        Ok(transition.changed)
    }

    /// Add `quantity` units of a product variant.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`]. A zero quantity is rejected.
    pub fn add_to_cart(
        &mut self,
        product: Product,
        quantity: u32,
        color: impl Into<String>,
        size: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.dispatch(CartAction::Add {
            product: Box::new(product),
            quantity,
            color: color.into(),
            size: size.into(),
        })?;
        Ok(())
    }

    /// Remove a line. Returns `false` if no line had that id.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn remove_from_cart(&mut self, id: &CartLineId) -> Result<bool, StoreError> {
        self.dispatch(CartAction::Remove(id.clone()))
    }

    /// Set a line's quantity, never below 1.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn update_quantity(&mut self, id: &CartLineId, quantity: u32) -> Result<bool, StoreError> {
        self.dispatch(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity,
        })
    }

    /// Apply a promo code. Returns `false` and leaves the cart unchanged if
    /// the code is unknown.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn apply_promo_code(&mut self, code: &str) -> Result<bool, StoreError> {
        let applied = self.dispatch(CartAction::ApplyPromo(code.to_owned()))?;
        if applied {
            info!(code = self.cart.promo_code().unwrap_or_default(), "Promo code applied");
        }
        Ok(applied)
    }

    /// Drop the promo code.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn remove_promo_code(&mut self) -> Result<(), StoreError> {
        self.dispatch(CartAction::RemovePromo)?;
        Ok(())
    }

    /// Empty the cart, drop the promo code and erase the persisted record.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.dispatch(CartAction::Clear)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::Map;
    use shophub_core::ProductId;

    use super::*;
    use crate::storage::MemoryStore;

    fn product(id: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            brand: "Acme".to_string(),
            category: "laptops".to_string(),
            price: Decimal::new(1000, 0),
            discount_percentage: Decimal::ZERO,
            rating: 4.5,
            stock: 3,
            images: Vec::new(),
            thumbnail: String::new(),
            extra: Map::new(),
        }
    }

    fn open(storage: &Arc<MemoryStore>) -> CartStore {
        CartStore::open(storage.clone(), PromoPolicy::default()).unwrap()
    }

    #[test]
    fn test_open_empty_storage() {
        let storage = Arc::new(MemoryStore::new());
        let store = open(&storage);
        assert!(store.cart().is_empty());
        assert_eq!(store.cart().discount(), 0);
    }

    #[test]
    fn test_add_persists_and_reloads() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = open(&storage);
        store.add_to_cart(product(5), 1, "Red", "M").unwrap();
        store.add_to_cart(product(5), 2, "Red", "M").unwrap();

        let reopened = open(&storage);
        assert_eq!(reopened.cart().lines().len(), 1);
        assert_eq!(reopened.cart().lines()[0].quantity, 3);
        assert_eq!(reopened.cart(), store.cart());
    }

    #[test]
    fn test_zero_quantity_does_not_touch_storage() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = open(&storage);
        let err = store.add_to_cart(product(1), 0, "Black", "M").unwrap_err();
        assert!(matches!(err, StoreError::Cart(_)));
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_unknown_still_rewrites_lines() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = open(&storage);
        store.add_to_cart(product(1), 1, "Black", "M").unwrap();
        storage.remove(CART_KEY).unwrap();

        assert!(!store.remove_from_cart(&CartLineId::from("unknown")).unwrap());
        assert_eq!(store.cart().lines().len(), 1);
        assert!(storage.get(CART_KEY).unwrap().is_some());
    }

    #[test]
    fn test_promo_is_not_persisted() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = open(&storage);
        assert!(store.apply_promo_code("welcome").unwrap());
        assert_eq!(store.cart().promo_code(), Some("WELCOME"));
        assert_eq!(storage.get(CART_KEY).unwrap(), None);

        assert!(!store.apply_promo_code("BOGUS").unwrap());
        assert_eq!(store.cart().discount(), 15);

        store.remove_promo_code().unwrap();
        assert_eq!(store.cart().promo_code(), None);
    }

    #[test]
    fn test_clear_erases_record() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = open(&storage);
        store.add_to_cart(product(1), 2, "Black", "M").unwrap();
        store.apply_promo_code("SAVE10").unwrap();

        store.clear_cart().unwrap();
        assert!(store.cart().is_empty());
        assert_eq!(store.cart().promo_code(), None);
        assert_eq!(store.cart().discount(), 0);
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_quantity_floor() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = open(&storage);
        store.add_to_cart(product(1), 3, "Black", "M").unwrap();
        let id = store.cart().lines()[0].id.clone();

        store.update_quantity(&id, 0).unwrap();
        assert_eq!(open(&storage).cart().lines()[0].quantity, 1);
    }

    #[test]
    fn test_corrupted_record_is_reported() {
        let storage = Arc::new(MemoryStore::with_entries([(CART_KEY, "{not json")]));
        let result = CartStore::open(storage, PromoPolicy::default());
        assert!(matches!(
            result,
            Err(StoreError::Corrupt { key: "cart", .. })
        ));
    }

    #[test]
    fn test_custom_policy() {
        let storage = Arc::new(MemoryStore::new());
        let policy = PromoPolicy::parse("FLASH=30").unwrap();
        let mut store = CartStore::open(storage, policy).unwrap();
        assert!(!store.apply_promo_code("SAVE10").unwrap());
        assert!(store.apply_promo_code("flash").unwrap());
        assert_eq!(store.cart().discount(), 30);
    }
}
