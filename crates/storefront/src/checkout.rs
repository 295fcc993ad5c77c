//! Order placement.
//!
//! No payment is taken: placing an order validates the shipping form,
//! snapshots the cart and its totals, then clears the cart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shophub_core::{CartLine, CheckoutForm, FormError, OrderId, OrderSummary, ShippingDetails};
use thiserror::Error;
use tracing::info;

use crate::stores::{CartStore, StoreError};

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The shipping form is incomplete or malformed.
    #[error("Invalid checkout form: {0}")]
    InvalidForm(#[from] FormError),

    /// Clearing the cart failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub promo_code: Option<String>,
    pub shipping: ShippingDetails,
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
}

/// Place an order for everything in the cart.
///
/// The cart, including any promo code, is cleared only after the form has
/// been validated.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart,
/// [`CheckoutError::InvalidForm`] if validation fails, or
/// [`CheckoutError::Store`] if the cart cannot be cleared.
pub fn place_order(
    cart: &mut CartStore,
    form: &CheckoutForm,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let shipping = form.validate()?;

    let confirmation = OrderConfirmation {
        order_id: OrderId::generate(),
        placed_at: Utc::now(),
        promo_code: cart.cart().promo_code().map(str::to_owned),
        shipping,
        lines: cart.cart().lines().to_vec(),
        summary: cart.cart().summary(),
    };

    cart.clear_cart()?;

    info!(
        order_id = %confirmation.order_id,
        lines = confirmation.lines.len(),
        total = %confirmation.summary.total,
        "Order placed"
    );
    Ok(confirmation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use serde_json::Map;
    use shophub_core::{ContactError, Product, ProductId, PromoPolicy};

    use super::*;
    use crate::storage::{CART_KEY, KeyValueStore, MemoryStore};

    fn product(id: u32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            brand: "Acme".to_string(),
            category: "skincare".to_string(),
            price: Decimal::new(price, 0),
            discount_percentage: Decimal::ZERO,
            rating: 4.2,
            stock: 8,
            images: Vec::new(),
            thumbnail: String::new(),
            extra: Map::new(),
        }
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.in".to_string(),
            phone: "98765 43210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            pincode: "560001".to_string(),
        }
    }

    fn store(storage: &Arc<MemoryStore>) -> CartStore {
        CartStore::open(storage.clone(), PromoPolicy::default()).unwrap()
    }

    #[test]
    fn test_place_order_clears_cart() {
        let storage = Arc::new(MemoryStore::new());
        let mut cart = store(&storage);
        cart.add_to_cart(product(1, 1000), 2, "Black", "M").unwrap();
        cart.apply_promo_code("SAVE10").unwrap();
        let expected = cart.cart().summary();

        let confirmation = place_order(&mut cart, &form()).unwrap();
        assert_eq!(confirmation.summary, expected);
        assert_eq!(confirmation.promo_code.as_deref(), Some("SAVE10"));
        assert_eq!(confirmation.lines.len(), 1);
        assert_eq!(confirmation.shipping.city, "Bengaluru");

        assert!(cart.cart().is_empty());
        assert_eq!(cart.cart().promo_code(), None);
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let storage = Arc::new(MemoryStore::new());
        let mut cart = store(&storage);
        assert!(matches!(
            place_order(&mut cart, &form()),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_invalid_form_keeps_cart() {
        let storage = Arc::new(MemoryStore::new());
        let mut cart = store(&storage);
        cart.add_to_cart(product(1, 100), 1, "Red", "S").unwrap();

        let mut bad = form();
        bad.pincode = "012345".to_string();
        let err = place_order(&mut cart, &bad).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidForm(FormError::Contact(ContactError::Pincode))
        ));
        assert_eq!(cart.cart().lines().len(), 1);
        assert!(storage.get(CART_KEY).unwrap().is_some());
    }

    #[test]
    fn test_confirmation_serializes_camel_case() {
        let storage = Arc::new(MemoryStore::new());
        let mut cart = store(&storage);
        cart.add_to_cart(product(3, 250), 1, "Blue", "L").unwrap();

        let confirmation = place_order(&mut cart, &form()).unwrap();
        let json = serde_json::to_value(&confirmation).unwrap();
        assert!(json.get("orderId").is_some());
        assert!(json.get("placedAt").is_some());
        assert_eq!(json["lines"][0]["selectedColor"], "Blue");
    }
}
