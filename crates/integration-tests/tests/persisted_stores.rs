//! Cart and wishlist persistence through the file-backed store.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use serde_json::Value;
use shophub_core::{CartLineId, Product, PromoPolicy};
use shophub_integration_tests::product_json;
use shophub_storefront::storage::{CART_KEY, FileStore, KeyValueStore};
use shophub_storefront::stores::{CartStore, StoreError, WishlistStore};

fn product(id: u32) -> Product {
    serde_json::from_value(product_json(id, "fragrances", 89.0, 8.4)).unwrap()
}

fn file_store(dir: &tempfile::TempDir) -> Arc<FileStore> {
    Arc::new(FileStore::new(dir.path()))
}

#[test]
fn test_cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_store(&dir);

    let mut cart = CartStore::open(storage.clone(), PromoPolicy::default()).unwrap();
    cart.add_to_cart(product(5), 1, "Red", "M").unwrap();
    cart.add_to_cart(product(5), 2, "Red", "M").unwrap();
    cart.add_to_cart(product(6), 1, "Blue", "S").unwrap();

    let reopened = CartStore::open(storage, PromoPolicy::default()).unwrap();
    assert_eq!(reopened.cart(), cart.cart());
    assert_eq!(reopened.cart().item_count(), 4);
}

#[test]
fn test_cart_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = CartStore::open(file_store(&dir), PromoPolicy::default()).unwrap();
    cart.add_to_cart(product(5), 2, "Red", "M").unwrap();

    let raw = fs::read_to_string(dir.path().join("cart.json")).unwrap();
    let lines: Value = serde_json::from_str(&raw).unwrap();
    let line = &lines[0];
    assert_eq!(line["id"], 5);
    assert_eq!(line["title"], "Product 5");
    assert_eq!(line["quantity"], 2);
    assert_eq!(line["selectedColor"], "Red");
    assert_eq!(line["selectedSize"], "M");
    assert!(line["cartItemId"].as_str().unwrap().starts_with("5-Red-M-"));
    assert_eq!(line["sku"], "SKU-0005");
}

#[test]
fn test_clear_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = CartStore::open(file_store(&dir), PromoPolicy::default()).unwrap();
    cart.add_to_cart(product(1), 1, "Black", "M").unwrap();
    assert!(dir.path().join("cart.json").exists());

    cart.clear_cart().unwrap();
    assert!(!dir.path().join("cart.json").exists());
}

#[test]
fn test_line_edits_persist() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_store(&dir);
    let mut cart = CartStore::open(storage.clone(), PromoPolicy::default()).unwrap();
    cart.add_to_cart(product(1), 1, "Black", "M").unwrap();
    cart.add_to_cart(product(2), 1, "White", "L").unwrap();

    let first: CartLineId = cart.cart().lines()[0].id.clone();
    let second: CartLineId = cart.cart().lines()[1].id.clone();
    cart.update_quantity(&second, 4).unwrap();
    cart.remove_from_cart(&first).unwrap();

    let reopened = CartStore::open(storage, PromoPolicy::default()).unwrap();
    assert_eq!(reopened.cart().lines().len(), 1);
    assert_eq!(reopened.cart().lines()[0].quantity, 4);
}

#[test]
fn test_wishlist_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_store(&dir);

    let mut wishlist = WishlistStore::open(storage.clone()).unwrap();
    assert!(wishlist.toggle_wishlist(product(1)).unwrap());
    assert!(wishlist.toggle_wishlist(product(2)).unwrap());
    assert!(!wishlist.toggle_wishlist(product(1)).unwrap());

    let reopened = WishlistStore::open(storage).unwrap();
    assert_eq!(reopened.wishlist(), wishlist.wishlist());
    assert_eq!(reopened.wishlist().len(), 1);
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cart.json"), "[{\"quantity\": \"lots\"}]").unwrap();

    let result = CartStore::open(file_store(&dir), PromoPolicy::default());
    assert!(matches!(result, Err(StoreError::Corrupt { key: "cart", .. })));
}

#[test]
fn test_stores_share_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_store(&dir);

    let mut cart = CartStore::open(storage.clone(), PromoPolicy::default()).unwrap();
    let mut wishlist = WishlistStore::open(storage.clone()).unwrap();
    cart.add_to_cart(product(1), 1, "Gray", "XL").unwrap();
    wishlist.toggle_wishlist(product(2)).unwrap();

    assert!(storage.get(CART_KEY).unwrap().is_some());
    assert!(dir.path().join("wishlist.json").exists());
    assert!(!dir.path().join("cart.json.tmp").exists());
}
