//! Catalog product snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::calculate_discount;

/// A product as published by the catalog.
///
/// Products are read-only snapshots: the cart and wishlist embed a copy taken
/// at the time of the action. Fields the storefront does not interpret are
/// kept in [`Product::extra`] so they survive persistence unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Brand name. Empty when the catalog has none (e.g. groceries).
    #[serde(default)]
    pub brand: String,
    /// Category slug, e.g. `smartphones`.
    pub category: String,
    /// List price in currency units.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Discount percentage in `0..=100`.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    /// Average rating in `0..=5`.
    pub rating: f64,
    /// Units in stock.
    pub stock: u32,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Thumbnail URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Opaque passthrough fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Price after the product's own discount.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        calculate_discount(self.price, self.discount_percentage)
    }

    /// Whether the catalog marks this product as discounted.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_percentage > Decimal::ZERO
    }

    /// Whether any units are left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const IPHONE: &str = r#"{
        "id": 1,
        "title": "iPhone 9",
        "description": "An apple mobile which is nothing like apple",
        "price": 549,
        "discountPercentage": 12.96,
        "rating": 4.69,
        "stock": 94,
        "brand": "Apple",
        "category": "smartphones",
        "thumbnail": "https://cdn.dummyjson.com/product-images/1/thumbnail.jpg",
        "images": ["https://cdn.dummyjson.com/product-images/1/1.jpg"],
        "tags": ["phone"],
        "sku": "IPH-9"
    }"#;

    #[test]
    fn test_deserialize_catalog_shape() {
        let product: Product = serde_json::from_str(IPHONE).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(549, 0));
        assert_eq!(product.discount_percentage, Decimal::from_str("12.96").unwrap());
        assert_eq!(product.brand, "Apple");
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let product: Product = serde_json::from_str(IPHONE).unwrap();
        assert_eq!(product.extra.get("sku"), Some(&Value::from("IPH-9")));

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["sku"], "IPH-9");
        assert_eq!(json["discountPercentage"], 12.96);
    }

    #[test]
    fn test_missing_brand_defaults_to_empty() {
        let json = r#"{
            "id": 16, "title": "Apple", "description": "Fresh apples",
            "category": "groceries", "price": 1.99, "discountPercentage": 0,
            "rating": 4.2, "stock": 10
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.brand.is_empty());
        assert!(!product.is_discounted());
        assert_eq!(product.discounted_price(), product.price);
    }
}
