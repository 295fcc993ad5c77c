//! Validation of raw catalog JSON into domain products.
//!
//! The catalog is an external service, so nothing about its payload is taken
//! on trust: every field the storefront reads is checked for presence, type
//! and range here, and failures become [`CatalogError::Schema`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use shophub_core::{Product, ProductId};

use super::CatalogError;

const MAX_PRICE: i64 = 1_000_000_000_000;
const MAX_DISCOUNT: u32 = 100;
const MAX_RATING: f64 = 5.0;

/// Convert a single product object.
pub fn convert_product(value: Value) -> Result<Product, CatalogError> {
    let Value::Object(mut map) = value else {
        return Err(schema("?", "product", "expected a JSON object"));
    };

    let id = take_id(&mut map)?;
    let ctx = id.to_string();

    let title = take_string(&mut map, &ctx, "title")?;
    if title.trim().is_empty() {
        return Err(schema(&ctx, "title", "must not be empty"));
    }
    let description = take_string(&mut map, &ctx, "description")?;
    let category = take_string(&mut map, &ctx, "category")?;
    if category.trim().is_empty() {
        return Err(schema(&ctx, "category", "must not be empty"));
    }
    let brand = take_optional_string(&mut map, &ctx, "brand")?.unwrap_or_default();

    let price = take_decimal(&mut map, &ctx, "price")?;
    if price.is_sign_negative() {
        return Err(schema(&ctx, "price", "must not be negative"));
    }
    if price > Decimal::from(MAX_PRICE) {
        return Err(schema(&ctx, "price", "exceeds 10^12"));
    }
    let discount_percentage = take_decimal(&mut map, &ctx, "discountPercentage")?;
    if discount_percentage.is_sign_negative() || discount_percentage > Decimal::from(MAX_DISCOUNT) {
        return Err(schema(&ctx, "discountPercentage", "must be within 0..=100"));
    }
    let rating = take_f64(&mut map, &ctx, "rating")?;
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(schema(&ctx, "rating", "must be within 0..=5"));
    }
    let stock = take_u32(&mut map, &ctx, "stock")?;

    let images = take_string_list(&mut map, &ctx, "images")?;
    let thumbnail = take_optional_string(&mut map, &ctx, "thumbnail")?.unwrap_or_default();

    Ok(Product {
        id,
        title,
        description,
        brand,
        category,
        price,
        discount_percentage,
        rating,
        stock,
        images,
        thumbnail,
        extra: map,
    })
}

/// Convert a `{ "products": [...] }` listing.
pub fn convert_product_list(value: Value) -> Result<Vec<Product>, CatalogError> {
    let Value::Object(mut map) = value else {
        return Err(schema("listing", "products", "expected a JSON object"));
    };
    match map.remove("products") {
        Some(Value::Array(items)) => items.into_iter().map(convert_product).collect(),
        Some(_) => Err(schema("listing", "products", "expected an array")),
        None => Err(schema("listing", "products", "missing")),
    }
}

fn schema(product: &str, field: &str, reason: &str) -> CatalogError {
    CatalogError::Schema {
        product: product.to_owned(),
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

fn take_required(map: &mut Map<String, Value>, ctx: &str, field: &str) -> Result<Value, CatalogError> {
    match map.remove(field) {
        None | Some(Value::Null) => Err(schema(ctx, field, "missing")),
        Some(value) => Ok(value),
    }
}

fn take_id(map: &mut Map<String, Value>) -> Result<ProductId, CatalogError> {
    let value = take_required(map, "?", "id")?;
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .map(ProductId::new)
        .ok_or_else(|| schema("?", "id", "expected a positive integer"))
}

fn take_string(map: &mut Map<String, Value>, ctx: &str, field: &str) -> Result<String, CatalogError> {
    match take_required(map, ctx, field)? {
        Value::String(s) => Ok(s),
        _ => Err(schema(ctx, field, "expected a string")),
    }
}

fn take_optional_string(
    map: &mut Map<String, Value>,
    ctx: &str,
    field: &str,
) -> Result<Option<String>, CatalogError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(schema(ctx, field, "expected a string")),
    }
}

fn take_decimal(map: &mut Map<String, Value>, ctx: &str, field: &str) -> Result<Decimal, CatalogError> {
    let Value::Number(n) = take_required(map, ctx, field)? else {
        return Err(schema(ctx, field, "expected a number"));
    };
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| schema(ctx, field, "number out of range"))
}

fn take_f64(map: &mut Map<String, Value>, ctx: &str, field: &str) -> Result<f64, CatalogError> {
    take_required(map, ctx, field)?
        .as_f64()
        .ok_or_else(|| schema(ctx, field, "expected a number"))
}

fn take_u32(map: &mut Map<String, Value>, ctx: &str, field: &str) -> Result<u32, CatalogError> {
    take_required(map, ctx, field)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| schema(ctx, field, "expected a non-negative integer"))
}

fn take_string_list(
    map: &mut Map<String, Value>,
    ctx: &str,
    field: &str,
) -> Result<Vec<String>, CatalogError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(schema(ctx, field, "expected an array of strings")),
            })
            .collect(),
        Some(_) => Err(schema(ctx, field, "expected an array of strings")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw() -> Value {
        json!({
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
            "warrantyInformation": "1 month warranty"
        })
    }

    fn field_error(value: Value) -> String {
        match convert_product(value) {
            Err(CatalogError::Schema { field, .. }) => field,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_valid_product() {
        let product = convert_product(raw()).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(549, 0));
        assert_eq!(product.discount_percentage, Decimal::new(1296, 2));
        assert_eq!(product.stock, 94);
        assert_eq!(
            product.extra.get("warrantyInformation"),
            Some(&json!("1 month warranty"))
        );
        assert!(!product.extra.contains_key("title"));
    }

    #[test]
    fn test_missing_brand_and_images_tolerated() {
        let mut value = raw();
        value.as_object_mut().unwrap().remove("brand");
        value.as_object_mut().unwrap().remove("images");
        let product = convert_product(value).unwrap();
        assert!(product.brand.is_empty());
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let mut value = raw();
        value.as_object_mut().unwrap().remove("price");
        assert_eq!(field_error(value), "price");
    }

    #[test]
    fn test_wrong_types() {
        let mut value = raw();
        value["price"] = json!("549");
        assert_eq!(field_error(value), "price");

        let mut value = raw();
        value["stock"] = json!(-1);
        assert_eq!(field_error(value), "stock");

        let mut value = raw();
        value["images"] = json!([1, 2]);
        assert_eq!(field_error(value), "images");
    }

    #[test]
    fn test_out_of_range_values() {
        let mut value = raw();
        value["discountPercentage"] = json!(120);
        assert_eq!(field_error(value), "discountPercentage");

        let mut value = raw();
        value["rating"] = json!(5.5);
        assert_eq!(field_error(value), "rating");

        let mut value = raw();
        value["price"] = json!(-1);
        assert_eq!(field_error(value), "price");
    }

    #[test]
    fn test_price_upper_bound() {
        let mut value = raw();
        value["price"] = json!(7.0e28);
        value["discountPercentage"] = json!(50.0);
        assert_eq!(field_error(value), "price");

        let mut value = raw();
        value["price"] = json!(1_000_000_000_000_u64);
        let product = convert_product(value).unwrap();
        assert_eq!(product.price, Decimal::from(MAX_PRICE));
    }

    #[test]
    fn test_convert_listing() {
        let listing = json!({ "products": [raw()], "total": 1, "skip": 0, "limit": 1 });
        assert_eq!(convert_product_list(listing).unwrap().len(), 1);

        assert!(matches!(
            convert_product_list(json!({ "items": [] })),
            Err(CatalogError::Schema { .. })
        ));
    }

    #[test]
    fn test_one_bad_item_fails_listing() {
        let mut bad = raw();
        bad["id"] = json!("one");
        let listing = json!({ "products": [raw(), bad] });
        assert!(matches!(
            convert_product_list(listing),
            Err(CatalogError::Schema { field, .. }) if field == "id"
        ));
    }
}
