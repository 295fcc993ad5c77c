//! Core types for ShopHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod price;
pub mod product;

pub use contact::{ContactError, Email, PhoneNumber, Pincode};
pub use id::*;
pub use price::{calculate_discount, format_price, product_rating};
pub use product::Product;
