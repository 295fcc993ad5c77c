//! ShopHub Core - Shared domain types and pure storefront logic.
//!
//! This crate provides the types and state transitions used across all ShopHub
//! components:
//! - `storefront` - Catalog client, persisted stores, checkout service
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types, reducers and pure functions - no I/O,
//! no storage access, no HTTP clients. Persistence and network access live in
//! the storefront crate and call into these reducers.
//!
//! # Modules
//!
//! - [`types`] - Product ids, catalog products, prices, contact details
//! - [`cart`] - Cart lines and the cart reducer
//! - [`wishlist`] - Wishlist toggle semantics
//! - [`filter`] - Filter criteria, filtering, sorting, pagination
//! - [`promo`] - Promo code policy
//! - [`summary`] - Order totals (discount, tax, shipping)
//! - [`checkout`] - Checkout form validation
//! - [`taxonomy`] - Fixed category and brand lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod filter;
pub mod promo;
pub mod summary;
pub mod taxonomy;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartAction, CartError, CartLine, Persistence, Transition};
pub use checkout::{CheckoutForm, FormError, ShippingDetails};
pub use filter::{FilterAction, FilterCriteria, Page, PriceRange, SortKey};
pub use promo::{PromoCode, PromoPolicy, PromoPolicyError};
pub use summary::OrderSummary;
pub use types::*;
pub use wishlist::Wishlist;
