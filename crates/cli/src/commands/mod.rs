//! Subcommand implementations.
//!
//! Each command works on an open [`Storefront`](shophub_storefront::Storefront)
//! session and returns the text to print.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;
