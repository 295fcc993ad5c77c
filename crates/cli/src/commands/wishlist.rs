//! Wishlist commands.

use shophub_core::ProductId;
use shophub_storefront::{AppError, Storefront};

use crate::render;

pub fn show(storefront: &Storefront) -> String {
    render::wishlist(storefront.wishlist().wishlist())
}

pub async fn toggle(storefront: &mut Storefront, id: ProductId) -> Result<String, AppError> {
    let (product, liked) = storefront.toggle_wishlist(id).await?;
    Ok(if liked {
        format!("Added {} to wishlist.\n", product.title)
    } else {
        format!("Removed {} from wishlist.\n", product.title)
    })
}
