//! Cart commands.

use shophub_core::taxonomy::{COLORS, SIZES};
use shophub_core::{CartLineId, ProductId};
use shophub_storefront::{AppError, Storefront};

use crate::render;

/// Apply a promo code for this invocation.
///
/// Promo codes are not persisted, so commands that show totals re-apply them
/// each run.
pub fn apply_promo(storefront: &mut Storefront, code: &str) -> Result<(), AppError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Please enter a promo code".to_string()));
    }
    if !storefront.cart_mut().apply_promo_code(code)? {
        return Err(AppError::BadRequest("Invalid promo code".to_string()));
    }
    Ok(())
}

pub fn show(storefront: &mut Storefront, promo: Option<&str>) -> Result<String, AppError> {
    if let Some(code) = promo {
        apply_promo(storefront, code)?;
    }
    Ok(render::cart(storefront.cart().cart()))
}

pub async fn add(
    storefront: &mut Storefront,
    id: ProductId,
    quantity: u32,
    color: &str,
    size: &str,
) -> Result<String, AppError> {
    let color = pick(COLORS, color, "color")?;
    let size = pick(SIZES, size, "size")?;

    let product = storefront.catalog().get_product(id).await?;
    let title = product.title.clone();
    storefront.cart_mut().add_to_cart(product, quantity, color, size)?;
    Ok(format!(
        "Added {quantity} x {title} ({color}, {size}) to cart.\n{} items in cart.\n",
        storefront.cart().cart().item_count()
    ))
}

pub fn remove(storefront: &mut Storefront, line: &str) -> Result<String, AppError> {
    let id = CartLineId::from(line);
    if !storefront.cart_mut().remove_from_cart(&id)? {
        return Err(AppError::NotFound(format!("cart line {line}")));
    }
    Ok(render::cart(storefront.cart().cart()))
}

pub fn update(storefront: &mut Storefront, line: &str, quantity: u32) -> Result<String, AppError> {
    let id = CartLineId::from(line);
    if storefront.cart().cart().line(&id).is_none() {
        return Err(AppError::NotFound(format!("cart line {line}")));
    }
    storefront.cart_mut().update_quantity(&id, quantity)?;
    Ok(render::cart(storefront.cart().cart()))
}

/// Apply a code and show the discounted totals.
pub fn promo(storefront: &mut Storefront, code: &str) -> Result<String, AppError> {
    apply_promo(storefront, code)?;
    let cart = storefront.cart().cart();
    Ok(format!(
        "Promo code {} applied ({}% off).\n{}",
        cart.promo_code().unwrap_or_default(),
        cart.discount(),
        render::summary(&cart.summary(), cart.promo_code())
    ))
}

pub fn unpromo(storefront: &mut Storefront) -> Result<String, AppError> {
    storefront.cart_mut().remove_promo_code()?;
    Ok(render::cart(storefront.cart().cart()))
}

pub fn clear(storefront: &mut Storefront) -> Result<String, AppError> {
    storefront.cart_mut().clear_cart()?;
    Ok("Cart cleared.\n".to_string())
}

/// Match `input` against `choices` case-insensitively, returning the
/// canonical spelling.
fn pick(choices: &[&'static str], input: &str, what: &str) -> Result<&'static str, AppError> {
    choices
        .iter()
        .find(|c| c.eq_ignore_ascii_case(input.trim()))
        .copied()
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown {what} '{input}'. Choose one of: {}",
                choices.join(", ")
            ))
        })
}
