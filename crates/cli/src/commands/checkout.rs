//! Checkout command.

use shophub_core::CheckoutForm;
use shophub_storefront::{AppError, Storefront};

use super::cart::apply_promo;
use crate::render;

pub fn place_order(
    storefront: &mut Storefront,
    form: &CheckoutForm,
    promo: Option<&str>,
) -> Result<String, AppError> {
    if let Some(code) = promo {
        apply_promo(storefront, code)?;
    }
    let order = storefront.place_order(form)?;
    Ok(render::confirmation(&order))
}
