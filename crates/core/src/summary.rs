//! Order totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;

/// GST rate applied after the promo discount, in percent.
pub const TAX_RATE_PERCENT: u32 = 18;

/// Subtotals strictly above this amount ship for free.
pub const FREE_SHIPPING_THRESHOLD: u32 = 500;

/// Flat shipping fee below the threshold.
pub const SHIPPING_FEE: u32 = 50;

/// Breakdown of what a cart costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of discounted unit prices times quantities.
    pub subtotal: Decimal,
    /// Promo code discount taken off the subtotal.
    pub discount_amount: Decimal,
    /// Tax on the discounted subtotal.
    pub tax: Decimal,
    /// Shipping fee.
    pub shipping: Decimal,
    /// Amount payable.
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute totals for `lines` with a promo discount of `discount_percent`.
    ///
    /// Amounts saturate at the `Decimal` range instead of overflowing.
    #[must_use]
    pub fn compute(lines: &[CartLine], discount_percent: u8) -> Self {
        let subtotal = lines.iter().fold(Decimal::ZERO, |sum, line| {
            let amount = line
                .product
                .discounted_price()
                .saturating_mul(Decimal::from(line.quantity));
            sum.saturating_add(amount)
        });

        let discount_amount = percent_of(subtotal, u32::from(discount_percent));
        let taxable = subtotal.saturating_sub(discount_amount);
        let tax = percent_of(taxable, TAX_RATE_PERCENT);
        let shipping = if subtotal > Decimal::from(FREE_SHIPPING_THRESHOLD) {
            Decimal::ZERO
        } else {
            Decimal::from(SHIPPING_FEE)
        };

        Self {
            subtotal,
            discount_amount,
            tax,
            shipping,
            total: taxable.saturating_add(tax).saturating_add(shipping),
        }
    }
}

fn percent_of(amount: Decimal, percent: u32) -> Decimal {
    amount.saturating_mul(Decimal::from(percent) / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::cart::tests::product;
    use crate::types::CartLineId;

    fn line(price: i64, discount: i64, quantity: u32) -> CartLine {
        let mut product = product(1, price);
        product.discount_percentage = Decimal::new(discount, 0);
        CartLine {
            id: CartLineId::mint(product.id, "Black", "M", Utc::now()),
            product,
            quantity,
            selected_color: "Black".to_string(),
            selected_size: "M".to_string(),
        }
    }

    #[test]
    fn test_small_order_pays_shipping() {
        let summary = OrderSummary::compute(&[line(100, 0, 2)], 0);
        assert_eq!(summary.subtotal, Decimal::new(200, 0));
        assert_eq!(summary.discount_amount, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::new(36, 0));
        assert_eq!(summary.shipping, Decimal::new(50, 0));
        assert_eq!(summary.total, Decimal::new(286, 0));
    }

    #[test]
    fn test_product_discount_and_promo() {
        // 1000 at 10% off = 900 each, promo 10% = 90 off
        let summary = OrderSummary::compute(&[line(1000, 10, 1)], 10);
        assert_eq!(summary.subtotal, Decimal::new(900, 0));
        assert_eq!(summary.discount_amount, Decimal::new(90, 0));
        assert_eq!(summary.tax, Decimal::new(1458, 1));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::new(9558, 1));
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let mut huge = line(1, 0, u32::MAX);
        huge.product.price = Decimal::MAX;
        let summary = OrderSummary::compute(&[huge, line(100, 0, 1)], 20);
        assert_eq!(summary.subtotal, Decimal::MAX);
        assert_eq!(summary.shipping, Decimal::ZERO);
        let taxable = summary.subtotal - summary.discount_amount;
        assert_eq!(summary.total, taxable + summary.tax);
        assert!(summary.total < Decimal::MAX);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let summary = OrderSummary::compute(&[line(500, 0, 1)], 0);
        assert_eq!(summary.shipping, Decimal::new(50, 0));
    }
}
