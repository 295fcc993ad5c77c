//! Price arithmetic and rupee formatting.
//!
//! Amounts are `Decimal` in currency units (rupees, not paise). Arithmetic
//! here never rounds; rounding happens only when formatting for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Maximum number of fraction digits shown by [`format_price`].
const DISPLAY_FRACTION_DIGITS: u32 = 2;

/// Apply a percentage discount to a price.
///
/// Returns `price - price * discount_percentage / 100`, unrounded. A discount of
/// zero returns `price` unchanged. Results beyond the `Decimal` range saturate.
///
/// ```
/// use rust_decimal::Decimal;
/// use shophub_core::calculate_discount;
///
/// let price = Decimal::new(200, 0);
/// assert_eq!(calculate_discount(price, Decimal::new(10, 0)), Decimal::new(180, 0));
/// assert_eq!(calculate_discount(price, Decimal::ZERO), price);
/// ```
#[must_use]
pub fn calculate_discount(price: Decimal, discount_percentage: Decimal) -> Decimal {
    if discount_percentage.is_zero() {
        return price;
    }
    let factor = Decimal::ONE.saturating_sub(discount_percentage / Decimal::ONE_HUNDRED);
    price.saturating_mul(factor)
}

/// Format an amount as Indian rupees.
///
/// Uses Indian digit grouping (`1,23,456`), at most two fraction digits and
/// drops trailing zero fraction digits, e.g. `₹1,234.5`, `₹549`, `₹9.99`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(DISPLAY_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = format!("{sign}{CURRENCY_SYMBOL}{}", group_indian(integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Round a rating to one decimal place for display.
#[must_use]
pub fn product_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

/// Group ASCII digits the Indian way: the last three, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut pairs = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        pairs.push(pair);
        head = rest;
    }

    let mut out = String::with_capacity(digits.len() + pairs.len() + 2);
    out.push_str(head);
    for pair in pairs.iter().rev() {
        out.push(',');
        out.push_str(pair);
    }
    out.push(',');
    out.push_str(tail);
    out
}
