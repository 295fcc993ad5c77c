//! Promo code policy.
//!
//! A promo code maps to a flat percentage discount on the cart subtotal. The
//! table is a value handed to the cart, so deployments can replace it.

use serde::{Deserialize, Serialize};

/// Errors parsing a promo table string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoPolicyError {
    /// An entry is not of the form `CODE=PERCENT`.
    #[error("invalid promo entry '{0}', expected CODE=PERCENT")]
    Malformed(String),
    /// The percentage is not an integer in `1..=100`.
    #[error("invalid discount for promo code {code}: {value}")]
    Discount {
        /// Offending code.
        code: String,
        /// Raw discount text.
        value: String,
    },
    /// The string contains no entries.
    #[error("promo table cannot be empty")]
    Empty,
}

/// A single promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// Upper-case code, e.g. `SAVE10`.
    pub code: String,
    /// Discount percentage.
    pub discount: u8,
    /// Human readable description.
    pub description: String,
}

impl PromoCode {
    fn new(code: &str, discount: u8, description: &str) -> Self {
        Self {
            code: code.to_uppercase(),
            discount,
            description: description.to_owned(),
        }
    }
}

/// The set of promo codes a cart accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoPolicy {
    codes: Vec<PromoCode>,
}

impl Default for PromoPolicy {
    fn default() -> Self {
        Self {
            codes: vec![
                PromoCode::new("SAVE10", 10, "10% off on all products"),
                PromoCode::new("SAVE20", 20, "20% off on orders above ₹2000"),
                PromoCode::new("WELCOME", 15, "15% off for new customers"),
            ],
        }
    }
}

impl PromoPolicy {
    /// Build a policy from explicit codes.
    #[must_use]
    pub fn new(codes: Vec<PromoCode>) -> Self {
        Self { codes }
    }

    /// Parse a `CODE=PERCENT[,CODE=PERCENT...]` string.
    ///
    /// ```
    /// use shophub_core::PromoPolicy;
    ///
    /// let policy = PromoPolicy::parse("flash=30, vip=25").unwrap();
    /// assert_eq!(policy.lookup("FLASH").map(|p| p.discount), Some(30));
    /// assert!(policy.lookup("SAVE10").is_none());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`PromoPolicyError`] for malformed entries, discounts outside
    /// `1..=100`, or an empty string.
    pub fn parse(input: &str) -> Result<Self, PromoPolicyError> {
        let mut codes = Vec::new();
        for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, value) = entry
                .split_once('=')
                .ok_or_else(|| PromoPolicyError::Malformed(entry.to_owned()))?;
            let code = code.trim();
            if code.is_empty() {
                return Err(PromoPolicyError::Malformed(entry.to_owned()));
            }
            let discount = value
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|d| (1..=100).contains(d))
                .ok_or_else(|| PromoPolicyError::Discount {
                    code: code.to_uppercase(),
                    value: value.trim().to_owned(),
                })?;
            codes.push(PromoCode::new(
                code,
                discount,
                &format!("{discount}% off your order"),
            ));
        }

        if codes.is_empty() {
            return Err(PromoPolicyError::Empty);
        }
        Ok(Self { codes })
    }

    /// Find a code, ignoring case.
    #[must_use]
    pub fn lookup(&self, input: &str) -> Option<&PromoCode> {
        let wanted = input.to_uppercase();
        self.codes.iter().find(|p| p.code == wanted)
    }

    /// All codes in the table.
    #[must_use]
    pub fn codes(&self) -> &[PromoCode] {
        &self.codes
    }
}
