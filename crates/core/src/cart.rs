//! Shopping cart state and reducer.
//!
//! [`Cart`] is a plain value. All mutations go through [`Cart::reduce`], which
//! reports whether anything changed and what the caller must do to keep the
//! persisted copy in sync. The storefront crate owns the actual persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::promo::PromoPolicy;
use crate::summary::OrderSummary;
use crate::types::{CartLineId, Product, ProductId};

/// Cart reducer errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Items must be added at least one at a time.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// One cart entry: a product snapshot in a specific color and size.
///
/// Serialized flat (product fields next to `quantity`, `selectedColor`,
/// `selectedSize` and `cartItemId`) so the persisted record matches what
/// earlier storefront versions wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    #[serde(flatten)]
    pub product: Product,
    /// Units of this variant, always at least 1.
    pub quantity: u32,
    /// Chosen color.
    pub selected_color: String,
    /// Chosen size.
    pub selected_size: String,
    /// Line identifier.
    #[serde(rename = "cartItemId")]
    pub id: CartLineId,
}

impl CartLine {
    /// Whether this line holds the given product variant.
    #[must_use]
    pub fn matches(&self, product: ProductId, color: &str, size: &str) -> bool {
        self.product.id == product && self.selected_color == color && self.selected_size == size
    }
}

/// An accepted promo code and its discount. Kept together so the discount is
/// never set without a code.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AppliedPromo {
    code: String,
    discount: u8,
}

/// Commands accepted by the cart reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add units of a product variant, merging with an existing line.
    Add {
        /// Product snapshot.
        product: Box<Product>,
        /// Units to add.
        quantity: u32,
        /// Chosen color.
        color: String,
        /// Chosen size.
        size: String,
    },
    /// Remove a line. Unknown ids are ignored.
    Remove(CartLineId),
    /// Set a line's quantity, floored at 1. Unknown ids are ignored.
    UpdateQuantity {
        /// Line to update.
        id: CartLineId,
        /// Requested quantity.
        quantity: u32,
    },
    /// Apply a promo code (case-insensitive). Unknown codes are ignored.
    ApplyPromo(String),
    /// Drop the active promo code.
    RemovePromo,
    /// Empty the cart and drop the promo code.
    Clear,
}

/// What the persisted cart record needs after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Rewrite the whole line list.
    WriteLines,
    /// Delete the record.
    Erase,
    /// Leave the record alone.
    Untouched,
}

/// Result of applying a [`CartAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Whether the in-memory state changed.
    pub changed: bool,
    /// Required persistence step.
    pub persistence: Persistence,
}

impl Transition {
    const fn new(changed: bool, persistence: Persistence) -> Self {
        Self {
            changed,
            persistence,
        }
    }
}

/// Cart lines plus the active promo code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    promo: Option<AppliedPromo>,
}

impl Cart {
    /// A cart holding previously persisted lines and no promo code.
    #[must_use]
    pub const fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines, promo: None }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by id.
    #[must_use]
    pub fn line(&self, id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// The active promo code, upper-cased.
    #[must_use]
    pub fn promo_code(&self) -> Option<&str> {
        self.promo.as_ref().map(|p| p.code.as_str())
    }

    /// The active discount percentage, 0 without a promo code.
    #[must_use]
    pub fn discount(&self) -> u8 {
        self.promo.as_ref().map_or(0, |p| p.discount)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Totals for the current lines and promo discount.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::compute(&self.lines, self.discount())
    }

    /// Apply an action.
    ///
    /// `now` stamps newly minted line ids; `policy` resolves promo codes.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] when adding zero units. The cart is
    /// left unchanged in that case.
    pub fn reduce(
        &mut self,
        action: CartAction,
        policy: &PromoPolicy,
        now: DateTime<Utc>,
    ) -> Result<Transition, CartError> {
        let transition = match action {
            CartAction::Add {
                product,
                quantity,
                color,
                size,
            } => {
                self.add(*product, quantity, color, size, now)?;
                Transition::new(true, Persistence::WriteLines)
            }
            CartAction::Remove(id) => {
                Transition::new(self.remove(&id), Persistence::WriteLines)
            }
            CartAction::UpdateQuantity { id, quantity } => {
                Transition::new(self.update_quantity(&id, quantity), Persistence::WriteLines)
            }
            CartAction::ApplyPromo(code) => {
                Transition::new(self.apply_promo(&code, policy), Persistence::Untouched)
            }
            CartAction::RemovePromo => {
                let changed = self.promo.take().is_some();
                Transition::new(changed, Persistence::Untouched)
            }
            CartAction::Clear => {
                let changed = !self.lines.is_empty() || self.promo.is_some();
                self.lines.clear();
                self.promo = None;
                Transition::new(changed, Persistence::Erase)
            }
        };
        Ok(transition)
    }

    fn add(
        &mut self,
        product: Product,
        quantity: u32,
        color: String,
        size: String,
        now: DateTime<Utc>,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(product.id, &color, &size))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return Ok(());
        }

        let id = CartLineId::mint(product.id, &color, &size, now);
        self.lines.push(CartLine {
            product,
            quantity,
            selected_color: color,
            selected_size: size,
            id,
        });
        Ok(())
    }

    fn remove(&mut self, id: &CartLineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.id != id);
        self.lines.len() != before
    }

    fn update_quantity(&mut self, id: &CartLineId, quantity: u32) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| &l.id == id) else {
            return false;
        };
        let quantity = quantity.max(1);
        let changed = line.quantity != quantity;
        line.quantity = quantity;
        changed
    }

    fn apply_promo(&mut self, code: &str, policy: &PromoPolicy) -> bool {
        let Some(promo) = policy.lookup(code) else {
            return false;
        };
        self.promo = Some(AppliedPromo {
            code: promo.code.clone(),
            discount: promo.discount,
        });
        true
    }
}
