//! Wishlist membership.

use crate::types::{Product, ProductId};

/// Liked products, at most one entry per product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    /// A wishlist holding previously persisted products.
    ///
    /// Duplicate ids keep their first occurrence.
    #[must_use]
    pub fn from_items(items: Vec<Product>) -> Self {
        let mut wishlist = Self::default();
        for product in items {
            if !wishlist.contains(product.id) {
                wishlist.items.push(product);
            }
        }
        wishlist
    }

    /// Remove the product if present, otherwise append it.
    ///
    /// Returns `true` when the product is in the wishlist afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        if let Some(index) = self.items.iter().position(|p| p.id == product.id) {
            self.items.remove(index);
            false
        } else {
            self.items.push(product);
            true
        }
    }

    /// Whether a product is in the wishlist.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Products in the order they were liked.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::cart::tests::product;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut wishlist = Wishlist::default();
        assert!(wishlist.toggle(product(1, 10)));
        assert!(wishlist.contains(ProductId::new(1)));
        assert!(!wishlist.toggle(product(1, 10)));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_toggle_matches_by_id_only() {
        let mut wishlist = Wishlist::default();
        wishlist.toggle(product(1, 10));
        // Same id, different price snapshot still counts as the same product
        assert!(!wishlist.toggle(product(1, 99)));
    }

    #[test]
    fn test_from_items_drops_duplicates() {
        let wishlist = Wishlist::from_items(vec![product(1, 10), product(2, 10), product(1, 20)]);
        assert_eq!(wishlist.len(), 2);
        assert_eq!(wishlist.items()[0].price, product(1, 10).price);
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_is_identity(ids in prop::collection::vec(1_u32..20, 0..10), target in 1_u32..20) {
            let mut wishlist = Wishlist::default();
            for id in ids {
                wishlist.toggle(product(id, 10));
            }
            let before = wishlist.clone();
            let was_present = before.contains(ProductId::new(target));

            wishlist.toggle(product(target, 10));
            wishlist.toggle(product(target, 10));

            // Membership is restored; an entry that was present moves to the end
            prop_assert_eq!(wishlist.len(), before.len());
            for p in before.items() {
                prop_assert!(wishlist.contains(p.id));
            }
            if !was_present {
                prop_assert_eq!(&wishlist, &before);
            }
        }
    }
}
