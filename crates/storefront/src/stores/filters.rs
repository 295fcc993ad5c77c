//! Listing filter store.

use rust_decimal::Decimal;
use shophub_core::filter::apply_criteria;
use shophub_core::{FilterAction, FilterCriteria, PriceRange, Product, SortKey};
use tracing::debug;

/// Active filter criteria for a listing view. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    criteria: FilterCriteria,
}

impl FilterStore {
    /// A store with default criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Apply a setter or reset.
    pub fn dispatch(&mut self, action: FilterAction) {
        debug!(?action, "Filter updated");
        self.criteria.apply(action);
    }

    /// Filter by category slug.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.dispatch(FilterAction::SetCategory(category.into()));
    }

    /// Filter by brand.
    pub fn set_brand(&mut self, brand: impl Into<String>) {
        self.dispatch(FilterAction::SetBrand(brand.into()));
    }

    /// Restrict prices to `min..=max`.
    pub fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        self.dispatch(FilterAction::SetPriceRange(PriceRange::new(min, max)));
    }

    /// Require at least `rating` stars.
    pub fn set_rating(&mut self, rating: f64) {
        self.dispatch(FilterAction::SetRating(rating));
    }

    /// Match title, description or brand.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(FilterAction::SetSearchQuery(query.into()));
    }

    /// Set the listing order.
    pub fn set_sort_by(&mut self, key: SortKey) {
        self.dispatch(FilterAction::SetSortBy(key));
    }

    /// Restore every criterion to its default.
    pub fn reset_filters(&mut self) {
        self.dispatch(FilterAction::Reset);
    }

    /// Filter and sort `products` with the current criteria.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        apply_criteria(products, &self.criteria)
    }
}
