//! Product filtering, sorting and pagination.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Default number of products per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Upper bound of the default price range.
pub const DEFAULT_MAX_PRICE: u32 = 2000;

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Relevance,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first.
    Rating,
    /// Highest id first.
    Newest,
}

impl SortKey {
    /// All keys, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Relevance,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Rating,
        Self::Newest,
    ];

    /// The wire/CLI name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized sort key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort key '{0}' (expected relevance, price-low, price-high, rating or newest)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSortKey(s.to_owned()))
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest accepted price.
    pub min: Decimal,
    /// Highest accepted price.
    pub max: Decimal,
}

impl PriceRange {
    /// Create a range. Bounds are not reordered.
    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Whether `price` lies within the bounds, inclusive.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Decimal::ZERO, Decimal::from(DEFAULT_MAX_PRICE))
    }
}

/// Active listing filters.
///
/// Empty strings mean "unconstrained". Values are trusted as given: the range
/// is not reordered and the rating is not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Category slug, matched exactly ignoring case.
    pub category: String,
    /// Brand, matched exactly ignoring case.
    pub brand: String,
    /// Inclusive price bounds.
    pub price_range: PriceRange,
    /// Minimum rating.
    pub min_rating: f64,
    /// Free text matched against title, description and brand.
    pub search_query: String,
    /// Listing order.
    pub sort_by: SortKey,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: String::new(),
            brand: String::new(),
            price_range: PriceRange::default(),
            min_rating: 0.0,
            search_query: String::new(),
            sort_by: SortKey::Relevance,
        }
    }
}

/// Commands accepted by [`FilterCriteria::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Set the category slug.
    SetCategory(String),
    /// Set the brand.
    SetBrand(String),
    /// Set the price bounds.
    SetPriceRange(PriceRange),
    /// Set the minimum rating.
    SetRating(f64),
    /// Set the search text.
    SetSearchQuery(String),
    /// Set the listing order.
    SetSortBy(SortKey),
    /// Restore every field to its default.
    Reset,
}

impl FilterCriteria {
    /// Apply a single setter or reset.
    pub fn apply(&mut self, action: FilterAction) {
        match action {
            FilterAction::SetCategory(category) => self.category = category,
            FilterAction::SetBrand(brand) => self.brand = brand,
            FilterAction::SetPriceRange(range) => self.price_range = range,
            FilterAction::SetRating(rating) => self.min_rating = rating,
            FilterAction::SetSearchQuery(query) => self.search_query = query,
            FilterAction::SetSortBy(key) => self.sort_by = key,
            FilterAction::Reset => *self = Self::default(),
        }
    }

    /// Whether a product passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.category.is_empty() && !eq_ignore_case(&product.category, &self.category) {
            return false;
        }
        if !self.brand.is_empty() && !eq_ignore_case(&product.brand, &self.brand) {
            return false;
        }
        if !self.price_range.contains(product.price) {
            return false;
        }
        if product.rating < self.min_rating {
            return false;
        }
        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            let hit = [&product.title, &product.description, &product.brand]
                .into_iter()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        true
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Products passing every filter in `criteria`, in input order.
#[must_use]
pub fn filter_products(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    products
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect()
}

/// A sorted copy of `products`. The sort is stable; the input is untouched.
#[must_use]
pub fn sort_products(products: &[Product], sort_by: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match sort_by {
        SortKey::PriceLow => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => sorted.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::Relevance => {}
    }
    sorted
}

/// Filter then sort, the way a listing view presents products.
#[must_use]
pub fn apply_criteria(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    sort_products(&filter_products(products, criteria), criteria.sort_by)
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based page number.
    pub number: usize,
    /// Number of pages, `ceil(total_items / per_page)`.
    pub total_pages: usize,
    /// Items across all pages.
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice out page `number` (1-based). Out-of-range pages are empty.
///
/// A `per_page` of zero is treated as one.
#[must_use]
pub fn paginate<T>(items: &[T], number: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let start = number.saturating_sub(1).saturating_mul(per_page);
    let page_items: &[T] = if number == 0 {
        &[]
    } else {
        items
            .get(start..)
            .map_or(&[][..], |rest| rest.get(..per_page).unwrap_or(rest))
    };

    Page {
        items: page_items,
        number,
        total_pages,
        total_items: items.len(),
    }
}
