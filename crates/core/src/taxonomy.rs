//! Fixed category and brand lists offered as filter choices.

use serde::Serialize;

/// A browsable category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Display name.
    pub name: &'static str,
    /// Catalog slug used in `/products/category/{slug}`.
    pub slug: &'static str,
}

/// Categories shown in navigation and the category filter.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Smartphones",
        slug: "smartphones",
    },
    Category {
        name: "Laptops",
        slug: "laptops",
    },
    Category {
        name: "Fragrances",
        slug: "fragrances",
    },
    Category {
        name: "Skincare",
        slug: "skincare",
    },
    Category {
        name: "Groceries",
        slug: "groceries",
    },
    Category {
        name: "Home Decoration",
        slug: "home-decoration",
    },
];

/// Brands shown in the brand filter.
pub const BRANDS: &[&str] = &[
    "Apple",
    "Samsung",
    "OPPO",
    "Huawei",
    "Microsoft Surface",
    "Infinix",
    "HP Pavilion",
    "Impression of Acqua Di Gio",
    "Royal_Mirage",
    "Saaf & Khaas",
    "Hemani Tea",
];

/// Colors offered on the product page.
pub const COLORS: &[&str] = &["Black", "White", "Blue", "Red", "Gray"];

/// Sizes offered on the product page.
pub const SIZES: &[&str] = &["S", "M", "L", "XL"];

/// Find a category by slug, ignoring case.
#[must_use]
pub fn category(slug: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.slug.eq_ignore_ascii_case(slug))
}
