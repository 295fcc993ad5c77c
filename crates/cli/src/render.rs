//! Plain-text views.

use std::fmt::Write;

use rust_decimal::Decimal;
use shophub_core::filter::Page;
use shophub_core::summary::FREE_SHIPPING_THRESHOLD;
use shophub_core::taxonomy::CATEGORIES;
use shophub_core::{Cart, OrderSummary, Product, Wishlist, format_price, product_rating};
use shophub_storefront::OrderConfirmation;

/// One-line product summary.
pub fn product_row(product: &Product) -> String {
    let mut row = format!(
        "#{:<4} {}  {}",
        product.id,
        product.title,
        format_price(product.discounted_price())
    );
    if product.is_discounted() {
        let _ = write!(
            row,
            " (was {}, -{}%)",
            format_price(product.price),
            product.discount_percentage.round()
        );
    }
    let _ = write!(row, "  ★{:.1}", product_rating(product.rating));
    if !product.brand.is_empty() {
        let _ = write!(row, "  {}", product.brand);
    }
    row
}

/// A listing page with navigation hints.
pub fn listing(page: &Page<'_, Product>) -> String {
    if page.total_items == 0 {
        return "No products found. Try adjusting your filters.\n".to_string();
    }
    let mut out = String::new();
    for product in page.items {
        let _ = writeln!(out, "{}", product_row(product));
    }
    let _ = writeln!(
        out,
        "\nPage {} of {} ({} products)",
        page.number, page.total_pages, page.total_items
    );
    if page.has_next() {
        let _ = writeln!(out, "More: --page {}", page.number + 1);
    }
    out
}

/// Product page with related products.
pub fn product_detail(
    product: &Product,
    liked: bool,
    related: &[Product],
    related_error: Option<&str>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", product.title, if liked { "  ♥" } else { "" });
    let _ = writeln!(out, "{}", product_row(product));
    let _ = writeln!(out, "Category: {}", product.category);
    let stock = if product.in_stock() {
        format!("In stock ({})", product.stock)
    } else {
        "Out of stock".to_string()
    };
    let _ = writeln!(out, "{stock}");
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }

    let _ = writeln!(out, "\nYou may also like:");
    if let Some(error) = related_error {
        let _ = writeln!(out, "  (unavailable: {error})");
    } else if related.is_empty() {
        let _ = writeln!(out, "  (nothing similar)");
    } else {
        for item in related {
            let _ = writeln!(out, "  {}", product_row(item));
        }
    }
    out
}

/// Category directory.
pub fn categories() -> String {
    CATEGORIES.iter().fold(String::new(), |mut out, category| {
        let _ = writeln!(out, "{:<18} {}", category.slug, category.name);
        out
    })
}

/// Order totals block.
pub fn summary(summary: &OrderSummary, promo_code: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Subtotal:  {}", format_price(summary.subtotal));
    if let Some(code) = promo_code {
        let _ = writeln!(out, "Discount ({code}): -{}", format_price(summary.discount_amount));
    }
    let _ = writeln!(out, "Tax (GST): {}", format_price(summary.tax));
    let shipping = if summary.shipping.is_zero() {
        "FREE".to_string()
    } else {
        format_price(summary.shipping)
    };
    let _ = writeln!(out, "Shipping:  {shipping}");
    let _ = writeln!(out, "Total:     {}", format_price(summary.total));
    if !summary.shipping.is_zero() {
        let remaining = Decimal::from(FREE_SHIPPING_THRESHOLD) - summary.subtotal;
        let _ = writeln!(
            out,
            "Add {} more for free shipping",
            format_price(remaining.max(Decimal::ZERO))
        );
    }
    out
}

/// Cart contents and totals.
pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }
    let mut out = String::new();
    for line in cart.lines() {
        let unit = line.product.discounted_price();
        let _ = writeln!(
            out,
            "{}  {} x {}  = {}\n    Color: {}  Size: {}  [{}]",
            line.product.title,
            line.quantity,
            format_price(unit),
            format_price(unit * Decimal::from(line.quantity)),
            line.selected_color,
            line.selected_size,
            line.id
        );
    }
    let _ = writeln!(out, "\n{} items", cart.item_count());
    out.push_str(&summary(&cart.summary(), cart.promo_code()));
    out
}

/// Wishlist contents.
pub fn wishlist(wishlist: &Wishlist) -> String {
    if wishlist.is_empty() {
        return "Your wishlist is empty.\n".to_string();
    }
    let mut out = String::new();
    for product in wishlist.items() {
        let _ = writeln!(out, "{}", product_row(product));
    }
    let _ = writeln!(out, "\n{} saved", wishlist.len());
    out
}

/// Order placed message.
pub fn confirmation(order: &OrderConfirmation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order placed successfully!");
    let _ = writeln!(out, "Order:   {}", order.order_id);
    let _ = writeln!(out, "Placed:  {}", order.placed_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(
        out,
        "Ship to: {}, {}, {} {}",
        order.shipping.name, order.shipping.address, order.shipping.city, order.shipping.pincode
    );
    let _ = writeln!(out, "Contact: {} / {}", order.shipping.email, order.shipping.phone);
    out.push('\n');
    out.push_str(&summary(&order.summary, order.promo_code.as_deref()));
    out
}
