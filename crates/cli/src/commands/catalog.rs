//! Browsing commands: listings, product pages, categories.

use rust_decimal::Decimal;
use shophub_core::filter::{DEFAULT_MAX_PRICE, paginate};
use shophub_core::taxonomy;
use shophub_core::{ProductId, SortKey};
use shophub_storefront::{AppError, FeedRequest, Storefront};

use crate::render;

/// How many products a listing pulls from the catalog before filtering.
pub const LISTING_FETCH_LIMIT: u32 = 100;

/// Listing filters from the command line.
#[derive(Debug, Clone, Default)]
pub struct ListingArgs {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub rating: Option<f64>,
    pub query: Option<String>,
    pub sort: SortKey,
    pub page: usize,
    pub per_page: Option<usize>,
}

/// Filtered, sorted, paginated product listing.
pub async fn products(storefront: &mut Storefront, args: ListingArgs) -> Result<String, AppError> {
    let products = storefront.catalog().products(LISTING_FETCH_LIMIT).await?;

    let filters = storefront.filters_mut();
    filters.reset_filters();
    if let Some(category) = args.category {
        filters.set_category(category);
    }
    if let Some(brand) = args.brand {
        filters.set_brand(brand);
    }
    filters.set_price_range(
        args.min_price.unwrap_or(Decimal::ZERO),
        args.max_price.unwrap_or_else(|| Decimal::from(DEFAULT_MAX_PRICE)),
    );
    if let Some(rating) = args.rating {
        filters.set_rating(rating);
    }
    if let Some(query) = args.query {
        filters.set_search_query(query);
    }
    filters.set_sort_by(args.sort);

    let matching = storefront.filters().apply(&products);
    let per_page = args.per_page.unwrap_or(storefront.config().page_size);
    Ok(render::listing(&paginate(&matching, args.page, per_page)))
}

/// Products in one category, as returned by the catalog.
pub async fn category(storefront: &Storefront, slug: &str, page: usize) -> Result<String, AppError> {
    let products = storefront
        .catalog()
        .products_by_category(slug, LISTING_FETCH_LIMIT)
        .await?;
    let heading = taxonomy::category(slug).map_or(slug, |c| c.name);
    let listing = render::listing(&paginate(&products, page, storefront.config().page_size));
    Ok(format!("{heading}\n\n{listing}"))
}

/// Product page. Related products load through a feed, so a failure there
/// only blanks the "You may also like" section.
pub async fn product(storefront: &Storefront, id: ProductId) -> Result<String, AppError> {
    let product = match storefront.catalog().get_product(id).await {
        Ok(product) => product,
        Err(shophub_storefront::CatalogError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("product {id}")));
        }
        Err(e) => return Err(e.into()),
    };

    let mut feed = storefront.feed();
    feed.load(FeedRequest::related(product.clone()));
    let related = feed.settled().await;

    let liked = storefront.wishlist().contains(product.id);
    Ok(render::product_detail(
        &product,
        liked,
        &related.products,
        related.error.as_deref(),
    ))
}

/// Known categories.
pub fn categories() -> String {
    render::categories()
}
