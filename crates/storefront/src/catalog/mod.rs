//! Read-only product catalog client.
//!
//! Talks to a DummyJSON-compatible REST API:
//!
//! - `GET {base}/products/{id}`
//! - `GET {base}/products?limit=N`
//! - `GET {base}/products/category/{slug}?limit=N`
//!
//! Every payload is validated in [`conversions`] before it reaches the rest of
//! the storefront. Successful lookups are cached with `moka` for the
//! configured TTL.

mod cache;
mod conversions;
pub mod feed;

pub use feed::{FeedRequest, FeedState, ProductFeed};

use std::sync::Arc;

use moka::future::Cache;
use serde_json::Value;
use shophub_core::{Product, ProductId};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogConfig;
use cache::{CacheKey, CacheValue};
use conversions::{convert_product, convert_product_list};

/// Number of related products shown on a product page.
pub const RELATED_LIMIT: u32 = 4;

const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The payload does not describe a valid product.
    #[error("Invalid catalog data for product {product}: {field} {reason}")]
    Schema {
        product: String,
        field: String,
        reason: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The base URL cannot carry endpoint paths.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the base URL cannot have path
    /// segments appended, or [`CatalogError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shophub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build `{base}/{segments...}[?limit=N]`.
    fn endpoint(&self, segments: &[&str], limit: Option<u32>) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        Ok(url)
    }

    /// Fetch a JSON document.
    async fn fetch(&self, url: Url) -> Result<Value, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Fetch a product listing, consulting the cache first.
    async fn listing(
        &self,
        key: CacheKey,
        url: Url,
    ) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product listing");
            return Ok(products.as_ref().clone());
        }

        let products = convert_product_list(self.fetch(url).await?)?;
        debug!(count = products.len(), "Fetched product listing");

        self.inner
            .cache
            .insert(key, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the catalog has no such product,
    /// [`CatalogError::Schema`] if the payload is invalid, or a transport
    /// error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()], None)?;
        let product = convert_product(self.fetch(url).await?)?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get up to `limit` products from the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any product is invalid.
    #[instrument(skip(self))]
    pub async fn products(&self, limit: u32) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint(&["products"], Some(limit))?;
        self.listing(CacheKey::Products { limit }, url).await
    }

    /// Get up to `limit` products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any product is invalid.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        slug: &str,
        limit: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint(&["products", "category", slug], Some(limit))?;
        let key = CacheKey::Category {
            slug: slug.to_string(),
            limit,
        };
        self.listing(key, url).await
    }

    /// Products from the same category, excluding `product` itself.
    ///
    /// Fetches `limit` products from the category, so at most `limit` are
    /// returned and one fewer when the product appears in its own listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any product is invalid.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn related(&self, product: &Product, limit: u32) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.products_by_category(&product.category, limit).await?;
        products.retain(|p| p.id != product.id);
        Ok(products)
    }
}
