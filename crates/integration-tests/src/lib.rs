//! Integration test support for ShopHub.
//!
//! Provides [`FakeCatalog`], an in-process axum server speaking the catalog's
//! REST dialect, so the storefront can be exercised end to end without
//! network access.
//!
//! # Example
//!
//! ```rust,ignore
//! let catalog = FakeCatalog::builder()
//!     .products(vec![product_json(1, "smartphones", 549.0, 12.96)])
//!     .start()
//!     .await?;
//! let client = CatalogClient::new(&catalog.config())?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use shophub_storefront::CatalogConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// A catalog product in wire format.
#[must_use]
pub fn product_json(id: u32, category: &str, price: f64, discount: f64) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "description": format!("Description of product {id}"),
        "price": price,
        "discountPercentage": discount,
        "rating": 4.5,
        "stock": 20,
        "brand": "Acme",
        "category": category,
        "thumbnail": format!("https://cdn.example.com/{id}/thumbnail.jpg"),
        "images": [format!("https://cdn.example.com/{id}/1.jpg")],
        "sku": format!("SKU-{id:04}")
    })
}

/// A forced response for every request.
#[derive(Debug, Clone, Copy)]
pub struct Failure {
    pub status: StatusCode,
    pub retry_after: Option<u64>,
}

#[derive(Default)]
struct CatalogState {
    products: Vec<Value>,
    delays: HashMap<String, Duration>,
    failure: Option<Failure>,
    hits: AtomicUsize,
}

/// Configures a [`FakeCatalog`] before it starts.
#[derive(Default)]
pub struct FakeCatalogBuilder {
    state: CatalogState,
}

impl FakeCatalogBuilder {
    /// Products served by every endpoint.
    #[must_use]
    pub fn products(mut self, products: Vec<Value>) -> Self {
        self.state.products = products;
        self
    }

    /// Delay responses for one category slug.
    #[must_use]
    pub fn delay_category(mut self, slug: &str, delay: Duration) -> Self {
        self.state.delays.insert(slug.to_string(), delay);
        self
    }

    /// Answer every request with `status`.
    #[must_use]
    pub fn fail_with(mut self, status: StatusCode, retry_after: Option<u64>) -> Self {
        self.state.failure = Some(Failure {
            status,
            retry_after,
        });
        self
    }

    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(self) -> std::io::Result<FakeCatalog> {
        let state = Arc::new(self.state);
        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/products/category/{slug}", get(list_category))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}")).map_err(std::io::Error::other)?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(FakeCatalog {
            base_url,
            state,
            handle,
        })
    }
}

/// A running fake catalog. Stops when dropped.
pub struct FakeCatalog {
    base_url: Url,
    state: Arc<CatalogState>,
    handle: JoinHandle<()>,
}

impl FakeCatalog {
    #[must_use]
    pub fn builder() -> FakeCatalogBuilder {
        FakeCatalogBuilder::default()
    }

    /// Base URL of the server.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Catalog client settings pointed at this server.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig::new(self.base_url.clone())
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

fn listing(products: Vec<Value>, limit: Option<usize>) -> Json<Value> {
    let total = products.len();
    let products: Vec<Value> = products.into_iter().take(limit.unwrap_or(30)).collect();
    let count = products.len();
    Json(json!({ "products": products, "total": total, "skip": 0, "limit": count }))
}

/// Count the request and return the forced failure, if any.
fn begin(state: &CatalogState) -> Option<Response> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let failure = state.failure?;
    let mut headers = HeaderMap::new();
    if let Some(secs) = failure.retry_after {
        headers.insert(RETRY_AFTER, HeaderValue::from(secs));
    }
    Some((failure.status, headers, "catalog unavailable").into_response())
}

async fn list_products(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    if let Some(response) = begin(&state) {
        return response;
    }
    listing(state.products.clone(), query.limit).into_response()
}

async fn list_category(
    State(state): State<Arc<CatalogState>>,
    Path(slug): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Response {
    if let Some(response) = begin(&state) {
        return response;
    }
    if let Some(delay) = state.delays.get(&slug) {
        tokio::time::sleep(*delay).await;
    }
    let products = state
        .products
        .iter()
        .filter(|p| p.get("category").and_then(Value::as_str) == Some(slug.as_str()))
        .cloned()
        .collect();
    listing(products, query.limit).into_response()
}

async fn get_product(State(state): State<Arc<CatalogState>>, Path(id): Path<String>) -> Response {
    if let Some(response) = begin(&state) {
        return response;
    }
    let found = id.parse::<u64>().ok().and_then(|id| {
        state
            .products
            .iter()
            .find(|p| p.get("id").and_then(Value::as_u64) == Some(id))
    });
    match found {
        Some(product) => Json(product.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Product with id '{id}' not found") })),
        )
            .into_response(),
    }
}
