//! View-scoped product fetching.
//!
//! A [`ProductFeed`] belongs to one consumer (a listing, a category page, the
//! related-products strip). Each [`ProductFeed::load`] bumps a generation
//! counter, aborts the previous fetch and spawns a new one. A fetch only
//! publishes if its generation is still current, so a superseded or cancelled
//! request never overwrites newer state. Dropping the feed aborts the fetch.

use std::sync::Arc;

use shophub_core::Product;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CatalogClient, CatalogError, RELATED_LIMIT};

/// What a feed should fetch.
#[derive(Debug, Clone)]
pub enum FeedRequest {
    /// The first `limit` catalog products.
    All { limit: u32 },
    /// Products in one category.
    Category { slug: String, limit: u32 },
    /// Products related to `product`.
    Related { product: Box<Product>, limit: u32 },
}

impl FeedRequest {
    /// Related products with the default limit.
    #[must_use]
    pub fn related(product: Product) -> Self {
        Self::Related {
            product: Box::new(product),
            limit: RELATED_LIMIT,
        }
    }

    async fn fetch(&self, client: &CatalogClient) -> Result<Vec<Product>, CatalogError> {
        match self {
            Self::All { limit } => client.products(*limit).await,
            Self::Category { slug, limit } => client.products_by_category(slug, *limit).await,
            Self::Related { product, limit } => client.related(product, *limit).await,
        }
    }
}

/// What the consuming view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// A fetch is in flight.
    pub loading: bool,
    /// Last successful result, empty after a failure.
    pub products: Vec<Product>,
    /// Message of the last failure.
    pub error: Option<String>,
    generation: u64,
}

impl FeedState {
    /// Generation of the request this state belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// A cancellable product fetch bound to one view.
pub struct ProductFeed {
    client: CatalogClient,
    tx: Arc<watch::Sender<FeedState>>,
    rx: watch::Receiver<FeedState>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl ProductFeed {
    /// Create an idle feed.
    #[must_use]
    pub fn new(client: CatalogClient) -> Self {
        let (tx, rx) = watch::channel(FeedState::default());
        Self {
            client,
            tx: Arc::new(tx),
            rx,
            generation: 0,
            task: None,
        }
    }

    /// Watch state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.rx.clone()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.rx.borrow().clone()
    }

    /// Start fetching `request`, superseding any fetch in flight.
    ///
    /// Must be called within a tokio runtime.
    pub fn load(&mut self, request: FeedRequest) {
        let generation = self.supersede();
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.generation = generation;
        });

        let client = self.client.clone();
        let tx = Arc::clone(&self.tx);
        self.task = Some(tokio::spawn(async move {
            let result = request.fetch(&client).await;
            publish(&tx, generation, result);
        }));
        debug!(generation, "Feed load started");
    }

    /// Abandon the fetch in flight, keeping the last published products.
    pub fn cancel(&mut self) {
        let generation = self.supersede();
        self.tx.send_modify(|state| {
            state.loading = false;
            state.generation = generation;
        });
    }

    /// Wait until no fetch is in flight and return the settled state.
    pub async fn settled(&self) -> FeedState {
        let mut rx = self.rx.clone();
        let settled = rx.wait_for(|state| !state.loading).await.map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// Abort the current task and move to a new generation.
    fn supersede(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
        self.generation
    }
}

impl Drop for ProductFeed {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Apply a finished fetch if it still belongs to the current generation.
fn publish(
    tx: &watch::Sender<FeedState>,
    generation: u64,
    result: Result<Vec<Product>, CatalogError>,
) {
    tx.send_if_modified(|state| {
        if state.generation != generation {
            debug!(generation, current = state.generation, "Discarding stale feed result");
            return false;
        }
        state.loading = false;
        match result {
            Ok(products) => {
                debug!(generation, count = products.len(), "Feed loaded");
                state.products = products;
                state.error = None;
            }
            Err(e) => {
                warn!(generation, error = %e, "Feed load failed");
                state.products.clear();
                state.error = Some(e.to_string());
            }
        }
        true
    });
}
