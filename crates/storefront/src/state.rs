//! Storefront session state.

use std::sync::Arc;

use shophub_core::{CheckoutForm, Product, ProductId};

use crate::catalog::{CatalogClient, ProductFeed};
use crate::checkout::{CheckoutError, OrderConfirmation, place_order};
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::storage::{FileStore, KeyValueStore};
use crate::stores::{CartStore, FilterStore, WishlistStore};

/// Everything one shopper session needs: configuration, the catalog client
/// and the three stores.
///
/// Stores are mutated through `&mut self`, so a session has a single writer.
pub struct Storefront {
    config: StorefrontConfig,
    catalog: CatalogClient,
    cart: CartStore,
    wishlist: WishlistStore,
    filters: FilterStore,
}

impl Storefront {
    /// Open a session persisting to `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built or a persisted
    /// record is unreadable.
    pub fn open(config: StorefrontConfig) -> Result<Self, AppError> {
        let storage = Arc::new(FileStore::new(&config.data_dir));
        Self::with_storage(config, storage)
    }

    /// Open a session on an explicit storage backend.
    ///
    /// # Errors
    ///
    /// See [`Storefront::open`].
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, AppError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let cart = CartStore::open(Arc::clone(&storage), config.promo_policy.clone())?;
        let wishlist = WishlistStore::open(storage)?;

        tracing::info!(
            catalog = %config.catalog.base_url,
            cart_lines = cart.cart().lines().len(),
            wishlist = wishlist.wishlist().len(),
            "Storefront session opened"
        );

        Ok(Self {
            config,
            catalog,
            cart,
            wishlist,
            filters: FilterStore::new(),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Returns the catalog client.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// A new feed on this session's catalog.
    #[must_use]
    pub fn feed(&self) -> ProductFeed {
        ProductFeed::new(self.catalog.clone())
    }

    /// Returns the cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Returns the cart store for mutation.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Returns the wishlist store.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// Returns the wishlist store for mutation.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    /// Returns the listing filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterStore {
        &self.filters
    }

    /// Returns the listing filters for mutation.
    pub const fn filters_mut(&mut self) -> &mut FilterStore {
        &mut self.filters
    }

    /// Like or unlike a product by id.
    ///
    /// A liked product is removed using its saved snapshot, so the catalog is
    /// only consulted when adding. Returns the product and whether it is in
    /// the wishlist afterwards.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if the product must be fetched and cannot be,
    /// or a store error if the wishlist cannot be persisted.
    pub async fn toggle_wishlist(&mut self, id: ProductId) -> Result<(Product, bool), AppError> {
        let saved = self
            .wishlist
            .wishlist()
            .items()
            .iter()
            .find(|p| p.id == id)
            .cloned();
        let product = match saved {
            Some(product) => product,
            None => self.catalog.get_product(id).await?,
        };
        let liked = self.wishlist.toggle_wishlist(product.clone())?;
        Ok((product, liked))
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// See [`place_order`].
    pub fn place_order(&mut self, form: &CheckoutForm) -> Result<OrderConfirmation, CheckoutError> {
        place_order(&mut self.cart, form)
    }
}
