//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartActions;
use crate::config::StorefrontConfig;
use crate::promotions::Promotions;
use crate::shopify::{AdminClient, StorefrontClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The Admin client lives inside the promotions
/// cache; the Storefront client is shared with the cart façade.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    cart: CartActions<StorefrontClient>,
    promotions: Promotions<AdminClient>,
}

impl AppState {
    /// Create the application state, building both Shopify clients from
    /// `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        let admin = AdminClient::new(&config.shopify);
        Self::from_parts(config, storefront, admin)
    }

    /// Create the application state from pre-built clients.
    ///
    /// Tests point the clients at a mock server this way.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        storefront: StorefrontClient,
        admin: AdminClient,
    ) -> Self {
        let cart = CartActions::new(storefront.clone());
        let promotions = Promotions::new(admin, config.promotions.cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                cart,
                promotions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Cart action façade.
    #[must_use]
    pub fn cart(&self) -> &CartActions<StorefrontClient> {
        &self.inner.cart
    }

    /// Cached promotions.
    #[must_use]
    pub fn promotions(&self) -> &Promotions<AdminClient> {
        &self.inner.promotions
    }
}
