//! Shopify Storefront API client implementation.
//!
//! Catalog reads (products, collections, menus) are cached using `moka`
//! (5-minute TTL). Cart operations and sitemap listings always hit Shopify.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::{ShopifyConfig, StorefrontToken};
use crate::shopify::ShopifyError;
use crate::shopify::transport::GraphQLTransport;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, CollectionConnection, Menu, Product,
    ProductConnection, ProductSortKey, SitemapRecord, UserError,
};

use cache::{CacheKey, CacheValue};
use conversions::{convert_collection_connection, convert_product_connection};
use queries::{
    AddToCart, CartPayload, CreateCart, GetCart, GetCollectionByHandle, GetCollections, GetMenu,
    GetProductByHandle, GetProducts, RemoveFromCart, SitemapCollections, SitemapProducts,
    UpdateCartDiscountCodes, UpdateCartLines, add_to_cart, create_cart, get_cart,
    get_collection_by_handle, get_collections, get_menu, get_product_by_handle, get_products,
    remove_from_cart, sitemap_collections, sitemap_products, update_cart_discount_codes,
    update_cart_lines,
};

/// Page size for sitemap listings (Storefront API maximum).
const SITEMAP_PAGE_SIZE: i64 = 250;

/// Upper bound on sitemap pages fetched per listing.
const SITEMAP_MAX_PAGES: usize = 200;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides type-safe access to products, collections, menus, and cart
/// operations. Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    transport: GraphQLTransport,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self::with_endpoint(
            config.storefront_endpoint(),
            config.storefront_token.clone(),
        )
    }

    /// Create a client against an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, token: StorefrontToken) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .support_invalidation_closures()
            .build();

        let header = token.header_name();
        let transport = GraphQLTransport::new(endpoint, header, token.secret().clone());

        Self {
            inner: Arc::new(StorefrontClientInner { transport, cache }),
        }
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.inner.transport.endpoint()
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = CacheKey::Product(handle.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = get_product_by_handle::Variables {
            handle: handle.to_string(),
        };

        let data = self
            .inner
            .transport
            .execute::<GetProductByHandle>(variables)
            .await?;

        let product = data
            .product
            .map(Product::from)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated list of products.
    ///
    /// Search queries bypass the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: i64,
        after: Option<String>,
        query: Option<String>,
        sort_key: Option<ProductSortKey>,
        reverse: Option<bool>,
    ) -> Result<ProductConnection, ShopifyError> {
        let cache_key = CacheKey::Products {
            first,
            cursor: after.clone(),
            sort_key,
            reverse,
        };

        if query.is_none()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let cacheable = query.is_none();
        let variables = get_products::Variables {
            first,
            after,
            query,
            sort_key,
            reverse,
        };

        let data = self.inner.transport.execute::<GetProducts>(variables).await?;
        let connection = convert_product_connection(data.products);

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get a collection by its handle, with one page of its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(
        &self,
        handle: &str,
        product_count: i64,
        after: Option<String>,
    ) -> Result<Collection, ShopifyError> {
        let cache_key = CacheKey::Collection {
            handle: handle.to_string(),
            product_count,
            cursor: after.clone(),
        };

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let variables = get_collection_by_handle::Variables {
            handle: handle.to_string(),
            product_count,
            after,
        };

        let data = self
            .inner
            .transport
            .execute::<GetCollectionByHandle>(variables)
            .await?;

        let collection = data
            .collection
            .map(Collection::from)
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    /// Get a paginated list of collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(
        &self,
        first: i64,
        after: Option<String>,
        query: Option<String>,
    ) -> Result<CollectionConnection, ShopifyError> {
        let cache_key = CacheKey::Collections {
            first,
            cursor: after.clone(),
        };
        let cacheable = query.is_none();

        if cacheable
            && let Some(CacheValue::Collections(collections)) =
                self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let variables = get_collections::Variables {
            first,
            after,
            query,
        };

        let data = self
            .inner
            .transport
            .execute::<GetCollections>(variables)
            .await?;
        let connection = convert_collection_connection(data.collections);

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Collections(connection.clone()))
                .await;
        }

        Ok(connection)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Get a navigation menu by handle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the menu does not exist, or an error if the API
    /// request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_menu(&self, handle: &str) -> Result<Menu, ShopifyError> {
        let cache_key = CacheKey::Menu(handle.to_string());

        if let Some(CacheValue::Menu(menu)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu");
            return Ok(menu);
        }

        let variables = get_menu::Variables {
            handle: handle.to_string(),
        };
        let data = self.inner.transport.execute::<GetMenu>(variables).await?;

        let menu = data
            .menu
            .ok_or_else(|| ShopifyError::NotFound(format!("Menu not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Menu(menu.clone()))
            .await;

        Ok(menu)
    }

    // =========================================================================
    // Sitemap listings (not cached - walked rarely, in full)
    // =========================================================================

    /// Every product handle with its last update time.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self))]
    pub async fn sitemap_products(&self) -> Result<Vec<SitemapRecord>, ShopifyError> {
        let mut records = Vec::new();
        let mut after = None;

        for _ in 0..SITEMAP_MAX_PAGES {
            let variables = sitemap_products::Variables {
                first: SITEMAP_PAGE_SIZE,
                after: after.take(),
            };
            let page = self
                .inner
                .transport
                .execute::<SitemapProducts>(variables)
                .await?
                .products;

            records.extend(page.nodes);
            match page.page_info.end_cursor {
                Some(cursor) if page.page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }

        debug!(count = records.len(), "Listed products for sitemap");
        Ok(records)
    }

    /// Every collection handle with its last update time.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self))]
    pub async fn sitemap_collections(&self) -> Result<Vec<SitemapRecord>, ShopifyError> {
        let mut records = Vec::new();
        let mut after = None;

        for _ in 0..SITEMAP_MAX_PAGES {
            let variables = sitemap_collections::Variables {
                first: SITEMAP_PAGE_SIZE,
                after: after.take(),
            };
            let page = self
                .inner
                .transport
                .execute::<SitemapCollections>(variables)
                .await?
                .collections;

            records.extend(page.nodes);
            match page.page_info.end_cursor {
                Some(cursor) if page.page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }

        debug!(count = records.len(), "Listed collections for sitemap");
        Ok(records)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get an existing cart.
    ///
    /// Returns `Ok(None)` when Shopify no longer knows the cart (expired,
    /// completed, or never existed).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.to_string(),
        };

        let data = self.inner.transport.execute::<GetCart>(variables).await?;

        Ok(data.cart.map(Cart::from))
    }

    /// Create a new cart, seeded with `lines` (may be empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            input: create_cart::CartInput { lines, note: None },
        };

        let data = self.inner.transport.execute::<CreateCart>(variables).await?;

        cart_from_payload(data.cart_create, "Failed to create cart")
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.to_string(),
            lines,
        };

        let data = self.inner.transport.execute::<AddToCart>(variables).await?;

        cart_from_payload(data.cart_lines_add, "Failed to add to cart")
    }

    /// Update cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = update_cart_lines::Variables {
            cart_id: cart_id.to_string(),
            lines,
        };

        let data = self
            .inner
            .transport
            .execute::<UpdateCartLines>(variables)
            .await?;

        cart_from_payload(data.cart_lines_update, "Failed to update cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = remove_from_cart::Variables {
            cart_id: cart_id.to_string(),
            line_ids,
        };

        let data = self
            .inner
            .transport
            .execute::<RemoveFromCart>(variables)
            .await?;

        cart_from_payload(data.cart_lines_remove, "Failed to remove from cart")
    }

    /// Replace the discount codes on a cart. An empty list clears them.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn update_discount_codes(
        &self,
        cart_id: &str,
        discount_codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = update_cart_discount_codes::Variables {
            cart_id: cart_id.to_string(),
            discount_codes,
        };

        let data = self
            .inner
            .transport
            .execute::<UpdateCartDiscountCodes>(variables)
            .await?;

        cart_from_payload(
            data.cart_discount_codes_update,
            "Failed to update discount codes",
        )
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, handle: &str) {
        self.inner
            .cache
            .invalidate(&CacheKey::Product(handle.to_string()))
            .await;
    }

    /// Invalidate every cached page of a collection.
    pub fn invalidate_collection(&self, handle: &str) {
        let handle = handle.to_string();
        let result = self.inner.cache.invalidate_entries_if(move |key, _| {
            matches!(key, CacheKey::Collection { handle: cached, .. } if *cached == handle)
        });
        if let Err(e) = result {
            tracing::warn!(error = ?e, "Failed to invalidate cached collection");
        }
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Resolve a cart mutation payload: user errors win, then the cart, else a
/// generic failure.
///
/// A user error on the `cartId` input means Shopify no longer knows the cart
/// and maps to `NotFound`.
fn cart_from_payload(payload: Option<CartPayload>, failure: &str) -> Result<Cart, ShopifyError> {
    if let Some(result) = payload {
        if let Some(missing) = result.user_errors.iter().find(|e| is_cart_id_error(e)) {
            return Err(ShopifyError::NotFound(missing.message.clone()));
        }
        if let Some(err) = ShopifyError::from_user_errors(&result.user_errors) {
            return Err(err);
        }

        if let Some(cart) = result.cart {
            return Ok(Cart::from(cart));
        }
    }

    Err(ShopifyError::graphql(failure))
}

fn is_cart_id_error(error: &UserError) -> bool {
    error
        .field
        .as_ref()
        .and_then(|field| field.first())
        .is_some_and(|name| name == "cartId")
}
