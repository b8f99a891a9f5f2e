//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//!
//! # Cart
//! GET    /api/cart                        - Current cart or {"cart": null}
//! DELETE /api/cart                        - Forget the cart ID
//! POST   /api/cart/lines                  - Add to cart (creates the cart if needed)
//! PATCH  /api/cart/lines                  - Update a line quantity
//! POST   /api/cart/lines/remove           - Remove lines
//! PUT    /api/cart/discount-codes         - Replace discount codes
//!
//! # Checkout
//! GET    /checkout                        - 303 to the checkout permalink
//! POST   /api/checkout/permalink          - Permalink for explicit lines
//!
//! # Promotions
//! GET    /api/promotions                  - Cached {hasActivePromos, promos}
//! GET    /api/promotions/header           - {showPromo}
//! GET    /api/discounts                   - Cached discount listing
//!
//! # Cache invalidation
//! POST   /api/webhooks/shopify/discounts  - HMAC verified, purges promotions
//! POST   /api/webhooks/shopify/products   - HMAC verified, drops a product
//! POST   /api/webhooks/shopify/collections - HMAC verified, drops a collection
//! POST   /api/revalidate                  - Secret checked, purges a tag
//!
//! # Catalog
//! GET    /api/products                    - ?first, ?after, ?q, ?sort, ?reverse
//! GET    /api/products/{handle}           - Product plus hasDeal
//! GET    /api/collections                 - ?first, ?after, ?q
//! GET    /api/collections/{handle}        - ?first, ?after
//! GET    /api/menu/{handle}
//!
//! # Sitemaps
//! GET    /sitemap.xml, /sitemap-pages.xml, /sitemap-products.xml, /sitemap-collections.xml
//! ```

pub mod cart;
pub mod catalog;
pub mod promotions;
pub mod sitemap;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::{relaxed_rate_limiter, strict_rate_limiter};
use crate::state::AppState;

/// Liveness health check. Does not check Shopify.
pub async fn health() -> &'static str {
    "ok"
}

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(cart::show).delete(cart::forget))
        .route("/api/cart/lines", post(cart::add_line).patch(cart::update_line))
        .route("/api/cart/lines/remove", post(cart::remove_lines))
        .route("/api/cart/discount-codes", put(cart::discount_codes))
        .route("/api/checkout/permalink", post(cart::permalink))
}

/// Create the webhook and revalidate routes router.
pub fn invalidation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/webhooks/shopify/discounts", post(webhooks::discounts))
        .route("/api/webhooks/shopify/products", post(webhooks::products))
        .route("/api/webhooks/shopify/collections", post(webhooks::collections))
        .route("/api/revalidate", post(webhooks::revalidate))
}

/// Create the read-only routes router.
pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/checkout", get(cart::checkout))
        .route("/api/promotions", get(promotions::summary))
        .route("/api/promotions/header", get(promotions::header))
        .route("/api/discounts", get(promotions::discounts))
        .route("/api/products", get(catalog::products))
        .route("/api/products/{handle}", get(catalog::product))
        .route("/api/collections", get(catalog::collections))
        .route("/api/collections/{handle}", get(catalog::collection))
        .route("/api/menu/{handle}", get(catalog::menu))
        .route("/sitemap.xml", get(sitemap::index))
        .route("/sitemap-pages.xml", get(sitemap::pages))
        .route("/sitemap-products.xml", get(sitemap::products))
        .route("/sitemap-collections.xml", get(sitemap::collections))
}

/// Create all routes for the storefront, without rate limiting.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(cart_routes())
        .merge(invalidation_routes())
}

/// Create all routes with per-group rate limits.
///
/// Limiters key on proxy client-IP headers, so this is only for the deployed
/// binary.
pub fn rate_limited_routes() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(cart_routes().layer(relaxed_rate_limiter()))
        .merge(invalidation_routes().layer(strict_rate_limiter()))
}
