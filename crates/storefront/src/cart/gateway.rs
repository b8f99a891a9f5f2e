//! Remote cart gateway.
//!
//! One method per Shopify cart query or mutation. Each call is independent and
//! stateless beyond the cart ID; nothing is cached or computed locally.

use std::future::Future;

use crate::shopify::{Cart, CartLineInput, CartLineUpdateInput, ShopifyError, StorefrontClient};

/// Cart operations against the commerce backend.
pub trait CartGateway: Send + Sync {
    /// Fetch a cart; `Ok(None)` when the remote no longer knows it.
    fn fetch(
        &self,
        cart_id: &str,
    ) -> impl Future<Output = Result<Option<Cart>, ShopifyError>> + Send;

    /// Create a cart seeded with `lines` (may be empty).
    fn create(
        &self,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    /// Add lines to an existing cart.
    fn add_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    /// Update quantities of existing lines.
    fn update_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    /// Remove lines by ID.
    fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;

    /// Replace the entire discount-code set.
    fn replace_discount_codes(
        &self,
        cart_id: &str,
        codes: Vec<String>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send;
}

impl CartGateway for StorefrontClient {
    fn fetch(
        &self,
        cart_id: &str,
    ) -> impl Future<Output = Result<Option<Cart>, ShopifyError>> + Send {
        self.get_cart(cart_id)
    }

    fn create(
        &self,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        self.create_cart(lines)
    }

    fn add_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        self.add_to_cart(cart_id, lines)
    }

    fn update_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        self.update_cart(cart_id, lines)
    }

    fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        self.remove_from_cart(cart_id, line_ids)
    }

    fn replace_discount_codes(
        &self,
        cart_id: &str,
        codes: Vec<String>,
    ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
        self.update_discount_codes(cart_id, codes)
    }
}
