//! Cart action façade.
//!
//! The operations the HTTP layer calls. All of them are single remote calls
//! except [`CartActions::add_to_cart`] without a cart, which runs a two-step
//! saga (create, then add) with one compensating action (create with the line
//! already in it). That path is best-effort, not exactly-once: a retried call
//! whose first response was lost can add the line twice.

use tracing::{instrument, warn};

use super::gateway::CartGateway;
use crate::shopify::{Cart, CartLineInput, CartLineUpdateInput, ShopifyError};

/// Cart actions over a [`CartGateway`].
#[derive(Clone)]
pub struct CartActions<G> {
    gateway: G,
}

impl<G: CartGateway> CartActions<G> {
    /// Wrap a gateway.
    #[must_use]
    pub const fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// The underlying gateway.
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Get a cart. A cart Shopify reports as missing or expired is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than not-found.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>, ShopifyError> {
        match self.gateway.fetch(cart_id).await {
            Ok(cart) => Ok(cart),
            Err(ShopifyError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Add a variant to the cart, creating the cart when there is none.
    ///
    /// # Errors
    ///
    /// With a cart ID, the add-lines error. Without one, the error of the
    /// compensating create-with-line call.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        cart_id: Option<&str>,
        variant_id: &str,
        quantity: i64,
    ) -> Result<Cart, ShopifyError> {
        let line = CartLineInput::new(variant_id, quantity);

        if let Some(cart_id) = cart_id {
            return self.gateway.add_lines(cart_id, vec![line]).await;
        }

        match self.create_then_add(line.clone()).await {
            Ok(cart) => Ok(cart),
            Err(e) => {
                warn!(error = %e, "Create-then-add failed, creating cart with line");
                self.gateway.create(vec![line]).await
            }
        }
    }

    async fn create_then_add(&self, line: CartLineInput) -> Result<Cart, ShopifyError> {
        let cart = self.gateway.create(Vec::new()).await?;
        self.gateway.add_lines(&cart.id, vec![line]).await
    }

    /// Set the quantity of a line. Zero removes it (Shopify semantics).
    ///
    /// # Errors
    ///
    /// Returns the remote error unchanged.
    #[instrument(skip(self))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        line_id: &str,
        quantity: i64,
    ) -> Result<Cart, ShopifyError> {
        let update = CartLineUpdateInput {
            id: line_id.to_string(),
            quantity: Some(quantity),
            merchandise_id: None,
            attributes: None,
        };
        self.gateway.update_lines(cart_id, vec![update]).await
    }

    /// Remove lines from the cart.
    ///
    /// # Errors
    ///
    /// Returns the remote error unchanged.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        self.gateway.remove_lines(cart_id, line_ids).await
    }

    /// Replace the cart's discount codes with exactly `codes`.
    ///
    /// Not additive: the caller passes the full desired set, and an empty set
    /// clears every code. Blank entries are dropped.
    ///
    /// # Errors
    ///
    /// Remote `userErrors` propagate, and so does a requested code Shopify
    /// kept on the cart but marked not applicable.
    #[instrument(skip(self))]
    pub async fn apply_discount_codes(
        &self,
        cart_id: &str,
        codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let codes: Vec<String> = codes
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let cart = self
            .gateway
            .replace_discount_codes(cart_id, codes.clone())
            .await?;

        let rejected: Vec<&str> = cart
            .discount_codes
            .iter()
            .filter(|dc| !dc.applicable && codes.iter().any(|c| c.eq_ignore_ascii_case(&dc.code)))
            .map(|dc| dc.code.as_str())
            .collect();

        if rejected.is_empty() {
            Ok(cart)
        } else {
            Err(ShopifyError::UserError(format!(
                "Discount code not applicable: {}",
                rejected.join(", ")
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;

    use super::*;
    use crate::shopify::{CartCost, CartDiscountCode, Money};

    fn test_cart(id: &str) -> Cart {
        let zero = Money {
            amount: "0.0".to_string(),
            currency_code: "USD".to_string(),
        };
        Cart {
            id: id.to_string(),
            checkout_url: format!("https://shop.example.test/cart/c/{id}"),
            note: None,
            total_quantity: 0,
            cost: CartCost {
                subtotal_amount: zero.clone(),
                total_amount: zero,
                total_tax_amount: None,
            },
            discount_codes: vec![],
            lines: vec![],
        }
    }

    /// Scripted gateway: each method pops its next result and records the call.
    #[derive(Default)]
    struct ScriptedGateway {
        calls: Mutex<Vec<String>>,
        fetch_results: Mutex<VecDeque<Result<Option<Cart>, ShopifyError>>>,
        create_results: Mutex<VecDeque<Result<Cart, ShopifyError>>>,
        add_results: Mutex<VecDeque<Result<Cart, ShopifyError>>>,
        discount_results: Mutex<VecDeque<Result<Cart, ShopifyError>>>,
    }

    impl ScriptedGateway {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn next<T>(queue: &Mutex<VecDeque<Result<T, ShopifyError>>>) -> Result<T, ShopifyError> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ShopifyError::graphql("unscripted call")))
        }
    }

    impl CartGateway for ScriptedGateway {
        fn fetch(
            &self,
            cart_id: &str,
        ) -> impl Future<Output = Result<Option<Cart>, ShopifyError>> + Send {
            self.record(format!("fetch:{cart_id}"));
            let result = Self::next(&self.fetch_results);
            async move { result }
        }

        fn create(
            &self,
            lines: Vec<CartLineInput>,
        ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
            self.record(format!("create:{}", lines.len()));
            let result = Self::next(&self.create_results);
            async move { result }
        }

        fn add_lines(
            &self,
            cart_id: &str,
            lines: Vec<CartLineInput>,
        ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
            let quantities: Vec<String> = lines.iter().map(|l| l.quantity.to_string()).collect();
            self.record(format!("add:{cart_id}:{}", quantities.join(",")));
            let result = Self::next(&self.add_results);
            async move { result }
        }

        fn update_lines(
            &self,
            cart_id: &str,
            lines: Vec<CartLineUpdateInput>,
        ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
            self.record(format!("update:{cart_id}:{}", lines.len()));
            let cart = test_cart(cart_id);
            async move { Ok(cart) }
        }

        fn remove_lines(
            &self,
            cart_id: &str,
            line_ids: Vec<String>,
        ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
            self.record(format!("remove:{cart_id}:{}", line_ids.join(",")));
            let cart = test_cart(cart_id);
            async move { Ok(cart) }
        }

        fn replace_discount_codes(
            &self,
            cart_id: &str,
            codes: Vec<String>,
        ) -> impl Future<Output = Result<Cart, ShopifyError>> + Send {
            self.record(format!("discounts:{cart_id}:{}", codes.join(",")));
            let result = Self::next(&self.discount_results);
            async move { result }
        }
    }

    fn actions(gateway: ScriptedGateway) -> CartActions<ScriptedGateway> {
        CartActions::new(gateway)
    }

    #[tokio::test]
    async fn test_get_cart_not_found_is_none() {
        let gateway = ScriptedGateway::default();
        gateway
            .fetch_results
            .lock()
            .unwrap()
            .push_back(Err(ShopifyError::NotFound("cart".to_string())));
        gateway.fetch_results.lock().unwrap().push_back(Ok(None));
        let actions = actions(gateway);

        assert!(actions.get_cart("gid://shopify/Cart/1").await.unwrap().is_none());
        assert!(actions.get_cart("gid://shopify/Cart/1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_cart_other_errors_propagate() {
        let gateway = ScriptedGateway::default();
        gateway
            .fetch_results
            .lock()
            .unwrap()
            .push_back(Err(ShopifyError::RateLimited(2)));
        let actions = actions(gateway);

        let err = actions.get_cart("gid://shopify/Cart/1").await.unwrap_err();
        assert!(matches!(err, ShopifyError::RateLimited(2)));
    }

    #[tokio::test]
    async fn test_add_with_cart_id_delegates_to_add_lines() {
        let gateway = ScriptedGateway::default();
        gateway
            .add_results
            .lock()
            .unwrap()
            .push_back(Ok(test_cart("gid://shopify/Cart/1")));
        let actions = actions(gateway);

        let cart = actions
            .add_to_cart(Some("gid://shopify/Cart/1"), "gid://shopify/ProductVariant/9", 1)
            .await
            .unwrap();

        assert_eq!(cart.id, "gid://shopify/Cart/1");
        assert_eq!(actions.gateway().calls(), vec!["add:gid://shopify/Cart/1:1"]);
    }

    #[tokio::test]
    async fn test_add_without_cart_creates_then_adds() {
        let gateway = ScriptedGateway::default();
        gateway
            .create_results
            .lock()
            .unwrap()
            .push_back(Ok(test_cart("gid://shopify/Cart/new")));
        gateway
            .add_results
            .lock()
            .unwrap()
            .push_back(Ok(test_cart("gid://shopify/Cart/new")));
        let actions = actions(gateway);

        let cart = actions
            .add_to_cart(None, "gid://shopify/ProductVariant/9", 2)
            .await
            .unwrap();

        assert_eq!(cart.id, "gid://shopify/Cart/new");
        assert_eq!(
            actions.gateway().calls(),
            vec!["create:0", "add:gid://shopify/Cart/new:2"]
        );
    }

    #[tokio::test]
    async fn test_failed_create_falls_back_to_create_with_line() {
        let gateway = ScriptedGateway::default();
        {
            let mut creates = gateway.create_results.lock().unwrap();
            creates.push_back(Err(ShopifyError::graphql("Failed to create cart")));
            creates.push_back(Ok(test_cart("gid://shopify/Cart/fallback")));
        }
        let actions = actions(gateway);

        let cart = actions
            .add_to_cart(None, "gid://shopify/ProductVariant/9", 2)
            .await
            .unwrap();

        assert_eq!(cart.id, "gid://shopify/Cart/fallback");
        assert_eq!(actions.gateway().calls(), vec!["create:0", "create:1"]);
    }

    #[tokio::test]
    async fn test_failed_add_after_create_falls_back() {
        let gateway = ScriptedGateway::default();
        {
            let mut creates = gateway.create_results.lock().unwrap();
            creates.push_back(Ok(test_cart("gid://shopify/Cart/empty")));
            creates.push_back(Ok(test_cart("gid://shopify/Cart/fallback")));
        }
        gateway
            .add_results
            .lock()
            .unwrap()
            .push_back(Err(ShopifyError::graphql("Failed to add to cart")));
        let actions = actions(gateway);

        let cart = actions
            .add_to_cart(None, "gid://shopify/ProductVariant/9", 1)
            .await
            .unwrap();

        assert_eq!(cart.id, "gid://shopify/Cart/fallback");
        assert_eq!(
            actions.gateway().calls(),
            vec!["create:0", "add:gid://shopify/Cart/empty:1", "create:1"]
        );
    }

    #[tokio::test]
    async fn test_second_failure_propagates() {
        let gateway = ScriptedGateway::default();
        {
            let mut creates = gateway.create_results.lock().unwrap();
            creates.push_back(Err(ShopifyError::graphql("Failed to create cart")));
            creates.push_back(Err(ShopifyError::UserError("Variant is sold out".to_string())));
        }
        let actions = actions(gateway);

        let err = actions
            .add_to_cart(None, "gid://shopify/ProductVariant/9", 2)
            .await
            .unwrap_err();

        assert!(matches!(err, ShopifyError::UserError(ref m) if m == "Variant is sold out"));
        assert_eq!(actions.gateway().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_remove_pass_through() {
        let actions = actions(ScriptedGateway::default());

        actions
            .update_cart("gid://shopify/Cart/1", "gid://shopify/CartLine/1", 3)
            .await
            .unwrap();
        actions
            .remove_from_cart("gid://shopify/Cart/1", vec!["gid://shopify/CartLine/1".to_string()])
            .await
            .unwrap();

        assert_eq!(
            actions.gateway().calls(),
            vec![
                "update:gid://shopify/Cart/1:1",
                "remove:gid://shopify/Cart/1:gid://shopify/CartLine/1"
            ]
        );
    }

    #[tokio::test]
    async fn test_discount_codes_replace_whole_set() {
        let gateway = ScriptedGateway::default();
        let mut cart = test_cart("gid://shopify/Cart/1");
        cart.discount_codes = vec![CartDiscountCode {
            code: "SPRING".to_string(),
            applicable: true,
        }];
        gateway.discount_results.lock().unwrap().push_back(Ok(cart));
        gateway
            .discount_results
            .lock()
            .unwrap()
            .push_back(Ok(test_cart("gid://shopify/Cart/1")));
        let actions = actions(gateway);

        let cart = actions
            .apply_discount_codes("gid://shopify/Cart/1", vec![" SPRING ".to_string(), String::new()])
            .await
            .unwrap();
        assert_eq!(cart.discount_codes.len(), 1);

        let cart = actions
            .apply_discount_codes("gid://shopify/Cart/1", vec![])
            .await
            .unwrap();
        assert!(cart.discount_codes.is_empty());

        assert_eq!(
            actions.gateway().calls(),
            vec![
                "discounts:gid://shopify/Cart/1:SPRING",
                "discounts:gid://shopify/Cart/1:"
            ]
        );
    }

    #[tokio::test]
    async fn test_inapplicable_discount_code_is_an_error() {
        let gateway = ScriptedGateway::default();
        let mut cart = test_cart("gid://shopify/Cart/1");
        cart.discount_codes = vec![CartDiscountCode {
            code: "bogus".to_string(),
            applicable: false,
        }];
        gateway.discount_results.lock().unwrap().push_back(Ok(cart));
        let actions = actions(gateway);

        let err = actions
            .apply_discount_codes("gid://shopify/Cart/1", vec!["BOGUS".to_string()])
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "User error: Discount code not applicable: bogus"
        );
    }

    #[tokio::test]
    async fn test_discount_user_errors_propagate() {
        let gateway = ScriptedGateway::default();
        gateway
            .discount_results
            .lock()
            .unwrap()
            .push_back(Err(ShopifyError::UserError("Invalid discount code".to_string())));
        let actions = actions(gateway);

        let err = actions
            .apply_discount_codes("gid://shopify/Cart/1", vec!["NOPE".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ShopifyError::UserError(_)));
    }
}
