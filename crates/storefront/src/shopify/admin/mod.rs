//! Shopify Admin API client.
//!
//! Read access to discounts (for the promotions banner) and variant price
//! updates. Authenticated with a custom-app access token sent as
//! `X-Shopify-Access-Token`.

pub mod queries;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use shopfront_core::{Promotion, PromotionKind};
use tracing::{debug, instrument};

use crate::config::ShopifyConfig;
use crate::shopify::ShopifyError;
use crate::shopify::transport::GraphQLTransport;

use queries::{DiscountNodes, UpdateVariantPrice, discount_nodes, update_variant_price};

/// Discounts requested per page.
const DISCOUNT_PAGE_SIZE: i64 = 100;

/// Upper bound on discount pages fetched per listing.
const DISCOUNT_MAX_PAGES: usize = 50;

/// Search filter for currently running discounts.
const ACTIVE_DISCOUNTS_QUERY: &str = "status:active";

/// Discount lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountStatus {
    /// Discount is active.
    Active,
    /// Discount is expired.
    Expired,
    /// Discount is scheduled.
    Scheduled,
}

/// A discount as listed by the Admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Discount node ID.
    pub id: String,
    /// GraphQL type name (e.g. `DiscountAutomaticBasic`).
    pub typename: String,
    /// Classification derived from the type name.
    pub kind: PromotionKind,
    /// Merchant-facing title.
    pub title: String,
    /// Customer-facing summary, when Shopify provides one.
    pub summary: Option<String>,
    /// Lifecycle status.
    pub status: Option<DiscountStatus>,
    /// Start of the discount window.
    pub starts_at: Option<DateTime<Utc>>,
    /// End of the discount window.
    pub ends_at: Option<DateTime<Utc>>,
}

impl Discount {
    /// Banner view of this discount.
    #[must_use]
    pub fn to_promotion(&self) -> Promotion {
        Promotion {
            kind: self.kind,
            title: self.title.clone(),
            summary: self.summary.clone(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}

impl From<discount_nodes::DiscountNode> for Discount {
    fn from(node: discount_nodes::DiscountNode) -> Self {
        let fields = node.discount;
        Self {
            id: node.id,
            kind: PromotionKind::from_discount_typename(&fields.typename),
            typename: fields.typename,
            title: fields.title.unwrap_or_default(),
            summary: fields.summary.filter(|s| !s.trim().is_empty()),
            status: fields.status,
            starts_at: fields.starts_at,
            ends_at: fields.ends_at,
        }
    }
}

/// A variant's prices after an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    /// Variant ID.
    pub id: String,
    /// Current price.
    pub price: String,
    /// Compare-at price.
    pub compare_at_price: Option<String>,
}

/// Client for the Shopify Admin GraphQL API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<GraphQLTransport>,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self::with_endpoint(config.admin_endpoint(), config.admin_access_token.clone())
    }

    /// Create a client against an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            inner: Arc::new(GraphQLTransport::new(
                endpoint,
                "X-Shopify-Access-Token",
                access_token,
            )),
        }
    }

    /// Currently active discounts as banner promotions.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self))]
    pub async fn active_discounts(&self) -> Result<Vec<Promotion>, ShopifyError> {
        let discounts = self
            .list_discounts(Some(ACTIVE_DISCOUNTS_QUERY.to_string()))
            .await?;
        Ok(discounts.iter().map(Discount::to_promotion).collect())
    }

    /// Every discount regardless of status.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self))]
    pub async fn all_discounts(&self) -> Result<Vec<Discount>, ShopifyError> {
        self.list_discounts(None).await
    }

    async fn list_discounts(&self, query: Option<String>) -> Result<Vec<Discount>, ShopifyError> {
        let mut discounts = Vec::new();
        let mut after = None;

        for _ in 0..DISCOUNT_MAX_PAGES {
            let variables = discount_nodes::Variables {
                first: DISCOUNT_PAGE_SIZE,
                after: after.take(),
                query: query.clone(),
            };
            let page = self
                .inner
                .execute::<DiscountNodes>(variables)
                .await?
                .discount_nodes;

            discounts.extend(page.nodes.into_iter().map(Discount::from));
            match page.page_info.end_cursor {
                Some(cursor) if page.page_info.has_next_page => after = Some(cursor),
                _ => break,
            }
        }

        debug!(count = discounts.len(), "Listed discounts");
        Ok(discounts)
    }

    /// Set a variant's price, and its compare-at price when given.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if Shopify rejects the input, or an error if the
    /// API request fails.
    #[instrument(skip(self), fields(product_id = %product_id, variant_id = %variant_id))]
    pub async fn update_variant_price(
        &self,
        product_id: &str,
        variant_id: &str,
        price: &str,
        compare_at_price: Option<&str>,
    ) -> Result<VariantPrice, ShopifyError> {
        let variables = update_variant_price::Variables {
            product_id: product_id.to_string(),
            variants: vec![update_variant_price::ProductVariantsBulkInput {
                id: variant_id.to_string(),
                price: price.to_string(),
                compare_at_price: compare_at_price.map(String::from),
            }],
        };

        let data = self.inner.execute::<UpdateVariantPrice>(variables).await?;

        let payload = data
            .product_variants_bulk_update
            .ok_or_else(|| ShopifyError::graphql("Failed to update variant price"))?;

        if let Some(err) = ShopifyError::from_user_errors(&payload.user_errors) {
            return Err(err);
        }

        payload
            .product_variants
            .unwrap_or_default()
            .into_iter()
            .find(|v| v.id == variant_id)
            .map(|v| VariantPrice {
                id: v.id,
                price: v.price,
                compare_at_price: v.compare_at_price,
            })
            .ok_or_else(|| ShopifyError::NotFound(format!("Variant not found: {variant_id}")))
    }
}
