//! Deal detection for products and the site header.

use std::future::Future;

use shopfront_core::compare_at_exceeds;
use tracing::{instrument, warn};

use super::{PromotionSource, Promotions};
use crate::shopify::{Product, ShopifyError, StorefrontClient};

/// Products scanned in the deals collection.
pub const DEALS_SCAN_LIMIT: i64 = 50;

/// Whether a product is marked down.
///
/// True when the product-level compare-at minimum exceeds the minimum price,
/// or any variant's compare-at price exceeds its price. Missing compare-at
/// prices never count.
#[must_use]
pub fn product_has_deal(product: &Product) -> bool {
    let product_level = product.compare_at_price_range.as_ref().is_some_and(|range| {
        compare_at_exceeds(
            &product.price_range.min_variant_price.amount,
            Some(&range.min_variant_price.amount),
        )
    });

    product_level
        || product.variants.iter().any(|variant| {
            compare_at_exceeds(
                &variant.price.amount,
                variant.compare_at_price.as_ref().map(|m| m.amount.as_str()),
            )
        })
}

/// Catalog access needed for header detection.
pub trait DealCatalog: Send + Sync {
    /// Products in a collection (first page).
    fn collection_products(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send;
}

impl DealCatalog for StorefrontClient {
    async fn collection_products(&self, handle: &str) -> Result<Vec<Product>, ShopifyError> {
        let collection = self
            .get_collection_by_handle(handle, DEALS_SCAN_LIMIT, None)
            .await?;
        Ok(collection.products)
    }
}

/// Whether the header should show the promo treatment.
///
/// Active promotions win outright. Otherwise, when a deals collection is
/// configured, any product in it with a deal counts. Every failure reads as
/// `false`.
#[instrument(skip(promotions, catalog))]
pub async fn header_promo_active<S, C>(
    promotions: &Promotions<S>,
    catalog: &C,
    deals_collection: Option<&str>,
) -> bool
where
    S: PromotionSource,
    C: DealCatalog,
{
    if promotions.summary().await.has_active_promos {
        return true;
    }

    let Some(handle) = deals_collection else {
        return false;
    };

    match catalog.collection_products(handle).await {
        Ok(products) => products.iter().any(product_has_deal),
        Err(e) => {
            warn!(error = %e, handle = %handle, "Failed to scan deals collection");
            false
        }
    }
}
