//! Promotions fetch and cache.
//!
//! Active discounts are pulled from the Admin API and cached under a fixed
//! [`CacheTag`] for a multi-minute TTL. There is no per-user or per-region
//! variation. A verified webhook (or the revalidate endpoint) purges a tag
//! early so the next read goes back to Shopify. A missed webhook leaves stale
//! data until the TTL runs out.

pub mod deals;

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use shopfront_core::{Promotion, PromotionsSummary};
use tracing::{debug, instrument, warn};

use crate::shopify::admin::Discount;
use crate::shopify::{AdminClient, ShopifyError};

/// Where promotions come from.
pub trait PromotionSource: Send + Sync {
    /// Discounts currently active, as banner promotions.
    fn active_promotions(
        &self,
    ) -> impl Future<Output = Result<Vec<Promotion>, ShopifyError>> + Send;

    /// Every discount regardless of status.
    fn all_discounts(&self) -> impl Future<Output = Result<Vec<Discount>, ShopifyError>> + Send;
}

impl PromotionSource for AdminClient {
    fn active_promotions(
        &self,
    ) -> impl Future<Output = Result<Vec<Promotion>, ShopifyError>> + Send {
        self.active_discounts()
    }

    fn all_discounts(&self) -> impl Future<Output = Result<Vec<Discount>, ShopifyError>> + Send {
        Self::all_discounts(self)
    }
}

/// Revalidation tag: one cache entry per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Banner summary of active promotions.
    Promotions,
    /// Full discount listing.
    Discounts,
}

impl CacheTag {
    /// Tag name as used by webhooks and the revalidate endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Promotions => "promotions",
            Self::Discounts => "discounts",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown cache tag name.
#[derive(Debug, thiserror::Error)]
#[error("unknown cache tag: {0}")]
pub struct UnknownCacheTag(String);

impl FromStr for CacheTag {
    type Err = UnknownCacheTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promotions" => Ok(Self::Promotions),
            "discounts" => Ok(Self::Discounts),
            other => Err(UnknownCacheTag(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
enum CachedValue {
    Summary(PromotionsSummary),
    Discounts(Arc<Vec<Discount>>),
}

/// Cached promotions over a [`PromotionSource`].
#[derive(Clone)]
pub struct Promotions<S> {
    source: S,
    cache: Cache<CacheTag, CachedValue>,
}

impl<S: PromotionSource> Promotions<S> {
    /// Cache `source` for `ttl`.
    #[must_use]
    pub fn new(source: S, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(8).time_to_live(ttl).build();
        Self { source, cache }
    }

    /// Banner summary of live promotions.
    ///
    /// Promotions outside their start/end window at fetch time are dropped. A
    /// fetch failure yields the empty summary and is not cached, so the next
    /// read tries again.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> PromotionsSummary {
        let result = self
            .cache
            .try_get_with(CacheTag::Promotions, async {
                let promos = self.source.active_promotions().await?;
                let now = Utc::now();
                let live = promos.into_iter().filter(|p| p.is_live_at(now)).collect();
                debug!("Fetched promotions");
                Ok::<_, ShopifyError>(CachedValue::Summary(PromotionsSummary::from_promotions(
                    live,
                )))
            })
            .await;

        match result {
            Ok(CachedValue::Summary(summary)) => summary,
            Ok(CachedValue::Discounts(_)) => PromotionsSummary::default(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch promotions, serving none");
                PromotionsSummary::default()
            }
        }
    }

    /// Full discount listing. Failures yield an empty list, uncached.
    #[instrument(skip(self))]
    pub async fn discounts(&self) -> Arc<Vec<Discount>> {
        let result = self
            .cache
            .try_get_with(CacheTag::Discounts, async {
                let discounts = self.source.all_discounts().await?;
                debug!(count = discounts.len(), "Fetched discounts");
                Ok::<_, ShopifyError>(CachedValue::Discounts(Arc::new(discounts)))
            })
            .await;

        match result {
            Ok(CachedValue::Discounts(discounts)) => discounts,
            Ok(CachedValue::Summary(_)) => Arc::default(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch discounts, serving none");
                Arc::default()
            }
        }
    }

    /// Drop a tag so the next read re-fetches, even inside the TTL.
    #[instrument(skip(self))]
    pub async fn purge(&self, tag: CacheTag) {
        self.cache.invalidate(&tag).await;
        debug!(tag = %tag, "Purged cache tag");
    }
}
