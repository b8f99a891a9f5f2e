//! Promotion types shown in the storefront banner.
//!
//! Promotions are owned by Shopify and read-only from our side. The storefront
//! only classifies and displays them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of promotion, derived from the Shopify discount type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    /// Amount or percentage off.
    Deal,
    /// Free shipping.
    FreeShipping,
    /// Buy X get Y.
    Bxgy,
    /// App-provided or unrecognized discount.
    Other,
}

impl PromotionKind {
    /// Classify a Shopify discount by its GraphQL `__typename`.
    ///
    /// Covers both the automatic and code variants, e.g. `DiscountAutomaticBxgy`
    /// and `DiscountCodeBxgy`.
    #[must_use]
    pub fn from_discount_typename(typename: &str) -> Self {
        if typename.ends_with("Bxgy") {
            Self::Bxgy
        } else if typename.ends_with("FreeShipping") {
            Self::FreeShipping
        } else if typename.ends_with("Basic") {
            Self::Deal
        } else {
            Self::Other
        }
    }

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deal => "deal",
            Self::FreeShipping => "free_shipping",
            Self::Bxgy => "bxgy",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Promotion kind.
    pub kind: PromotionKind,
    /// Merchant-facing title.
    pub title: String,
    /// Customer-facing summary (e.g. "15% off all products").
    pub summary: Option<String>,
    /// When the promotion starts.
    pub starts_at: Option<DateTime<Utc>>,
    /// When the promotion ends (`None` = open ended).
    pub ends_at: Option<DateTime<Utc>>,
}

impl Promotion {
    /// Whether the promotion's window contains `now`.
    ///
    /// The start is inclusive and the end exclusive. A missing start counts as
    /// already started.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.starts_at.is_none_or(|start| start <= now);
        let not_ended = self.ends_at.is_none_or(|end| now < end);
        started && not_ended
    }
}

/// Banner payload: active promotions and whether there are any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionsSummary {
    /// `true` iff `promos` is non-empty.
    pub has_active_promos: bool,
    /// Active promotions.
    pub promos: Vec<Promotion>,
}

impl PromotionsSummary {
    /// Build a summary from a list of active promotions.
    #[must_use]
    pub fn from_promotions(promos: Vec<Promotion>) -> Self {
        Self {
            has_active_promos: !promos.is_empty(),
            promos,
        }
    }
}
