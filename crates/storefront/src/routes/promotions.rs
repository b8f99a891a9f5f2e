//! Promotions read endpoints. None of these fail: a Shopify outage reads as
//! "no promotions".

use axum::{Json, extract::State};
use serde::Serialize;
use shopfront_core::PromotionsSummary;

use crate::promotions::deals::header_promo_active;
use crate::shopify::admin::Discount;
use crate::state::AppState;

/// `GET /api/promotions/header` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderPromo {
    pub show_promo: bool,
}

/// `GET /api/discounts` body.
#[derive(Debug, Serialize)]
pub struct DiscountList {
    pub discounts: Vec<Discount>,
}

/// Cached `{hasActivePromos, promos}`.
pub async fn summary(State(state): State<AppState>) -> Json<PromotionsSummary> {
    Json(state.promotions().summary().await)
}

/// Whether the site header shows the promo treatment.
pub async fn header(State(state): State<AppState>) -> Json<HeaderPromo> {
    let show_promo = header_promo_active(
        state.promotions(),
        state.storefront(),
        state.config().promotions.deals_collection_handle.as_deref(),
    )
    .await;

    Json(HeaderPromo { show_promo })
}

/// Cached full discount listing.
pub async fn discounts(State(state): State<AppState>) -> Json<DiscountList> {
    let discounts = state.promotions().discounts().await;
    Json(DiscountList {
        discounts: (*discounts).clone(),
    })
}
