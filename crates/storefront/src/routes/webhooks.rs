//! Inbound Shopify webhooks and the revalidate endpoint.
//!
//! Signature and secret failures are all the same bare 401.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::promotions::CacheTag;
use crate::state::AppState;
use crate::webhooks::{
    HandlePayload, REVALIDATE_SECRET_HEADER, SHOPIFY_HMAC_HEADER, SHOPIFY_TOPIC_HEADER,
    verify_revalidate_secret, verify_shopify_hmac,
};

/// Tag value that drops every cached catalog read.
const CATALOG_TAG: &str = "catalog";

/// `POST /api/revalidate` query string.
#[derive(Debug, Default, Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
    pub tag: Option<String>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn verified(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Result<()> {
    let ok = verify_shopify_hmac(
        body,
        header_str(headers, SHOPIFY_HMAC_HEADER),
        state.config().shopify.webhook_secret.as_ref(),
    );
    if ok {
        Ok(())
    } else {
        warn!("Rejected webhook with invalid signature");
        Err(AppError::Unauthorized)
    }
}

fn parse_handle(body: &Bytes) -> Result<String> {
    serde_json::from_slice::<HandlePayload>(body)
        .map(|p| p.handle)
        .map_err(|e| AppError::BadRequest(format!("invalid webhook payload: {e}")))
}

/// Discount created, updated, or deleted: purge the banner promotions.
#[instrument(skip_all, fields(topic = header_str(&headers, SHOPIFY_TOPIC_HEADER)))]
pub async fn discounts(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    verified(&state, &headers, &body)?;

    state.promotions().purge(CacheTag::Promotions).await;
    info!("Promotions purged by webhook");

    Ok(Json(json!({ "received": true })))
}

/// Product updated or deleted: drop its cached read.
#[instrument(skip_all, fields(topic = header_str(&headers, SHOPIFY_TOPIC_HEADER)))]
pub async fn products(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    verified(&state, &headers, &body)?;
    let handle = parse_handle(&body)?;

    state.storefront().invalidate_product(&handle).await;
    info!(handle = %handle, "Product cache invalidated by webhook");

    Ok(Json(json!({ "received": true })))
}

/// Collection updated or deleted: drop every cached page of it.
#[instrument(skip_all, fields(topic = header_str(&headers, SHOPIFY_TOPIC_HEADER)))]
pub async fn collections(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    verified(&state, &headers, &body)?;
    let handle = parse_handle(&body)?;

    state.storefront().invalidate_collection(&handle);
    info!(handle = %handle, "Collection cache invalidated by webhook");

    Ok(Json(json!({ "received": true })))
}

/// Purge a cache tag on demand.
///
/// The secret comes from `?secret=` or `x-revalidate-secret`. `?tag=` picks
/// the tag (`discounts` by default); `catalog` drops every cached catalog read.
#[instrument(skip_all, fields(tag = query.tag.as_deref()))]
pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RevalidateQuery>,
) -> Result<Json<Value>> {
    let provided = query
        .secret
        .as_deref()
        .or_else(|| header_str(&headers, REVALIDATE_SECRET_HEADER));

    if !verify_revalidate_secret(provided, state.config().shopify.revalidate_secret.as_ref()) {
        warn!("Rejected revalidate request");
        return Err(AppError::Unauthorized);
    }

    let tag = query.tag.as_deref().unwrap_or(CacheTag::Discounts.as_str());
    if tag == CATALOG_TAG {
        state.storefront().invalidate_all().await;
    } else {
        let tag = tag
            .parse::<CacheTag>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        state.promotions().purge(tag).await;
    }
    info!(tag = %tag, "Cache revalidated");

    Ok(Json(json!({ "revalidated": true, "tag": tag })))
}
