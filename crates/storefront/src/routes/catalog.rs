//! Catalog read endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::error::Result;
use crate::promotions::deals::product_has_deal;
use crate::shopify::{
    Collection, CollectionConnection, MenuItem, Product, ProductConnection, ProductSortKey,
};
use crate::state::AppState;

/// Page size when `?first=` is absent.
const DEFAULT_PAGE_SIZE: i64 = 24;

/// Largest page Shopify serves.
const MAX_PAGE_SIZE: i64 = 250;

/// Product with its deal flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub has_deal: bool,
}

/// `GET /api/collections/{handle}` query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
}

/// `GET /api/products` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
    /// Shopify search syntax; bypasses the cache.
    pub q: Option<String>,
    /// `ProductSortKeys` value, e.g. `PRICE`.
    pub sort: Option<ProductSortKey>,
    pub reverse: Option<bool>,
}

/// `GET /api/collections` query string.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionListQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
    pub q: Option<String>,
}

fn page_size(first: Option<i64>) -> i64 {
    first.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// A page of products.
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductConnection>> {
    let connection = state
        .storefront()
        .get_products(
            page_size(query.first),
            query.after,
            query.q,
            query.sort,
            query.reverse,
        )
        .await?;
    Ok(Json(connection))
}

/// A page of collections, without their products.
pub async fn collections(
    State(state): State<AppState>,
    Query(query): Query<CollectionListQuery>,
) -> Result<Json<CollectionConnection>> {
    let connection = state
        .storefront()
        .get_collections(page_size(query.first), query.after, query.q)
        .await?;
    Ok(Json(connection))
}

/// A product by handle.
pub async fn product(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state.storefront().get_product_by_handle(&handle).await?;
    let has_deal = product_has_deal(&product);
    Ok(Json(ProductResponse { product, has_deal }))
}

/// A collection by handle with one page of products.
pub async fn collection(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Collection>> {
    let first = page_size(query.first);
    let collection = state
        .storefront()
        .get_collection_by_handle(&handle, first, query.after)
        .await?;
    Ok(Json(collection))
}

/// Menu items; an unknown menu or a failed read is an empty list.
pub async fn menu(State(state): State<AppState>, Path(handle): Path<String>) -> Json<Value> {
    let items: Vec<MenuItem> = match state.storefront().get_menu(&handle).await {
        Ok(menu) => menu.items,
        Err(e) => {
            warn!(error = %e, handle = %handle, "Failed to load menu");
            Vec::new()
        }
    };
    Json(json!({ "items": items }))
}
