//! Sitemap endpoints.
//!
//! Catalog read failures degrade to an empty urlset; the crawler gets a valid
//! document either way.

use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::Result;
use crate::sitemap::{
    collection_entries, empty_urlset, index_locations, page_entries, product_entries,
    render_index, render_urlset,
};
use crate::state::AppState;

fn xml(body: String) -> Response {
    (
        [
            (CONTENT_TYPE, "application/xml; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
        .into_response()
}

/// `GET /sitemap.xml`: index of the child sitemaps.
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let body = render_index(&index_locations(&state.config().base_url))?;
    Ok(xml(body))
}

/// `GET /sitemap-pages.xml`.
pub async fn pages(State(state): State<AppState>) -> Result<Response> {
    let body = render_urlset(&page_entries(&state.config().base_url))?;
    Ok(xml(body))
}

/// `GET /sitemap-products.xml`.
pub async fn products(State(state): State<AppState>) -> Response {
    let body = match state.storefront().sitemap_products().await {
        Ok(records) => render_urlset(&product_entries(&state.config().base_url, &records)),
        Err(e) => {
            warn!(error = %e, "Failed to list products for sitemap");
            return xml(empty_urlset());
        }
    };

    xml(body.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to render product sitemap");
        empty_urlset()
    }))
}

/// `GET /sitemap-collections.xml`.
pub async fn collections(State(state): State<AppState>) -> Response {
    let body = match state.storefront().sitemap_collections().await {
        Ok(records) => render_urlset(&collection_entries(&state.config().base_url, &records)),
        Err(e) => {
            warn!(error = %e, "Failed to list collections for sitemap");
            return xml(empty_urlset());
        }
    };

    xml(body.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to render collection sitemap");
        empty_urlset()
    }))
}
