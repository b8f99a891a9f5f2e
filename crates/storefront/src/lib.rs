//! Shopfront storefront library.
//!
//! The non-presentational layer of a headless Shopify store: Shopify GraphQL
//! clients, the cart façade and cart identity store, the promotions cache,
//! webhook verification, and sitemaps, served over a JSON/XML HTTP surface.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod middleware;
pub mod promotions;
pub mod routes;
pub mod shopify;
pub mod sitemap;
pub mod state;
pub mod webhooks;

use std::time::Duration;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Wrap `routes` in the shared middleware stack and attach `state`.
///
/// Sentry layers are added by the binary on top of this.
pub fn build_app(state: AppState, routes: Router<AppState>) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// The full application without rate limiting, as used by tests.
pub fn app(state: AppState) -> Router {
    build_app(state, routes::routes())
}
