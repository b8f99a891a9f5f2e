//! Cart API route handlers.
//!
//! Every handler reads the cart ID through [`CartIdentity`] and finishes
//! through [`CartIdentity::respond`] so a changed ID reaches the client.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shopfront_core::{PermalinkLine, checkout_permalink};
use tracing::{instrument, warn};

use crate::cart::CartIdentity;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::shopify::{Cart, ShopifyError};
use crate::state::AppState;

/// Cart response body; `cart` is `null` when there is no live cart.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Option<Cart>,
}

impl CartResponse {
    fn of(cart: Option<Cart>) -> Json<Self> {
        Json(Self { cart })
    }
}

/// `POST /api/cart/lines` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineRequest {
    pub variant_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// `PATCH /api/cart/lines` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineRequest {
    pub line_id: String,
    pub quantity: i64,
}

/// `POST /api/cart/lines/remove` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinesRequest {
    pub line_ids: Vec<String>,
}

/// `PUT /api/cart/discount-codes` body.
#[derive(Debug, Deserialize)]
pub struct DiscountCodesRequest {
    pub codes: Vec<String>,
}

/// `POST /api/checkout/permalink` body.
#[derive(Debug, Deserialize)]
pub struct PermalinkRequest {
    pub lines: Vec<PermalinkLine>,
}

/// Current cart, or `{"cart": null}`. A cart Shopify no longer knows clears
/// the stored ID.
#[instrument(skip(state, identity))]
pub async fn show(State(state): State<AppState>, identity: CartIdentity) -> Result<Response> {
    let Some(cart_id) = identity.load().await else {
        return Ok(CartResponse::of(None).into_response());
    };

    let cart = state.cart().get_cart(&cart_id).await?;
    if cart.is_none() {
        identity.save(None).await;
    }

    Ok(identity.respond(CartResponse::of(cart)).await)
}

/// Shopify's `Int` is 32-bit; larger quantities fail its input coercion.
fn check_quantity_bound(quantity: i64) -> Result<()> {
    if quantity > i64::from(i32::MAX) {
        return Err(AppError::BadRequest("quantity is too large".to_string()));
    }
    Ok(())
}

/// Add a variant, creating the cart when there is none.
#[instrument(skip(state, identity, body), fields(variant_id = %body.variant_id))]
pub async fn add_line(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<AddLineRequest>,
) -> Result<Response> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    check_quantity_bound(body.quantity)?;

    let cart_id = identity.load().await;
    match state
        .cart()
        .add_to_cart(cart_id.as_deref(), &body.variant_id, body.quantity)
        .await
    {
        Ok(cart) => {
            identity.save(Some(&cart.id)).await;
            add_breadcrumb(
                "cart",
                "Added to cart",
                &[("variant_id", body.variant_id.as_str())],
            );
            Ok(identity.respond(CartResponse::of(Some(cart))).await)
        }
        Err(ShopifyError::NotFound(e)) if cart_id.is_some() => {
            warn!(error = %e, "Stored cart is gone, forgetting it");
            identity.save(None).await;
            Ok(identity
                .respond(AppError::Shopify(ShopifyError::NotFound(e)))
                .await)
        }
        Err(e) => Err(e.into()),
    }
}

/// Set a line's quantity; zero removes it.
#[instrument(skip(state, identity, body), fields(line_id = %body.line_id))]
pub async fn update_line(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<UpdateLineRequest>,
) -> Result<Json<CartResponse>> {
    if body.quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".to_string()));
    }
    check_quantity_bound(body.quantity)?;

    let cart_id = require_cart_id(&identity).await?;
    let cart = state
        .cart()
        .update_cart(&cart_id, &body.line_id, body.quantity)
        .await?;

    Ok(CartResponse::of(Some(cart)))
}

/// Remove lines.
#[instrument(skip(state, identity, body))]
pub async fn remove_lines(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<RemoveLinesRequest>,
) -> Result<Json<CartResponse>> {
    if body.line_ids.is_empty() {
        return Err(AppError::BadRequest("lineIds must not be empty".to_string()));
    }

    let cart_id = require_cart_id(&identity).await?;
    let cart = state.cart().remove_from_cart(&cart_id, body.line_ids).await?;

    Ok(CartResponse::of(Some(cart)))
}

/// Replace the discount codes. A code Shopify rejects is a 422.
#[instrument(skip(state, identity, body))]
pub async fn discount_codes(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<DiscountCodesRequest>,
) -> Result<Json<CartResponse>> {
    let cart_id = require_cart_id(&identity).await?;
    let cart = state
        .cart()
        .apply_discount_codes(&cart_id, body.codes)
        .await?;

    Ok(CartResponse::of(Some(cart)))
}

/// Forget the cart ID in both slots.
pub async fn forget(identity: CartIdentity) -> Response {
    identity.save(None).await;
    identity.respond(StatusCode::NO_CONTENT).await
}

/// Redirect to the checkout permalink for the current cart.
///
/// No cart, or any failure reading it, sends the shopper to the bare cart URL.
#[instrument(skip(state, identity))]
pub async fn checkout(State(state): State<AppState>, identity: CartIdentity) -> Redirect {
    let store_url = &state.config().shopify.store_url;

    let lines = match identity.load().await {
        Some(cart_id) => match state.cart().get_cart(&cart_id).await {
            Ok(Some(cart)) => permalink_lines(&cart),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load cart for checkout");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    Redirect::to(&checkout_permalink(store_url, &lines))
}

/// Build a checkout permalink from explicit lines.
pub async fn permalink(
    State(state): State<AppState>,
    Json(body): Json<PermalinkRequest>,
) -> Json<serde_json::Value> {
    let url = checkout_permalink(&state.config().shopify.store_url, &body.lines);
    Json(json!({ "url": url }))
}

async fn require_cart_id(identity: &CartIdentity) -> Result<String> {
    identity
        .load()
        .await
        .ok_or_else(|| AppError::NotFound("cart".to_string()))
}

fn permalink_lines(cart: &Cart) -> Vec<PermalinkLine> {
    cart.lines
        .iter()
        .filter_map(|line| {
            let quantity = u32::try_from(line.quantity).ok().filter(|q| *q > 0)?;
            Some(PermalinkLine::new(line.merchandise.id.clone(), quantity))
        })
        .collect()
}
