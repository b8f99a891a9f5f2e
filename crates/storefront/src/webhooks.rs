//! Inbound webhook and revalidation authentication.
//!
//! Shopify signs each webhook with `base64(HMAC-SHA256(secret, raw body))` in
//! `X-Shopify-Hmac-Sha256`. Verification must run over the exact bytes
//! received, before any JSON parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Header carrying the webhook signature.
pub const SHOPIFY_HMAC_HEADER: &str = "x-shopify-hmac-sha256";

/// Header carrying the webhook topic (e.g. `products/update`).
pub const SHOPIFY_TOPIC_HEADER: &str = "x-shopify-topic";

/// Header alternative to `?secret=` on the revalidate endpoint.
pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature Shopify would send for `body`.
#[must_use]
pub fn sign(body: &[u8], secret: &SecretString) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()).ok()?;
    mac.update(body);
    Some(BASE64.encode(mac.finalize().into_bytes()))
}

/// Verify a Shopify webhook signature.
///
/// Accepts exactly when `header` equals the expected signature byte for byte.
/// A missing header, a missing secret, or any differing byte is a rejection.
#[must_use]
pub fn verify_shopify_hmac(
    body: &[u8],
    header: Option<&str>,
    secret: Option<&SecretString>,
) -> bool {
    let (Some(provided), Some(secret)) = (header, secret) else {
        return false;
    };
    let Some(expected) = sign(body, secret) else {
        return false;
    };

    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

/// Check a caller-provided revalidation secret.
#[must_use]
pub fn verify_revalidate_secret(provided: Option<&str>, expected: Option<&SecretString>) -> bool {
    let (Some(provided), Some(expected)) = (provided, expected) else {
        return false;
    };
    constant_time_eq(provided.as_bytes(), expected.expose_secret().as_bytes())
}

/// Length-checked constant-time comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// The part of a product or collection webhook payload we act on.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlePayload {
    /// Resource handle.
    pub handle: String,
}
