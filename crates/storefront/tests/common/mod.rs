//! Shared fixtures for storefront integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use shopfront_storefront::config::{
    PromotionsConfig, ShopifyConfig, StorefrontConfig, StorefrontToken,
};
use shopfront_storefront::shopify::{AdminClient, StorefrontClient};
use shopfront_storefront::state::AppState;
use wiremock::MockServer;

pub const STOREFRONT_PATH: &str = "/api/2026-01/graphql.json";
pub const ADMIN_PATH: &str = "/admin/api/2026-01/graphql.json";
pub const STOREFRONT_TOKEN: &str = "shpat-test-storefront-9f2c";
pub const ADMIN_TOKEN: &str = "shpat-test-admin-41ab";
pub const WEBHOOK_SECRET: &str = "whsec-Lq93mZ0pXv27KdT5";
pub const REVALIDATE_SECRET: &str = "rv-8Hn2QwE5tY1uIo7P";
pub const CART_ID: &str = "gid://shopify/Cart/c1-7d2f9a";

pub fn storefront_client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        format!("{}{STOREFRONT_PATH}", server.uri()),
        StorefrontToken::Private(SecretString::from(STOREFRONT_TOKEN)),
    )
}

pub fn admin_client(server: &MockServer) -> AdminClient {
    AdminClient::with_endpoint(
        format!("{}{ADMIN_PATH}", server.uri()),
        SecretString::from(ADMIN_TOKEN),
    )
}

pub fn config(deals_collection_handle: Option<&str>) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "https://shop.example.test".to_string(),
        shopify: ShopifyConfig {
            store_domain: "shop-test.myshopify.com".to_string(),
            store_url: "https://shop.example.test".to_string(),
            api_version: "2026-01".to_string(),
            storefront_token: StorefrontToken::Private(SecretString::from(STOREFRONT_TOKEN)),
            admin_access_token: SecretString::from(ADMIN_TOKEN),
            webhook_secret: Some(SecretString::from(WEBHOOK_SECRET)),
            revalidate_secret: Some(SecretString::from(REVALIDATE_SECRET)),
        },
        promotions: PromotionsConfig {
            cache_ttl: Duration::from_secs(300),
            deals_collection_handle: deals_collection_handle.map(String::from),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// App state whose clients both point at `server`.
pub fn state(server: &MockServer) -> AppState {
    AppState::from_parts(config(None), storefront_client(server), admin_client(server))
}

pub fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "USD" })
}

/// A `CartFields` selection with one line per `(line, variant, quantity)`.
pub fn cart_json(id: &str, lines: &[(&str, &str, i64)]) -> Value {
    let nodes: Vec<Value> = lines
        .iter()
        .map(|(line_id, variant_id, quantity)| {
            json!({
                "id": line_id,
                "quantity": quantity,
                "attributes": [],
                "cost": {
                    "amountPerQuantity": money("25.00"),
                    "compareAtAmountPerQuantity": null,
                    "subtotalAmount": money("25.00"),
                    "totalAmount": money("25.00")
                },
                "merchandise": {
                    "id": variant_id,
                    "title": "Default Title",
                    "sku": "TEE-01",
                    "availableForSale": true,
                    "price": money("25.00"),
                    "compareAtPrice": null,
                    "selectedOptions": [],
                    "image": null,
                    "product": {
                        "id": "gid://shopify/Product/5001",
                        "handle": "tee",
                        "title": "Tee",
                        "vendor": "Shopfront",
                        "featuredImage": null
                    }
                },
                "discountAllocations": []
            })
        })
        .collect();
    let total: i64 = lines.iter().map(|(_, _, q)| q).sum();

    json!({
        "id": id,
        "checkoutUrl": "https://shop.example.test/cart/c/c1-7d2f9a",
        "note": null,
        "totalQuantity": total,
        "cost": {
            "subtotalAmount": money("25.00"),
            "totalAmount": money("25.00"),
            "totalTaxAmount": null
        },
        "discountCodes": [],
        "lines": { "nodes": nodes, "pageInfo": { "hasNextPage": false, "endCursor": null } }
    })
}

/// A `ProductFields` selection.
pub fn product_json(handle: &str, price: &str, compare_at: Option<&str>) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "handle": handle,
        "title": "Tee",
        "description": "A tee.",
        "descriptionHtml": "<p>A tee.</p>",
        "availableForSale": true,
        "productType": "Shirts",
        "vendor": "Shopfront",
        "tags": ["cotton"],
        "updatedAt": "2026-03-01T12:00:00Z",
        "seo": { "title": null, "description": null },
        "priceRange": { "minVariantPrice": money(price), "maxVariantPrice": money(price) },
        "compareAtPriceRange": compare_at.map(|c| json!({
            "minVariantPrice": money(c),
            "maxVariantPrice": money(c)
        })),
        "featuredImage": null,
        "images": { "nodes": [] },
        "options": [],
        "variants": { "nodes": [{
            "id": "gid://shopify/ProductVariant/7001",
            "title": "Default Title",
            "availableForSale": true,
            "sku": "TEE-01",
            "price": money(price),
            "compareAtPrice": compare_at.map(money),
            "selectedOptions": [],
            "image": null
        }] }
    })
}

/// One `discountNodes` page.
pub fn discounts_page(titles: &[&str]) -> Value {
    let nodes: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            json!({
                "id": format!("gid://shopify/DiscountAutomaticNode/{i}"),
                "discount": {
                    "__typename": "DiscountAutomaticBasic",
                    "title": title,
                    "summary": "15% off everything",
                    "status": "ACTIVE",
                    "startsAt": "2026-01-01T00:00:00Z",
                    "endsAt": null
                }
            })
        })
        .collect();

    json!({ "data": { "discountNodes": {
        "nodes": nodes,
        "pageInfo": { "hasNextPage": false, "endCursor": null }
    } } })
}
