//! Integration tests for `AdminClient` against a `wiremock` server.

mod common;

use common::{ADMIN_PATH, ADMIN_TOKEN, discounts_page};
use serde_json::json;
use shopfront_core::PromotionKind;
use shopfront_storefront::shopify::ShopifyError;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn active_discounts_queries_active_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ADMIN_PATH))
        .and(header("X-Shopify-Access-Token", ADMIN_TOKEN))
        .and(body_partial_json(json!({
            "operationName": "DiscountNodes",
            "variables": { "query": "status:active" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(discounts_page(&["Spring sale"])))
        .expect(1)
        .mount(&server)
        .await;

    let promos = common::admin_client(&server)
        .active_discounts()
        .await
        .expect("active discounts");

    assert_eq!(promos.len(), 1);
    let promo = promos.first().expect("one promo");
    assert_eq!(promo.title, "Spring sale");
    assert_eq!(promo.kind, PromotionKind::from_discount_typename("DiscountAutomaticBasic"));
    assert_eq!(promo.summary.as_deref(), Some("15% off everything"));
}

#[tokio::test]
async fn update_variant_price_returns_new_price() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ADMIN_PATH))
        .and(body_partial_json(json!({ "operationName": "UpdateVariantPrice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productVariantsBulkUpdate": {
                "productVariants": [{
                    "id": "gid://shopify/ProductVariant/7001",
                    "price": "18.00",
                    "compareAtPrice": "25.00"
                }],
                "userErrors": []
            } }
        })))
        .mount(&server)
        .await;

    let updated = common::admin_client(&server)
        .update_variant_price(
            "gid://shopify/Product/5001",
            "gid://shopify/ProductVariant/7001",
            "18.00",
            Some("25.00"),
        )
        .await
        .expect("price update");

    assert_eq!(updated.price, "18.00");
    assert_eq!(updated.compare_at_price.as_deref(), Some("25.00"));
}

#[tokio::test]
async fn update_variant_price_user_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ADMIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "productVariantsBulkUpdate": {
                "productVariants": null,
                "userErrors": [{ "code": "INVALID", "field": ["variants", "0", "price"], "message": "Price must be positive" }]
            } }
        })))
        .mount(&server)
        .await;

    let err = common::admin_client(&server)
        .update_variant_price(
            "gid://shopify/Product/5001",
            "gid://shopify/ProductVariant/7001",
            "-1",
            None,
        )
        .await
        .expect_err("user error");

    assert!(matches!(err, ShopifyError::UserError(_)), "unexpected error: {err:?}");
}
