//! Router tests: the full app (without rate limiting) driven with
//! `tower::ServiceExt::oneshot`, Shopify mocked with `wiremock`.

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{
    ADMIN_PATH, CART_ID, REVALIDATE_SECRET, STOREFRONT_PATH, WEBHOOK_SECRET, cart_json,
    discounts_page, product_json,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use shopfront_storefront::webhooks::{SHOPIFY_HMAC_HEADER, sign};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VARIANT_ID: &str = "gid://shopify/ProductVariant/7001";

fn app(server: &MockServer) -> Router {
    shopfront_storefront::app(common::state(server))
}

fn storefront_op(name: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(STOREFRONT_PATH))
        .and(body_partial_json(json!({ "operationName": name })))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn get_with_cart(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("shopfront_cart={CART_ID}"))
        .body(Body::empty())
        .expect("request")
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn cart_set_cookie(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("shopfront_cart="))
        .map(String::from)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_ok() {
    let server = MockServer::start().await;
    let response = app(&server).oneshot(get("/health")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cart_without_cookie_is_null() {
    let server = MockServer::start().await;
    let response = app(&server).oneshot(get("/api/cart")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store, max-age=0")
    );
    assert_eq!(body_json(response).await, json!({ "cart": null }));
}

#[tokio::test]
async fn expired_cart_is_null_and_cookie_cleared() {
    let server = MockServer::start().await;
    storefront_op("GetCart")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "cart": null } })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_with_cart("/api/cart"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cart_set_cookie(&response).expect("cart cookie cleared");
    assert!(cookie.starts_with("shopfront_cart=;"), "cookie: {cookie}");
    assert!(cookie.contains("Max-Age=0"), "cookie: {cookie}");
    assert_eq!(body_json(response).await, json!({ "cart": null }));
}

#[tokio::test]
async fn add_without_cart_creates_then_adds_and_sets_cookie() {
    let server = MockServer::start().await;
    storefront_op("CreateCart")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartCreate": { "cart": cart_json(CART_ID, &[]), "userErrors": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    storefront_op("AddToCart")
        .and(body_partial_json(json!({ "variables": { "cartId": CART_ID } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartLinesAdd": {
                "cart": cart_json(CART_ID, &[("gid://shopify/CartLine/1", VARIANT_ID, 2)]),
                "userErrors": []
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(json_request(
            "POST",
            "/api/cart/lines",
            &json!({ "variantId": VARIANT_ID, "quantity": 2 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cart_set_cookie(&response).expect("cart cookie set");
    assert!(cookie.starts_with(&format!("shopfront_cart={CART_ID}")), "cookie: {cookie}");
    assert!(cookie.contains("HttpOnly"), "cookie: {cookie}");

    let body = body_json(response).await;
    assert_eq!(body["cart"]["id"], CART_ID);
    assert_eq!(body["cart"]["totalQuantity"], 2);
}

#[tokio::test]
async fn add_falls_back_to_create_with_line() {
    let server = MockServer::start().await;
    storefront_op("CreateCart")
        .and(body_partial_json(json!({
            "variables": { "input": { "lines": [{ "merchandiseId": VARIANT_ID, "quantity": 1 }] } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartCreate": {
                "cart": cart_json(CART_ID, &[("gid://shopify/CartLine/1", VARIANT_ID, 1)]),
                "userErrors": []
            } }
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    storefront_op("CreateCart")
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream hiccup"))
        .expect(1)
        .mount(&server)
        .await;
    storefront_op("AddToCart")
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(json_request(
            "POST",
            "/api/cart/lines",
            &json!({ "variantId": VARIANT_ID }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cart_set_cookie(&response).is_some());
    let body = body_json(response).await;
    assert_eq!(body["cart"]["totalQuantity"], 1);
}

#[tokio::test]
async fn add_rejects_zero_quantity() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(json_request(
            "POST",
            "/api/cart/lines",
            &json!({ "variantId": VARIANT_ID, "quantity": 0 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quantity_beyond_shopify_int_is_400() {
    let server = MockServer::start().await;
    storefront_op("AddToCart")
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    storefront_op("UpdateCartLines")
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let app = app(&server);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/lines",
            &json!({ "variantId": VARIANT_ID, "quantity": 3_000_000_000_i64 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut request = json_request(
        "PATCH",
        "/api/cart/lines",
        &json!({ "lineId": "gid://shopify/CartLine/1", "quantity": 3_000_000_000_i64 }),
    );
    request.headers_mut().insert(
        header::COOKIE,
        format!("shopfront_cart={CART_ID}").parse().expect("cookie header"),
    );
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_to_vanished_cart_is_404_and_cookie_cleared() {
    let server = MockServer::start().await;
    storefront_op("AddToCart")
        .and(body_partial_json(json!({ "variables": { "cartId": CART_ID } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartLinesAdd": {
                "cart": null,
                "userErrors": [{
                    "field": ["cartId"],
                    "message": "The specified cart does not exist.",
                    "code": "INVALID"
                }]
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = json_request(
        "POST",
        "/api/cart/lines",
        &json!({ "variantId": VARIANT_ID, "quantity": 1 }),
    );
    request.headers_mut().insert(
        header::COOKIE,
        format!("shopfront_cart={CART_ID}").parse().expect("cookie header"),
    );

    let response = app(&server).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let cookie = cart_set_cookie(&response).expect("cart cookie cleared");
    assert!(cookie.starts_with("shopfront_cart=;"), "cookie: {cookie}");
    assert!(cookie.contains("Max-Age=0"), "cookie: {cookie}");
}

#[tokio::test]
async fn inapplicable_discount_code_is_422() {
    let server = MockServer::start().await;
    let mut cart = cart_json(CART_ID, &[("gid://shopify/CartLine/1", VARIANT_ID, 1)]);
    cart["discountCodes"] = json!([{ "code": "BOGUS", "applicable": false }]);

    storefront_op("UpdateCartDiscountCodes")
        .and(body_partial_json(json!({ "variables": { "discountCodes": ["BOGUS"] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartDiscountCodesUpdate": { "cart": cart, "userErrors": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = json_request(
        "PUT",
        "/api/cart/discount-codes",
        &json!({ "codes": [" BOGUS ", ""] }),
    );
    request.headers_mut().insert(
        header::COOKIE,
        format!("shopfront_cart={CART_ID}").parse().expect("cookie header"),
    );

    let response = app(&server).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(
        body["error"].as_str().is_some_and(|e| e.contains("BOGUS")),
        "body: {body}"
    );
}

#[tokio::test]
async fn update_without_cart_is_404() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(json_request(
            "PATCH",
            "/api/cart/lines",
            &json!({ "lineId": "gid://shopify/CartLine/1", "quantity": 3 }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forget_clears_cookie() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/cart")
        .header(header::COOKIE, format!("shopfront_cart={CART_ID}"))
        .body(Body::empty())
        .expect("request");

    let response = app(&server).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = cart_set_cookie(&response).expect("cart cookie cleared");
    assert!(cookie.contains("Max-Age=0"), "cookie: {cookie}");
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkout_redirects_to_permalink() {
    let server = MockServer::start().await;
    storefront_op("GetCart")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cart": cart_json(CART_ID, &[
                ("gid://shopify/CartLine/1", "gid://shopify/ProductVariant/7001", 2),
                ("gid://shopify/CartLine/2", "gid://shopify/ProductVariant/7002", 1),
            ]) }
        })))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_with_cart("/checkout"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("https://shop.example.test/cart/7001:2,7002:1")
    );
}

#[tokio::test]
async fn checkout_without_cart_is_bare_cart_url() {
    let server = MockServer::start().await;
    let response = app(&server).oneshot(get("/checkout")).await.expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("https://shop.example.test/cart")
    );
}

#[tokio::test]
async fn permalink_endpoint() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(json_request(
            "POST",
            "/api/checkout/permalink",
            &json!({ "lines": [
                { "variantId": "gid://shopify/ProductVariant/11", "quantity": 2 },
                { "variantId": "22", "quantity": 1 }
            ] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "url": "https://shop.example.test/cart/11:2,22:1" })
    );
}

// ---------------------------------------------------------------------------
// Promotions and webhooks
// ---------------------------------------------------------------------------

fn signed_webhook(uri: &str, body: &'static [u8], signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(SHOPIFY_HMAC_HEADER, signature)
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn webhook_with_bad_signature_is_401() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(signed_webhook(
            "/api/webhooks/shopify/discounts",
            br#"{"id":1}"#,
            "bm90IGEgcmVhbCBzaWduYXR1cmU=",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn webhook_without_signature_is_401() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/shopify/discounts")
        .body(Body::from(r#"{"id":1}"#))
        .expect("request");

    let response = app(&server).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn promotions_cached_until_webhook_purges() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ADMIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(discounts_page(&["Spring sale"])))
        .expect(2)
        .mount(&server)
        .await;

    let app = app(&server);

    let first = body_json(app.clone().oneshot(get("/api/promotions")).await.expect("first")).await;
    let second =
        body_json(app.clone().oneshot(get("/api/promotions")).await.expect("second")).await;
    assert_eq!(first, second);
    assert_eq!(first["hasActivePromos"], true);
    assert_eq!(first["promos"][0]["title"], "Spring sale");

    let body: &'static [u8] = br#"{"id":991,"title":"Spring sale"}"#;
    let signature = sign(body, &SecretString::from(WEBHOOK_SECRET)).expect("signature");
    let response = app
        .clone()
        .oneshot(signed_webhook("/api/webhooks/shopify/discounts", body, &signature))
        .await
        .expect("webhook");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "received": true }));

    let third = body_json(app.oneshot(get("/api/promotions")).await.expect("third")).await;
    assert_eq!(third, first);
}

#[tokio::test]
async fn promotions_degrade_to_empty_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ADMIN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = app(&server).oneshot(get("/api/promotions")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "hasActivePromos": false, "promos": [] })
    );
}

#[tokio::test]
async fn header_promo_false_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/api/promotions/header"))
        .await
        .expect("response");

    assert_eq!(body_json(response).await, json!({ "showPromo": false }));
}

#[tokio::test]
async fn product_webhook_invalidates_product() {
    let server = MockServer::start().await;
    storefront_op("GetProductByHandle")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "product": product_json("tee", "20.00", None) }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let app = app(&server);
    app.clone()
        .oneshot(get("/api/products/tee"))
        .await
        .expect("first read");

    let body: &'static [u8] = br#"{"id":5001,"handle":"tee","title":"Tee"}"#;
    let signature = sign(body, &SecretString::from(WEBHOOK_SECRET)).expect("signature");
    let response = app
        .clone()
        .oneshot(signed_webhook("/api/webhooks/shopify/products", body, &signature))
        .await
        .expect("webhook");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/products/tee")).await.expect("second read");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn collection_webhook_invalidates_every_page_size() {
    let server = MockServer::start().await;
    storefront_op("GetCollectionByHandle")
        .and(body_partial_json(json!({ "variables": { "handle": "summer" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "collection": {
                "id": "gid://shopify/Collection/41",
                "handle": "summer",
                "title": "Summer",
                "description": "",
                "updatedAt": "2024-06-01T00:00:00Z",
                "seo": { "title": null, "description": null },
                "image": null,
                "products": {
                    "nodes": [product_json("tee", "20.00", None)],
                    "pageInfo": { "hasNextPage": false, "endCursor": null }
                }
            } }
        })))
        .expect(4)
        .mount(&server)
        .await;

    let app = app(&server);
    for uri in ["/api/collections/summer?first=10", "/api/collections/summer?first=20"] {
        let response = app.clone().oneshot(get(uri)).await.expect("first read");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body: &'static [u8] = br#"{"id":41,"handle":"summer","title":"Summer"}"#;
    let signature = sign(body, &SecretString::from(WEBHOOK_SECRET)).expect("signature");
    let response = app
        .clone()
        .oneshot(signed_webhook("/api/webhooks/shopify/collections", body, &signature))
        .await
        .expect("webhook");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "received": true }));

    for uri in ["/api/collections/summer?first=10", "/api/collections/summer?first=20"] {
        let response = app.clone().oneshot(get(uri)).await.expect("second read");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn signed_collection_webhook_with_bad_json_is_400() {
    let server = MockServer::start().await;
    let body: &'static [u8] = b"not json";
    let signature = sign(body, &SecretString::from(WEBHOOK_SECRET)).expect("signature");

    let response = app(&server)
        .oneshot(signed_webhook("/api/webhooks/shopify/collections", body, &signature))
        .await
        .expect("webhook");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Revalidate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn revalidate_requires_secret() {
    let server = MockServer::start().await;
    let app = app(&server);

    let request = Request::builder()
        .method("POST")
        .uri("/api/revalidate?secret=wrong")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("POST")
        .uri("/api/revalidate")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revalidate_with_header_secret_purges_discounts() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/revalidate")
        .header("x-revalidate-secret", REVALIDATE_SECRET)
        .body(Body::empty())
        .expect("request");

    let response = app(&server).oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "revalidated": true, "tag": "discounts" })
    );
}

#[tokio::test]
async fn revalidate_tags() {
    let server = MockServer::start().await;
    let app = app(&server);

    let uri = format!("/api/revalidate?secret={REVALIDATE_SECRET}&tag=catalog");
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["tag"], "catalog");

    let uri = format!("/api/revalidate?secret={REVALIDATE_SECRET}&tag=everything");
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_includes_deal_flag() {
    let server = MockServer::start().await;
    storefront_op("GetProductByHandle")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "product": product_json("tee", "20.00", Some("30.00")) }
        })))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/api/products/tee"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["handle"], "tee");
    assert_eq!(body["hasDeal"], true);
}

#[tokio::test]
async fn product_listing_passes_paging_and_sort() {
    let server = MockServer::start().await;
    storefront_op("GetProducts")
        .and(body_partial_json(json!({
            "variables": { "first": 250, "after": "cursor-1", "sortKey": "PRICE", "reverse": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "products": {
                "nodes": [product_json("tee", "20.00", None)],
                "pageInfo": { "hasNextPage": true, "endCursor": "cursor-2" }
            } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/api/products?first=900&after=cursor-1&sort=PRICE&reverse=true"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["products"][0]["handle"], "tee");
    assert_eq!(body["pageInfo"]["endCursor"], "cursor-2");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let server = MockServer::start().await;
    storefront_op("GetProductByHandle")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "product": null } })))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/api/products/ghost"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn menu_failure_is_empty_list() {
    let server = MockServer::start().await;
    storefront_op("GetMenu")
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/api/menu/main-menu"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "items": [] }));
}

// ---------------------------------------------------------------------------
// Sitemaps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_sitemap_lists_products() {
    let server = MockServer::start().await;
    storefront_op("SitemapProducts")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "products": {
                "nodes": [{ "handle": "tee", "updatedAt": "2026-02-01T08:00:00Z" }],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            } }
        })))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/sitemap-products.xml"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("application/xml; charset=utf-8")
    );
    let xml = body_text(response).await;
    assert!(xml.contains("<loc>https://shop.example.test/products/tee</loc>"));
    assert!(xml.contains("<lastmod>2026-02-01</lastmod>"));
}

#[tokio::test]
async fn product_sitemap_failure_is_empty_urlset() {
    let server = MockServer::start().await;
    storefront_op("SitemapProducts")
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get("/sitemap-products.xml"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let xml = body_text(response).await;
    assert!(xml.contains("<urlset"));
    assert!(!xml.contains("<url>"));
}

#[tokio::test]
async fn sitemap_index_lists_children() {
    let server = MockServer::start().await;
    let response = app(&server).oneshot(get("/sitemap.xml")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let xml = body_text(response).await;
    assert!(xml.contains("<sitemapindex"));
    assert!(xml.contains("https://shop.example.test/sitemap-collections.xml"));
}
