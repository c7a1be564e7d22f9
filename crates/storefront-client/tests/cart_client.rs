//! Integration tests for `CartClient`.
//!
//! Uses `wiremock` to stand up a local storefront for each test so no real
//! network traffic is made.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_client::{CartClient, ClientError};

fn test_client(base_url: &str) -> CartClient {
    CartClient::new(base_url, 5, "storefront-test/0.1").expect("failed to build test CartClient")
}

// ---------------------------------------------------------------------------
// GET /cart.js
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_cart_parses_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "item_count": 2,
            "items": [
                {"id": 1, "final_line_price": 2500, "requires_shipping": true, "gift_card": false},
                {"id": 2, "final_line_price": 5000, "requires_shipping": true, "gift_card": true}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cart = test_client(&server.uri())
        .fetch_cart()
        .await
        .expect("cart should parse");

    assert_eq!(cart.items.len(), 2);
    assert_eq!(storefront_core::shippable_subtotal(&cart), 2500);
}

#[tokio::test]
async fn fetch_cart_without_items_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
        .mount(&server)
        .await;

    let cart = test_client(&server.uri()).fetch_cart().await.unwrap();
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn fetch_cart_non_2xx_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_cart().await;
    assert!(
        matches!(result, Err(ClientError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_cart_html_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).fetch_cart().await;
    assert!(
        matches!(result, Err(ClientError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// POST /cart/add.js
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_to_cart_posts_form_and_returns_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("id=4711"))
        .and(body_string_contains("quantity=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4711,
            "quantity": 2,
            "final_line_price": 4980
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = vec![
        ("id".to_owned(), "4711".to_owned()),
        ("quantity".to_owned(), "2".to_owned()),
    ];
    let payload = test_client(&server.uri())
        .add_to_cart(&fields)
        .await
        .expect("add should succeed");

    assert_eq!(payload["id"], 4711);
    assert_eq!(payload["final_line_price"], 4980);
}

#[tokio::test]
async fn add_to_cart_sold_out_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": 422,
            "message": "Cart Error",
            "description": "All 1 Shirt are in your cart."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fields = vec![("id".to_owned(), "1".to_owned())];
    let result = test_client(&server.uri()).add_to_cart(&fields).await;
    assert!(
        matches!(result, Err(ClientError::UnexpectedStatus { status: 422, .. })),
        "expected UnexpectedStatus(422), got: {result:?}"
    );
}

#[tokio::test]
async fn add_to_cart_non_json_success_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let fields = vec![("id".to_owned(), "1".to_owned())];
    let result = test_client(&server.uri()).add_to_cart(&fields).await;
    assert!(matches!(result, Err(ClientError::Deserialize { .. })));
}

#[tokio::test]
async fn unreachable_store_is_http_error() {
    // Port 9 (discard) on localhost is not listening in test environments.
    let result = test_client("http://127.0.0.1:9").fetch_cart().await;
    assert!(
        matches!(result, Err(ClientError::Http(_))),
        "expected Http, got: {result:?}"
    );
}
