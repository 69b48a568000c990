//! Integration tests for the quote cart.
//!
//! Each test plays one or more visitors against a fresh storefront with the
//! sample catalog.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use galeria_core::{Category, LineItemId};
use galeria_integration_tests::{TestApp, product, sample_catalog};

async fn app() -> TestApp {
    TestApp::spawn(sample_catalog()).await
}

// =============================================================================
// Adding
// =============================================================================

#[tokio::test]
async fn test_new_visitor_has_empty_cart() {
    let mut app = app().await;

    let cart = app.get("/cart").await.json();
    assert_eq!(cart["count"], 0);
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
    assert_eq!(cart["is_open"], false);
    assert!(cart["checkout_url"].is_null());

    assert_eq!(app.get("/cart/count").await.json()["count"], 0);
}

#[tokio::test]
async fn test_add_item() {
    let mut app = app().await;

    let response = app
        .post_form("/cart/add", "product_id=galeao&size=60x40cm")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert!(app.has_session());

    let body = response.json();
    assert_eq!(body["added"], true);
    assert_eq!(body["count"], 1);
    assert!(body.get("message").is_none());

    let cart = app.get("/cart").await.json();
    let item = &cart["items"][0];
    assert_eq!(item["id"], "galeao_60x40cm");
    assert_eq!(item["product_id"], "galeao");
    assert_eq!(item["name"], "Galeão Santa Maria");
    assert_eq!(item["category"], "Navios");
    assert_eq!(item["size"], "60x40cm");
    assert_eq!(item["image_url"], "https://img.example.com/galeao.jpg");
    assert_eq!(item["price"], "R$ 350.00");
}

#[tokio::test]
async fn test_duplicate_add_is_rejected_without_error() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao&size=60x40cm")
        .await;

    let response = app
        .post_form("/cart/add", "product_id=galeao&size=60x40cm")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.header("hx-trigger").is_none());

    let body = response.json();
    assert_eq!(body["added"], false);
    assert_eq!(body["count"], 1);
    assert_eq!(body["message"], "Item already in cart");
}

#[tokio::test]
async fn test_same_work_in_another_size_is_a_new_line() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao&size=60x40cm")
        .await;
    app.post_form("/cart/add", "product_id=porto&size=60x40cm")
        .await;

    let body = app
        .post_form("/cart/add", "product_id=galeao&size=100x80cm")
        .await
        .json();
    assert_eq!(body["added"], true);
    assert_eq!(body["count"], 3);

    let cart = app.get("/cart").await.json();
    let ids: Vec<&str> = cart["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["galeao_60x40cm", "porto_60x40cm", "galeao_100x80cm"]);
}

#[tokio::test]
async fn test_add_defaults_to_first_size() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=porto").await;
    app.post_form("/cart/add", "product_id=catedral&size=").await;

    let cart = app.get("/cart").await.json();
    assert_eq!(cart["items"][0]["id"], "porto_60x40cm");
    assert_eq!(cart["items"][1]["id"], "catedral_30x20cm");
    assert!(cart["items"][1]["price"].is_null());
}

#[tokio::test]
async fn test_work_without_sizes_offers_standard_sizes() {
    let mut farol = product("farol", "Farol de Santa Marta", Category::Outros, 4);
    farol.sizes.clear();
    let mut app = TestApp::spawn(vec![farol]).await;

    let product = app.get("/products/farol").await.json();
    assert_eq!(product["default_size"], "60x40cm");
    assert_eq!(
        product["sizes"],
        serde_json::json!(["60x40cm", "100x80cm", "120x90cm"])
    );

    let response = app
        .post_form("/cart/add", "product_id=farol&size=100x80cm")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["added"], true);

    let response = app
        .post_form("/cart/add", "product_id=farol&size=30x20cm")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let cart = app.get("/cart").await.json();
    assert_eq!(cart["count"], 1);
    assert_eq!(cart["items"][0]["id"], "farol_100x80cm");
}

#[tokio::test]
async fn test_add_unknown_product_or_size() {
    let mut app = app().await;

    let response = app.post_form("/cart/add", "product_id=missing").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .post_form("/cart/add", "product_id=catedral&size=60x40cm")
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.get("/cart/count").await.json()["count"], 0);
}

// =============================================================================
// Removing and clearing
// =============================================================================

#[tokio::test]
async fn test_remove_item() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao").await;
    app.post_form("/cart/add", "product_id=porto").await;

    let response = app
        .post_form("/cart/remove", "item_id=galeao_60x40cm")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));

    let cart = response.json();
    assert_eq!(cart["count"], 1);
    assert_eq!(cart["items"][0]["id"], "porto_60x40cm");
}

#[tokio::test]
async fn test_remove_missing_item_leaves_cart_alone() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao").await;

    let cart = app
        .post_form("/cart/remove", "item_id=porto_60x40cm")
        .await
        .json();
    assert_eq!(cart["count"], 1);
    assert_eq!(cart["items"][0]["id"], "galeao_60x40cm");
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao").await;
    app.post_form("/cart/add", "product_id=porto").await;

    let cart = app.post_form("/cart/clear", "").await.json();
    assert_eq!(cart["count"], 0);
    assert!(cart["checkout_url"].is_null());

    let response = app.post_form("/cart/clear", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["count"], 0);
}

#[tokio::test]
async fn test_remove_and_clear_without_cart() {
    let mut app = app().await;

    let response = app.post_form("/cart/remove", "item_id=galeao_60x40cm").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["count"], 0);

    let response = app.post_form("/cart/clear", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["count"], 0);
}

// =============================================================================
// Drawer
// =============================================================================

#[tokio::test]
async fn test_drawer_open_and_close() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao").await;

    let cart = app.post_form("/cart/open", "").await.json();
    assert_eq!(cart["is_open"], true);
    assert_eq!(cart["count"], 1);
    assert_eq!(app.get("/cart").await.json()["is_open"], true);

    let cart = app.post_form("/cart/close", "").await.json();
    assert_eq!(cart["is_open"], false);
    assert_eq!(cart["count"], 1);
}

// =============================================================================
// Visitors and persistence
// =============================================================================

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let mut alice = app().await;
    let mut bruno = alice.new_visitor();

    alice.post_form("/cart/add", "product_id=galeao").await;
    bruno.post_form("/cart/add", "product_id=porto").await;
    bruno.post_form("/cart/add", "product_id=catedral").await;

    assert_eq!(alice.get("/cart/count").await.json()["count"], 1);
    assert_eq!(bruno.get("/cart/count").await.json()["count"], 2);
    assert_eq!(alice.saved_cart_keys().len(), 2);
}

#[tokio::test]
async fn test_evicted_cart_is_hydrated_from_its_slot() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao").await;
    app.post_form("/cart/add", "product_id=porto&size=100x80cm")
        .await;

    let keys = app.saved_cart_keys();
    assert_eq!(keys.len(), 1);
    app.state().carts().evict(&keys[0]);

    let cart = app.get("/cart").await.json();
    assert_eq!(cart["count"], 2);
    assert_eq!(cart["items"][0]["id"], "galeao_60x40cm");
    assert_eq!(cart["items"][1]["id"], "porto_100x80cm");
    assert_eq!(cart["items"][0]["price"], "R$ 350.00");
}

#[tokio::test]
async fn test_slot_holds_item_snapshots() {
    let mut app = app().await;
    app.post_form("/cart/add", "product_id=galeao").await;
    app.post_form("/cart/add", "product_id=porto").await;

    let key = app.saved_cart_keys().remove(0);
    let slot = app
        .data_dir()
        .join("carts")
        .join(format!("galeria_cart-{key}.json"));
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(slot).unwrap()).unwrap();

    let items = saved.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "galeao_60x40cm");
    assert_eq!(items[0]["productId"], "galeao");
    assert_eq!(items[0]["imageUrl"], "https://img.example.com/galeao.jpg");
    assert_eq!(items[0]["price"], 350.0);
    assert!(items[1].get("price").is_none());

    let live = app.state().carts().with_cart(&key, |cart| {
        cart.contains(&LineItemId::new("porto_60x40cm"))
    });
    assert!(live);
}
