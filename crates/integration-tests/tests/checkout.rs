//! Integration tests for the WhatsApp checkout handoff.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use galeria_integration_tests::{RECIPIENT, TestApp, sample_catalog};

#[tokio::test]
async fn test_checkout_without_cart_goes_back_to_cart() {
    let mut app = TestApp::spawn(sample_catalog()).await;

    let response = app.get("/checkout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_redirects_to_whatsapp() {
    let mut app = TestApp::spawn(sample_catalog()).await;
    app.post_form("/cart/add", "product_id=galeao").await;
    app.post_form("/cart/add", "product_id=porto&size=100x80cm")
        .await;

    let response = app.get("/checkout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let location = response.header("location").unwrap().to_string();
    assert!(location.starts_with(&format!("https://wa.me/{RECIPIENT}?text=")));
    assert!(location.contains("1.%20Gale%C3%A3o%20Santa%20Maria%20%2860x40cm%29%0A"));
    assert!(location.contains("2.%20Mapa%20do%20Porto%20%28100x80cm%29%0A"));
    assert!(location.ends_with("Aguardo%20retorno.%20Obrigado%21"));
    assert!(!location.contains(' '));

    // The cart view offers the same link
    let cart = app.get("/cart").await.json();
    assert_eq!(cart["checkout_url"], location.as_str());
}

#[tokio::test]
async fn test_checkout_does_not_change_the_cart() {
    let mut app = TestApp::spawn(sample_catalog()).await;
    app.post_form("/cart/add", "product_id=galeao").await;

    app.get("/checkout").await;
    app.get("/checkout").await;

    assert_eq!(app.get("/cart/count").await.json()["count"], 1);
}

#[tokio::test]
async fn test_checkout_after_clear() {
    let mut app = TestApp::spawn(sample_catalog()).await;
    app.post_form("/cart/add", "product_id=galeao").await;
    app.post_form("/cart/clear", "").await;

    let response = app.get("/checkout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), Some("/cart"));
}
