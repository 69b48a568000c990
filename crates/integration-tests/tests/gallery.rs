//! Integration tests for the public gallery.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use galeria_integration_tests::{TestApp, sample_catalog};

fn ids(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|product| product["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::spawn(Vec::new()).await;

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let mut app = TestApp::spawn(sample_catalog()).await;

    let body = app.get("/products").await.json();
    assert_eq!(ids(&body), ["catedral", "porto", "galeao"]);
}

#[tokio::test]
async fn test_category_filter() {
    let mut app = TestApp::spawn(sample_catalog()).await;

    let body = app.get("/products?category=Mapas").await.json();
    assert_eq!(ids(&body), ["porto"]);

    let body = app.get("/products?category=Todos").await.json();
    assert_eq!(ids(&body).len(), 3);

    let response = app.get("/products?category=Retratos").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let mut app = TestApp::spawn(sample_catalog()).await;

    let body = app.get("/products?search=PORTO").await.json();
    assert_eq!(ids(&body), ["porto"]);

    let body = app
        .get("/products?search=santa&category=Mapas")
        .await
        .json();
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_featured() {
    let mut app = TestApp::spawn(sample_catalog()).await;

    let body = app.get("/products/featured").await.json();
    assert_eq!(ids(&body), ["catedral", "galeao"]);

    let body = app.get("/products?featured=true&category=Navios").await.json();
    assert_eq!(ids(&body), ["galeao"]);
}

#[tokio::test]
async fn test_product_detail() {
    let mut app = TestApp::spawn(sample_catalog()).await;

    let product = app.get("/products/galeao").await.json();
    assert_eq!(product["name"], "Galeão Santa Maria");
    assert_eq!(product["price"], "R$ 350.00");
    assert_eq!(product["default_size"], "60x40cm");
    assert_eq!(product["sizes"], serde_json::json!(["60x40cm", "100x80cm"]));
    assert_eq!(product["image_url"], "https://img.example.com/galeao.jpg");

    let product = app.get("/products/porto").await.json();
    assert!(product["price"].is_null());
    assert_eq!(product["description"], "Carta náutica antiga");

    let response = app.get("/products/missing").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
