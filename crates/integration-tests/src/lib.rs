//! Integration tests for Galeria.
//!
//! Tests drive the complete storefront router in-process with
//! [`tower::ServiceExt::oneshot`]; no server or network is involved. Each
//! [`TestApp`] gets its own temporary data directory for cart slots and the
//! catalog file.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p galeria-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Add, remove, clear, drawer and slot persistence
//! - `checkout` - WhatsApp handoff redirect
//! - `gallery` - Listing, filtering and product detail
//! - `admin_catalog` - Admin product management

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use galeria_core::{Category, Product, ProductDraft, ProductId};
use galeria_storefront::catalog::ProductCatalog;
use galeria_storefront::config::StorefrontConfig;
use galeria_storefront::routes;
use galeria_storefront::state::{AppState, cart_dir};
use rust_decimal::Decimal;
use tempfile::TempDir;
use tower::ServiceExt;

/// Admin token configured for every test app.
pub const ADMIN_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6k";

/// Recipient configured for every test app.
pub const RECIPIENT: &str = "5551999373017";

/// A response with its body read out.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Body as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of a response header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// The storefront as seen by one visitor.
///
/// Keeps the session cookie between requests like a browser would.
pub struct TestApp {
    router: Router,
    state: AppState,
    data_dir: Arc<TempDir>,
    cookie: Option<String>,
}

impl TestApp {
    /// Start a storefront whose catalog file holds `products`.
    pub async fn spawn(products: Vec<Product>) -> Self {
        let data_dir = Arc::new(tempfile::tempdir().unwrap());
        let catalog_file = data_dir.path().join("catalog.json");
        std::fs::write(&catalog_file, serde_json::to_string(&products).unwrap()).unwrap();

        Self::boot(data_dir).await
    }

    /// Another visitor of the same running storefront.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            state: self.state.clone(),
            data_dir: Arc::clone(&self.data_dir),
            cookie: None,
        }
    }

    async fn boot(data_dir: Arc<TempDir>) -> Self {
        let config = test_config(data_dir.path());
        let catalog = ProductCatalog::open(&config.catalog_file).await.unwrap();
        let state = AppState::new(config, catalog);

        Self {
            router: routes::app(state.clone()),
            state,
            data_dir,
            cookie: None,
        }
    }

    /// Shared application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// The temporary data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Cart keys that have a slot file, from the file names.
    #[must_use]
    pub fn saved_cart_keys(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(cart_dir(self.data_dir.path())) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let slot = name.strip_suffix(".json")?;
                slot.strip_prefix("galeria_cart-").map(String::from)
            })
            .collect()
    }

    /// Whether the visitor has a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Call the admin API, authenticating with `token` if given.
    pub async fn admin(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<&serde_json::Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Send a request with the visitor's cookie and keep any new one.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        if let Some(pair) = headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|set_cookie| set_cookie.split(';').next())
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Storefront configuration rooted at `data_dir`.
#[must_use]
pub fn test_config(data_dir: &Path) -> StorefrontConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("GALERIA_BASE_URL", "http://localhost:3000".to_string()),
        ("GALERIA_ADMIN_TOKEN", ADMIN_TOKEN.to_string()),
        ("GALERIA_DATA_DIR", data_dir.display().to_string()),
        ("WHATSAPP_RECIPIENT", RECIPIENT.to_string()),
    ]);
    StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// A product with one image, created `days` days into 2024.
#[must_use]
pub fn product(id: &str, name: &str, category: Category, days: i64) -> Product {
    let mut draft = ProductDraft::new(name, category);
    draft.image_urls = vec![format!("https://img.example.com/{id}.jpg")];
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(days);
    Product::from_draft(ProductId::new(id), draft, created)
}

/// The catalog most tests run against.
#[must_use]
pub fn sample_catalog() -> Vec<Product> {
    let mut galeao = product("galeao", "Galeão Santa Maria", Category::Navios, 1);
    galeao.price = Some(Decimal::new(350, 0));
    galeao.is_featured = true;

    let mut porto = product("porto", "Mapa do Porto", Category::Mapas, 2);
    porto.description = Some("Carta náutica antiga".to_string());

    let mut catedral = product("catedral", "Catedral de Pedra", Category::Arquitetura, 3);
    catedral.sizes = vec!["30x20cm".to_string()];
    catedral.is_featured = true;

    vec![galeao, porto, catedral]
}
