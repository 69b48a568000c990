//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Gallery
//! GET  /products               - Gallery listing (?search=&category=&featured=)
//! GET  /products/featured      - Featured works
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart contents
//! POST /cart/add               - Add to cart ({added, count})
//! POST /cart/remove            - Remove line (returns cart)
//! POST /cart/clear             - Empty cart (returns cart)
//! GET  /cart/count             - Cart count badge
//! POST /cart/open              - Open the cart drawer
//! POST /cart/close             - Close the cart drawer
//!
//! # Checkout
//! GET  /checkout               - Redirect to the WhatsApp quote request
//!
//! # Admin (bearer token)
//! GET    /admin/products       - Product table
//! POST   /admin/products       - Create product
//! PUT    /admin/products/{id}  - Update product
//! DELETE /admin/products/{id}  - Delete product
//! ```

pub mod admin;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Create the gallery routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/featured", get(products::featured))
        .route("/products/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/clear", post(cart::clear))
        .route("/cart/count", get(cart::count))
        .route("/cart/open", post(cart::open))
        .route("/cart/close", post(cart::close))
        .route("/checkout", get(cart::checkout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(admin::list).post(admin::create))
        .route(
            "/admin/products/{id}",
            put(admin::update).delete(admin::delete),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(product_routes())
        .merge(cart_routes())
        .merge(admin_routes())
}

/// Build the complete application: routes, health check, sessions and request
/// tracing, bound to `state`.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
