//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//!
//! Admin routes additionally require the [`RequireAdmin`] extractor.

pub mod admin;
pub mod session;

pub use admin::RequireAdmin;
pub use session::create_session_layer;
