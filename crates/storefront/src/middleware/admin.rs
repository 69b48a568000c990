//! Admin API authentication.
//!
//! The admin panel authenticates with a static bearer token from
//! `GALERIA_ADMIN_TOKEN`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "admin only"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        if tokens_match(presented, state.config().admin_token.expose_secret()) {
            Ok(Self)
        } else {
            tracing::warn!(path = %parts.uri.path(), "Rejected admin token");
            Err(AppError::Unauthorized("invalid bearer token".to_string()))
        }
    }
}

/// Compare tokens without short-circuiting on the first differing byte.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
