//! Admin product management.
//!
//! Backs the admin panel's product table and form. Every handler requires the
//! admin bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use galeria_core::{Product, ProductDraft, ProductId};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// All products, newest first.
#[instrument(skip(state, _admin))]
pub async fn list(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().list())
}

/// Create a product.
#[instrument(skip(state, _admin, draft))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
#[instrument(skip(state, _admin, draft))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    let product = state.catalog().update(&ProductId::new(id), draft).await?;
    Ok(Json(product))
}

/// Delete a product.
#[instrument(skip(state, _admin))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.catalog().delete(&ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
