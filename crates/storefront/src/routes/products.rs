//! Gallery route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use galeria_core::{CategoryFilter, Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::GalleryFilter;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    /// Formatted price, `None` for "price on request".
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub sizes: Vec<String>,
    pub default_size: String,
    pub is_featured: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let image_urls = if product.image_urls.is_empty() {
            product.image_url.iter().cloned().collect()
        } else {
            product.image_urls.clone()
        };

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.to_string(),
            description: product.description.clone(),
            price: product.display_price().map(|price| price.display()),
            image_url: product.primary_image_url().map(String::from),
            image_urls,
            sizes: product
                .offered_sizes()
                .into_iter()
                .map(String::from)
                .collect(),
            default_size: product.default_size().to_string(),
            is_featured: product.is_featured,
        }
    }
}

/// Gallery query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub search: Option<String>,
    /// Category label, or `Todos` for all.
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl TryFrom<GalleryQuery> for GalleryFilter {
    type Error = AppError;

    fn try_from(query: GalleryQuery) -> Result<Self> {
        let category = query
            .category
            .as_deref()
            .map_or(Ok(CategoryFilter::All), str::parse)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(Self {
            search: query.search.filter(|s| !s.trim().is_empty()),
            category,
            featured_only: query.featured.unwrap_or(false),
        })
    }
}

fn views(products: &[Product]) -> Vec<ProductView> {
    products.iter().map(ProductView::from).collect()
}

/// Gallery listing with search and category filter.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let filter = GalleryFilter::try_from(query)?;
    Ok(Json(views(&state.catalog().search(&filter))))
}

/// Featured works for the landing page.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<Vec<ProductView>> {
    Json(views(&state.catalog().search(&GalleryFilter::featured())))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product = state.catalog().get(&ProductId::new(id))?;
    Ok(Json(ProductView::from(&product)))
}
