//! Catalog product records.
//!
//! The catalog backend has carried a few overlapping product shapes over time
//! (a single `imageUrl` versus an `imageUrls` gallery, with and without a
//! price). `Product` is the one canonical shape: it accepts both image fields
//! and treats the price as optional.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::Category;
use super::id::ProductId;
use super::price::Price;

/// Sizes offered when a product lists none.
pub const FALLBACK_SIZES: [&str; 3] = ["60x40cm", "100x80cm", "120x90cm"];

/// Size preselected when a product lists none.
pub const DEFAULT_SIZE: &str = FALLBACK_SIZES[0];

/// A gallery work as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Legacy single-image field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// `None` means "price on request".
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub created_date: DateTime<Utc>,
}

impl Product {
    /// Build a product record from a validated draft.
    #[must_use]
    pub fn from_draft(id: ProductId, draft: ProductDraft, created_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            image_url: draft.image_url,
            image_urls: draft.image_urls,
            price: draft.price,
            sizes: draft.sizes,
            description: draft.description,
            is_featured: draft.is_featured,
            created_date,
        }
    }

    /// Replace every editable field with the draft's values.
    ///
    /// `id` and `created_date` are kept.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.image_url = draft.image_url;
        self.image_urls = draft.image_urls;
        self.price = draft.price;
        self.sizes = draft.sizes;
        self.description = draft.description;
        self.is_featured = draft.is_featured;
    }

    /// The image shown on cards and in the cart: first gallery image, else the
    /// legacy single image.
    #[must_use]
    pub fn primary_image_url(&self) -> Option<&str> {
        self.image_urls
            .first()
            .or(self.image_url.as_ref())
            .map(String::as_str)
    }

    /// Sizes a visitor can pick from.
    #[must_use]
    pub fn offered_sizes(&self) -> Vec<&str> {
        if self.sizes.is_empty() {
            FALLBACK_SIZES.to_vec()
        } else {
            self.sizes.iter().map(String::as_str).collect()
        }
    }

    /// Size preselected in the product modal.
    #[must_use]
    pub fn default_size(&self) -> &str {
        self.sizes.first().map_or(DEFAULT_SIZE, String::as_str)
    }

    /// Whether `size` is one of the offered sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.offered_sizes().contains(&size)
    }

    /// Display price, if the work has one.
    #[must_use]
    pub fn display_price(&self) -> Option<Price> {
        self.price.map(Price::from_amount)
    }
}

/// Product validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("product name must not be empty")]
    EmptyName,
    #[error("product must offer at least one size")]
    NoSizes,
    #[error("size must not be blank")]
    BlankSize,
    #[error("size listed twice: {0}")]
    DuplicateSize(String),
    #[error("price must not be negative")]
    NegativePrice,
}

/// Editable product fields, as submitted by the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default = "default_sizes")]
    pub sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Sizes the admin form starts with.
fn default_sizes() -> Vec<String> {
    vec!["60x40cm".to_string(), "100x80cm".to_string()]
}

impl ProductDraft {
    /// Create a draft with the form defaults.
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            image_url: None,
            image_urls: Vec::new(),
            price: None,
            sizes: default_sizes(),
            description: None,
            is_featured: false,
        }
    }

    /// Check the draft before it reaches the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first rule the draft breaks.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.sizes.is_empty() {
            return Err(ProductValidationError::NoSizes);
        }
        for (index, size) in self.sizes.iter().enumerate() {
            if size.trim().is_empty() {
                return Err(ProductValidationError::BlankSize);
            }
            if self.sizes.iter().take(index).any(|earlier| earlier == size) {
                return Err(ProductValidationError::DuplicateSize(size.clone()));
            }
        }
        if self.price.is_some_and(|price| price.is_sign_negative()) {
            return Err(ProductValidationError::NegativePrice);
        }
        Ok(())
    }
}
