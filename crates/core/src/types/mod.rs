//! Core types for Galeria.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use cart::CartLineItem;
pub use category::{Category, CategoryFilter, CategoryParseError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{DEFAULT_SIZE, FALLBACK_SIZES, Product, ProductDraft, ProductValidationError};
