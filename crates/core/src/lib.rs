//! Galeria Core - Shared types library.
//!
//! This crate provides common types used across all Galeria components:
//! - `storefront` - Gallery, quote cart and admin API
//! - `cli` - Command-line tools for catalog and cart inspection
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP, no
//! storage backends. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, categories, products and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
