//! Galeria Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`cart`] - Per-visitor quote carts mirrored to durable slots
//! - [`checkout`] - WhatsApp quote-request deep links
//! - [`catalog`] - Product catalog and gallery filtering
//! - [`routes`] - HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
