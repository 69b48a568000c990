//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart key, which names their cart slot.
    pub const CART_KEY: &str = "cart_key";
}
