//! WhatsApp checkout handoff.
//!
//! The gallery does not take payments. Checkout turns the cart into a quote
//! request message and a `wa.me` deep link that opens a chat with the gallery,
//! pre-filled with that message. Composing the link is a pure string
//! transformation; opening it is up to the caller.

use std::fmt::Write as _;

use galeria_core::CartLineItem;

use crate::config::CheckoutConfig;

/// Builds quote-request deep links from cart contents.
#[derive(Debug, Clone)]
pub struct CheckoutComposer {
    base_url: String,
    recipient: String,
    opening_line: String,
    closing_line: String,
}

impl CheckoutComposer {
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            recipient: config.recipient.clone(),
            opening_line: config.opening_line.clone(),
            closing_line: config.closing_line.clone(),
        }
    }

    /// Plain-text quote request for `items`, one numbered line per item in
    /// cart order. `None` for an empty cart.
    #[must_use]
    pub fn compose_message(&self, items: &[CartLineItem]) -> Option<String> {
        if items.is_empty() {
            return None;
        }

        let mut message = format!("{}\n\n", self.opening_line);
        for (index, item) in items.iter().enumerate() {
            // Writing to a String cannot fail
            let _ = writeln!(message, "{}. {} ({})", index + 1, item.name, item.size);
        }
        message.push('\n');
        message.push_str(&self.closing_line);
        Some(message)
    }

    /// Deep link carrying the quote request as its `text` parameter,
    /// percent-encoded (line breaks become `%0A`). `None` for an empty cart.
    #[must_use]
    pub fn compose_handoff(&self, items: &[CartLineItem]) -> Option<String> {
        let message = self.compose_message(items)?;
        Some(format!(
            "{}/{}?text={}",
            self.base_url,
            self.recipient,
            urlencoding::encode(&message)
        ))
    }

    /// Recipient the links are addressed to.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}
