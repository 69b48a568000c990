//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineItemId, ProductId};
use super::price::Price;
use super::product::Product;

/// One entry in a quote cart.
///
/// The display fields are a snapshot of the product taken when the line was
/// added; later catalog edits do not reach lines already in a cart. The JSON
/// shape is the persisted cart format:
/// `{id, productId, name, size, imageUrl, category, price?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// `<productId>_<size>`, unique within a cart.
    pub id: LineItemId,
    pub product_id: ProductId,
    pub name: String,
    pub size: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
}

impl CartLineItem {
    /// Snapshot `product` in the chosen `size`.
    #[must_use]
    pub fn snapshot(product: &Product, size: &str) -> Self {
        Self {
            id: LineItemId::compose(&product.id, size),
            product_id: product.id.clone(),
            name: product.name.clone(),
            size: size.to_string(),
            image_url: product.primary_image_url().unwrap_or_default().to_string(),
            category: product.category.to_string(),
            price: product.price,
        }
    }

    /// Display price, if the line has one.
    #[must_use]
    pub fn display_price(&self) -> Option<Price> {
        self.price.map(Price::from_amount)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{Category, ProductDraft};

    #[test]
    fn test_snapshot_copies_display_fields() {
        let mut draft = ProductDraft::new("Mapa do Porto", Category::Mapas);
        draft.image_urls = vec!["porto.jpg".to_string()];
        draft.price = Some(Decimal::new(450, 0));
        let product = Product::from_draft(ProductId::new("p9"), draft, Utc::now());

        let line = CartLineItem::snapshot(&product, "100x80cm");
        assert_eq!(line.id.as_str(), "p9_100x80cm");
        assert_eq!(line.product_id, product.id);
        assert_eq!(line.name, "Mapa do Porto");
        assert_eq!(line.category, "Mapas");
        assert_eq!(line.image_url, "porto.jpg");
        assert_eq!(line.price, Some(Decimal::new(450, 0)));
    }

    #[test]
    fn test_persisted_shape_omits_missing_price() {
        let line = CartLineItem {
            id: LineItemId::new("a_60x40cm"),
            product_id: ProductId::new("a"),
            name: "Galeão".to_string(),
            size: "60x40cm".to_string(),
            image_url: "g.jpg".to_string(),
            category: "Navios".to_string(),
            price: None,
        };
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["productId"], "a");
        assert_eq!(value["imageUrl"], "g.jpg");
        assert!(value.get("price").is_none());

        let with_null: CartLineItem = serde_json::from_str(
            r#"{"id":"a_60x40cm","productId":"a","name":"Galeão","size":"60x40cm","imageUrl":"g.jpg","category":"Navios","price":null}"#,
        )
        .unwrap();
        assert_eq!(with_null, line);
    }
}
