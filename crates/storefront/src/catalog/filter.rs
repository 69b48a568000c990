//! Gallery filtering.

use galeria_core::{CategoryFilter, Product};

/// What the gallery page is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFilter {
    /// Case-insensitive substring of the work's name.
    pub search: Option<String>,
    pub category: CategoryFilter,
    /// Only works marked as featured.
    pub featured_only: bool,
}

impl GalleryFilter {
    /// Featured works, as shown on the landing page.
    #[must_use]
    pub fn featured() -> Self {
        Self {
            featured_only: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub const fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Whether `product` passes every criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|needle| {
            product
                .name
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });

        matches_search
            && self.category.matches(product.category)
            && (!self.featured_only || product.is_featured)
    }

    /// Products passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
