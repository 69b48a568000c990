//! Gallery categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a gallery work.
///
/// Serialized with the Portuguese labels the catalog stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// Ships and naval scenes.
    #[default]
    Navios,
    /// Historical maps.
    Mapas,
    /// Buildings and cityscapes.
    Arquitetura,
    /// Everything else.
    Outros,
}

impl Category {
    /// All categories, in gallery menu order.
    pub const ALL: [Self; 4] = [Self::Navios, Self::Mapas, Self::Arquitetura, Self::Outros];

    /// Label as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Navios => "Navios",
            Self::Mapas => "Mapas",
            Self::Arquitetura => "Arquitetura",
            Self::Outros => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown category label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

/// Category selection in the gallery menu.
///
/// `Todos` ("all") matches every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Label of the "all categories" entry.
    pub const ALL_LABEL: &'static str = "Todos";

    /// Whether a work in `category` passes this filter.
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(Self::ALL_LABEL) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL_LABEL),
            Self::Only(category) => category.fmt(f),
        }
    }
}
