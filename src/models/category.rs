//! Catalog categories
//!
//! The catalog is partitioned into a fixed, closed set of categories. Each
//! category owns an independent item collection; name uniqueness and sorting
//! are always scoped to a single category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five fixed catalog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Skins,
    Accessories,
    Items,
    Cars,
    Houses,
}

impl Category {
    /// Get all categories in their canonical order
    pub fn all() -> &'static [Self] {
        &[
            Self::Skins,
            Self::Accessories,
            Self::Items,
            Self::Cars,
            Self::Houses,
        ]
    }

    /// Stable key used in persisted data, snapshots and the CLI
    pub fn key(&self) -> &'static str {
        match self {
            Self::Skins => "skins",
            Self::Accessories => "accessories",
            Self::Items => "items",
            Self::Cars => "cars",
            Self::Houses => "houses",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skins => "Skins",
            Self::Accessories => "Accessories",
            Self::Items => "Items",
            Self::Cars => "Cars",
            Self::Houses => "Houses",
        }
    }

    /// Whether items in this category carry an asset `cost`
    pub fn tracks_cost(&self) -> bool {
        matches!(self, Self::Cars | Self::Houses)
    }

    /// Whether items in this category may be priced per unit
    pub fn supports_per_unit(&self) -> bool {
        matches!(self, Self::Items)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .ok_or_else(|| {
                format!(
                    "Unknown category '{}' (expected one of: {})",
                    s.trim(),
                    Self::all()
                        .iter()
                        .map(|c| c.key())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}
