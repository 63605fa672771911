//! Item ordering
//!
//! Sorting never mutates the stored order: it works on a copy and is stable,
//! so ties keep the relative order they came in with. Names are ordered with
//! the Unicode Collation Algorithm (CLDR root tailoring), which places `ё`
//! with `е` and `É` with `e` instead of after the end of the alphabet.

use std::cmp::Ordering;
use std::fmt;

use feruca::Collator;
use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Ordering for item lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Name, ascending
    Name,
    /// Last update, most recent first
    Date,
    /// Average price, highest first
    Price,
    /// Stored (creation) order
    Insertion,
}

impl SortKey {
    /// Parse a sort key; anything unrecognized keeps the stored order
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "name" => Self::Name,
            "date" => Self::Date,
            "price" => Self::Price,
            _ => Self::Insertion,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Price => "price",
            Self::Insertion => "insertion",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compare names by collation order, falling back to the raw strings
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collate_names(&mut Collator::default(), a, b)
}

fn collate_names(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}

/// Return the items ordered by `key`, leaving the input untouched
pub fn sort_items<I>(items: I, key: SortKey) -> Vec<Item>
where
    I: IntoIterator<Item = Item>,
{
    let mut sorted: Vec<Item> = items.into_iter().collect();
    sort_in_place(&mut sorted, key);
    sorted
}

/// Stable in-place ordering of an already-copied list
pub fn sort_in_place(items: &mut [Item], key: SortKey) {
    match key {
        SortKey::Name => {
            let mut collator = Collator::default();
            items.sort_by(|a, b| collate_names(&mut collator, &a.name, &b.name))
        }
        SortKey::Date => items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::Price => {
            items.sort_by(|a, b| b.average_price().total_cmp(&a.average_price()))
        }
        SortKey::Insertion => {}
    }
}
