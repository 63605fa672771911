//! Name uniqueness within a category

use crate::models::{Item, ItemId};

/// Normalize a name for comparison: trimmed and lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check whether `name` collides with an item in `items` other than `exclude`
///
/// An empty normalized name never counts; callers reject empty names on
/// their own.
pub fn is_duplicate(items: &[Item], name: &str, exclude: Option<&ItemId>) -> bool {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return false;
    }

    items
        .iter()
        .filter(|item| Some(&item.id) != exclude)
        .any(|item| normalize_name(&item.name) == normalized)
}
