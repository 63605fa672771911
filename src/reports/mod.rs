//! Reports for the price tracker
//!
//! Item ordering for list views and a per-category catalog summary.

pub mod aggregate;
pub mod summary;

pub use aggregate::{compare_names, sort_in_place, sort_items, SortKey};
pub use summary::{summarize, CatalogReport, CategorySummary};
