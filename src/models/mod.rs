//! Core data models for the price tracker
//!
//! This module contains the data structures that represent the catalog
//! domain: categories, items and their price observations.

pub mod category;
pub mod ids;
pub mod item;
pub mod price;

pub use category::Category;
pub use ids::ItemId;
pub use item::{Item, ItemDraft, ItemPatch, ItemValidationError};
pub use price::{average_price, PerUnitCost, PriceEntry, PriceValidationError};
