//! Price Tracker - personal price catalog for the terminal
//!
//! Keeps five fixed categories of items (skins, accessories, items, cars,
//! houses), each with a history of observed prices, and answers the usual
//! questions about them: what does this usually cost, what is most
//! expensive, what changed recently.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, items, price entries)
//! - `storage`: JSON file storage layer with defensive loading
//! - `services`: Business logic layer (catalog commands and queries, import)
//! - `reports`: Ordering and per-category summaries
//! - `export`: JSON, YAML, CSV and text exports
//! - `audit`: Audit logging system
//! - `backup`: Snapshot backups with retention
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `pricetrack` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use price_tracker::config::paths::TrackerPaths;
//! use price_tracker::models::{Category, ItemDraft};
//! use price_tracker::services::CatalogService;
//! use price_tracker::storage::Storage;
//!
//! let storage = Storage::new(TrackerPaths::new()?)?;
//! storage.load_all()?;
//!
//! let catalog = CatalogService::new(&storage);
//! let item = catalog.add(Category::Skins, ItemDraft::named("Dragon Lore"))?.value;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
