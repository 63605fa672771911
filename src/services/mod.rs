//! Service layer for the price tracker
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, duplicate-name checks, persistence after every mutation and
//! the audit trail.

pub mod catalog;
pub mod duplicate;
pub mod import;

pub use catalog::{filter_items, CatalogService, Outcome};
pub use duplicate::{is_duplicate, normalize_name};
pub use import::{ImportService, ImportSummary};
