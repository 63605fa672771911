//! Storage layer for the price tracker
//!
//! Provides JSON file storage with atomic writes, defensive loading and an
//! append-only audit trail.

pub mod catalog;
pub mod file_io;

pub use catalog::{CatalogData, CatalogRepository, LoadReport};
pub use file_io::{read_optional, write_json_atomic};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::TrackerPaths;
use crate::error::TrackerError;

/// Main storage coordinator, owned by the application and passed to services
pub struct Storage {
    paths: TrackerPaths,
    pub catalog: CatalogRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TrackerPaths) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        Ok(Self {
            catalog: CatalogRepository::new(paths.catalog_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<LoadReport, TrackerError> {
        self.catalog.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TrackerError> {
        self.catalog.save()
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record an audit entry; a failed write is logged, never raised
    pub fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            log::warn!("Failed to write audit entry: {}", e);
        }
    }
}
