//! Backup system for the price tracker
//!
//! `BackupManager` writes dated catalog snapshots to `backups/` and keeps
//! only the newest few.
//!
//! # Backup Format
//!
//! A backup is a JSON snapshot in exactly the export layout:
//! `skins`, `accessories`, `items`, `cars`, `houses`. Restoring one is the
//! same operation as importing an export.
//!
//! # Example
//!
//! ```rust,ignore
//! use price_tracker::backup::BackupManager;
//! use price_tracker::config::{paths::TrackerPaths, settings::BackupRetention};
//!
//! let paths = TrackerPaths::new()?;
//! let manager = BackupManager::new(&paths, BackupRetention::default());
//!
//! let snapshot = storage.catalog.snapshot()?;
//! let (backup_path, pruned) = manager.create_backup_with_retention(&snapshot)?;
//! ```

mod manager;

pub use manager::{BackupInfo, BackupManager};
