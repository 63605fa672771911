//! Snapshot import service
//!
//! Replaces the whole catalog from a JSON snapshot. The payload is fully
//! validated first; the live catalog is swapped in one step only after that
//! succeeds, with a backup of the previous contents written beforehand.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::audit::AuditEntry;
use crate::backup::BackupManager;
use crate::config::settings::BackupRetention;
use crate::error::{TrackerError, TrackerResult};
use crate::export::json::parse_snapshot;
use crate::models::Category;
use crate::storage::Storage;

use super::catalog::Outcome;

/// What an import brought in
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Item count per category, in fixed category order
    pub counts: Vec<(Category, usize)>,
    /// Items held before the import
    pub replaced: usize,
    /// Backup of the previous catalog, when one could be written
    pub backup: Option<PathBuf>,
}

impl ImportSummary {
    /// Total number of imported items
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(category, count)| format!("{} {}", count, category.key()))
            .collect();
        write!(f, "{} items ({})", self.total(), parts.join(", "))
    }
}

/// Service for whole-catalog imports
pub struct ImportService<'a> {
    storage: &'a Storage,
    retention: BackupRetention,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage, retention: BackupRetention) -> Self {
        Self { storage, retention }
    }

    /// Import a snapshot file
    pub fn import_file(&self, path: &Path) -> TrackerResult<Outcome<ImportSummary>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.import_str(&raw, &path.display().to_string())
    }

    /// Import a snapshot payload
    ///
    /// On any validation failure the live catalog is left exactly as it was.
    pub fn import_str(&self, raw: &str, source: &str) -> TrackerResult<Outcome<ImportSummary>> {
        let incoming = parse_snapshot(raw)?;

        let counts: Vec<(Category, usize)> = Category::all()
            .iter()
            .map(|&category| (category, incoming.items(category).len()))
            .collect();

        let backup = self.backup_current();

        let previous = self.storage.catalog.replace_all(incoming)?;

        let summary = ImportSummary {
            counts,
            replaced: previous.total_items(),
            backup,
        };

        log::info!("Imported {} from {}", summary, source);
        self.storage
            .record(AuditEntry::catalog_imported(source, summary.to_string()));

        Ok(Outcome {
            value: summary,
            save_error: self.storage.save_all().err(),
        })
    }

    fn backup_current(&self) -> Option<PathBuf> {
        let current = match self.storage.catalog.snapshot() {
            Ok(current) => current,
            Err(e) => {
                log::warn!("Could not snapshot catalog before import: {}", e);
                return None;
            }
        };

        if current.is_empty() {
            return None;
        }

        let manager = BackupManager::new(self.storage.paths(), self.retention.clone());
        match manager.create_backup_with_retention(&current) {
            Ok((path, _)) => Some(path),
            Err(e) => {
                log::warn!("Pre-import backup failed, continuing: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::ItemDraft;
    use crate::reports::SortKey;
    use crate::services::CatalogService;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "skins": [
            {"id": "1700000000001", "name": "Fade", "prices": [10, 20],
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"}
        ],
        "accessories": [],
        "items": [
            {"id": "1700000000002", "name": "Screws", "isPerUnit": true, "totalCost": 12,
             "quantity": 48, "prices": [{"totalCost": 12, "quantity": 48, "perUnit": 0.25}],
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}
        ],
        "cars": [],
        "houses": [
            {"id": "1700000000003", "name": "Villa", "govCost": 250000, "prices": [],
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}
        ]
    }"#;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_import_replaces_catalog() {
        let (_temp_dir, storage) = create_test_storage();
        let catalog = CatalogService::new(&storage);
        catalog.add(Category::Cars, ItemDraft::named("Old Car")).unwrap();

        let service = ImportService::new(&storage, BackupRetention::default());
        let outcome = service.import_str(SNAPSHOT, "test").unwrap();
        assert!(outcome.is_saved());

        let summary = outcome.value;
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.replaced, 1);
        assert!(summary.backup.as_ref().unwrap().exists());
        assert_eq!(summary.to_string(), "3 items (1 skins, 0 accessories, 1 items, 0 cars, 1 houses)");

        assert_eq!(catalog.count(Category::Cars).unwrap(), 0);
        let houses = catalog.list(Category::Houses, None, SortKey::Insertion).unwrap();
        assert_eq!(houses[0].cost, Some(250000.0));
        let items = catalog.list(Category::Items, None, SortKey::Insertion).unwrap();
        assert_eq!(items[0].average_price(), 0.25);
    }

    #[test]
    fn test_failed_import_leaves_catalog_untouched() {
        let (_temp_dir, storage) = create_test_storage();
        let catalog = CatalogService::new(&storage);
        catalog.add(Category::Skins, ItemDraft::named("Keep Me")).unwrap();
        let before = storage.catalog.snapshot().unwrap();

        let service = ImportService::new(&storage, BackupRetention::default());
        let missing_key = r#"{"skins":[],"accessories":[],"items":[],"cars":[]}"#;
        let err = service.import_str(missing_key, "test").unwrap_err();
        assert!(err.is_import());

        assert_eq!(storage.catalog.snapshot().unwrap(), before);
        assert!(storage.paths().backup_dir().read_dir().unwrap().next().is_none());
    }

    #[test]
    fn test_import_persists_and_audits() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        {
            let storage = Storage::new(paths.clone()).unwrap();
            storage.load_all().unwrap();
            ImportService::new(&storage, BackupRetention::default())
                .import_str(SNAPSHOT, "snapshot.json")
                .unwrap();

            let entries = storage.audit().read_all().unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].entity_id, "snapshot.json");
        }

        let storage = Storage::new(paths).unwrap();
        let report = storage.load_all().unwrap();
        assert!(!report.had_recovery());
        assert_eq!(storage.catalog.snapshot().unwrap().total_items(), 3);
    }

    #[test]
    fn test_import_into_empty_catalog_skips_backup() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage, BackupRetention::default());

        let summary = service.import_str(SNAPSHOT, "test").unwrap().into_value();
        assert!(summary.backup.is_none());
        assert_eq!(summary.replaced, 0);
    }

    #[test]
    fn test_import_missing_file() {
        let (temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage, BackupRetention::default());

        let err = service
            .import_file(&temp_dir.path().join("nope.json"))
            .unwrap_err();
        assert!(err.is_import());
    }
}
