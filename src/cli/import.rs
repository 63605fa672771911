//! CLI command for snapshot import

use std::path::Path;

use super::warn_if_unsaved;
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::export::parse_snapshot;
use crate::models::Category;
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
///
/// `check` validates the file and reports what it holds without touching
/// the catalog.
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    file: &Path,
    check: bool,
) -> TrackerResult<()> {
    if check {
        let raw = std::fs::read_to_string(file).map_err(|e| {
            TrackerError::Import(format!("Failed to read {}: {}", file.display(), e))
        })?;
        let data = parse_snapshot(&raw)?;

        println!("{} is a valid snapshot:", file.display());
        for &category in Category::all() {
            println!("  {:<12} {:>5}", category.key(), data.items(category).len());
        }
        return Ok(());
    }

    let service = ImportService::new(storage, settings.backup_retention.clone());
    let outcome = service.import_file(file)?;
    warn_if_unsaved(&outcome);

    let summary = outcome.value;
    println!("Imported {} from {}", summary, file.display());
    println!("  Replaced {} existing item(s)", summary.replaced);
    if let Some(backup) = &summary.backup {
        println!("  Previous catalog backed up to: {}", backup.display());
    }

    Ok(())
}
