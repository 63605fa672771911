//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::PathBuf;

use super::warn_if_unsaved;
use crate::backup::BackupManager;
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup of the catalog
    Create,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete old backups according to retention policy
    Prune {
        /// Number of backups to keep (defaults to the configured retention)
        #[arg(long)]
        keep: Option<usize>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Replace the catalog with a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> TrackerResult<()> {
    let retention = settings.backup_retention.clone();
    let manager = BackupManager::new(storage.paths(), retention.clone());

    match cmd {
        BackupCommands::Create => {
            let snapshot = storage.catalog.snapshot()?;
            let (backup_path, pruned) = manager.create_backup_with_retention(&snapshot)?;
            let filename = backup_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| backup_path.display().to_string());
            println!("Backup created: {} ({} items)", filename, snapshot.total_items());
            println!("Location: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: pricetrack backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);
                let age_str = format_duration(age);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        age_str,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Prune { keep, force } => {
            let keep = keep.unwrap_or(retention.keep);
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!("Keeping up to {}, you have {}.", keep, backups.len());
                return Ok(());
            }

            println!(
                "{} of {} backup(s) would be deleted (keeping the newest {}).",
                to_delete,
                backups.len(),
                keep
            );

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  pricetrack backup prune --force");
                return Ok(());
            }

            let deleted = manager.prune_to(keep)?;
            println!("Deleted {} backup(s).", deleted.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;

            // Validate before asking for confirmation
            let data = manager.read_backup(&backup_path)?;

            println!("Backup: {}", backup_path.display());
            println!("Contains {} items.", data.total_items());
            println!();

            if !force {
                println!("WARNING: This will replace the whole catalog!");
                println!("To proceed, run again with --force flag:");
                println!("  pricetrack backup restore {} --force", backup);
                return Ok(());
            }

            let service = ImportService::new(storage, retention);
            let outcome = service.import_file(&backup_path)?;
            warn_if_unsaved(&outcome);

            println!("Restore complete: {}", outcome.value);
            if let Some(previous) = &outcome.value.backup {
                println!("Previous catalog backed up to: {}", previous.display());
            }
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> TrackerResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| TrackerError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_dir = manager.backup_dir().join(backup);
    if in_dir.exists() {
        return Ok(in_dir);
    }

    let with_ext = manager.backup_dir().join(format!("{}.json", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(TrackerError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
