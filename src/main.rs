use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use price_tracker::cli::{
    handle_backup_command, handle_export_command, handle_history_command, handle_import_command,
    handle_item_command, handle_price_command, handle_report_command, BackupCommands,
    ItemCommands, PriceCommands,
};
use price_tracker::config::{paths::TrackerPaths, settings::Settings};
use price_tracker::export::ExportFormat;
use price_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "pricetrack",
    version,
    about = "Track observed prices for the things you buy and sell",
    long_about = "pricetrack keeps a personal catalog of items in five categories \
                  (skins, accessories, items, cars, houses), records the prices you \
                  see for them over time, and shows averages, rankings and exports."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Item management commands
    #[command(subcommand)]
    Item(ItemCommands),

    /// Price observation commands
    #[command(subcommand)]
    Price(PriceCommands),

    /// Export the catalog (json, yaml, csv or text)
    Export {
        /// Output file (defaults to price-tracker-YYYY-MM-DD.<ext>, '-' for stdout)
        output: Option<PathBuf>,
        /// Export format
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
    },

    /// Replace the catalog with a JSON snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
        /// Only validate the file
        #[arg(long)]
        check: bool,
    },

    /// Per-category summary
    Report {
        /// Also write the summary as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show recent changes
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TrackerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    let load_report = storage.load_all()?;
    if load_report.had_recovery() {
        let names: Vec<&str> = load_report.recovered.iter().map(|c| c.key()).collect();
        eprintln!(
            "Warning: stored data for {} could not be read and was reset to empty.",
            names.join(", ")
        );
    }

    match cli.command {
        Some(Commands::Item(cmd)) => {
            handle_item_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Price(cmd)) => {
            handle_price_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export { output, format }) => {
            handle_export_command(&storage, &settings, output, format)?;
        }
        Some(Commands::Import { file, check }) => {
            handle_import_command(&storage, &settings, &file, check)?;
        }
        Some(Commands::Report { csv }) => {
            handle_report_command(&storage, &settings, csv)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, &settings, cmd)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        Some(Commands::Config { save }) => {
            println!("Price Tracker Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Catalog file:     {}", paths.catalog_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Default sort:     {}", settings.default_sort);
            println!("  Pretty JSON:      {}", settings.pretty_json);
            println!("  Backups kept:     {}", settings.backup_retention.keep);

            if save {
                settings.save(&paths)?;
                println!();
                println!("Settings written to {}", paths.settings_file().display());
            }
        }
        None => {
            println!("pricetrack - personal price catalog");
            println!();
            println!("Run 'pricetrack --help' for usage information.");
            println!("Start with 'pricetrack item add skins \"Dragon Lore\"'.");
        }
    }

    Ok(())
}
