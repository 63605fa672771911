//! CLI command for the catalog summary report

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::reports::CatalogReport;
use crate::storage::Storage;

/// Handle the report command, optionally also writing the summary as CSV
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    csv: Option<PathBuf>,
) -> TrackerResult<()> {
    let snapshot = storage.catalog.snapshot()?;
    let report = CatalogReport::generate(&snapshot);

    print!("{}", report.format_terminal(&settings.currency_symbol));

    if let Some(path) = csv {
        let file = File::create(&path).map_err(|e| {
            TrackerError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        report.export_csv(&mut writer)?;
        println!();
        println!("Report exported to: {}", path.display());
    }

    Ok(())
}
