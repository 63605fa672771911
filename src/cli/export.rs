//! CLI command for data export
//!
//! Writes the catalog in one of the export formats, to a file or stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Local;

use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::export::{self, ExportFormat, TextReportOptions};
use crate::storage::Storage;

/// Handle the export command
///
/// With no output path the file is named after today's date in the current
/// directory. An output of `-` writes to stdout.
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> TrackerResult<()> {
    let output = output.unwrap_or_else(|| {
        PathBuf::from(export::default_export_filename(
            Local::now().date_naive(),
            format.extension(),
        ))
    });

    if output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        write_export(storage, settings, format, &mut writer)?;
        return writer
            .flush()
            .map_err(|e| TrackerError::Export(e.to_string()));
    }

    let file = File::create(&output).map_err(|e| {
        TrackerError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    write_export(storage, settings, format, &mut writer)?;
    writer
        .flush()
        .map_err(|e| TrackerError::Export(e.to_string()))?;

    let total = storage.catalog.snapshot()?.total_items();
    println!(
        "Exported {} item{} as {} to: {}",
        total,
        if total == 1 { "" } else { "s" },
        format,
        output.display()
    );
    if format != ExportFormat::Json {
        println!("Note: only JSON exports can be imported again.");
    }

    Ok(())
}

fn write_export<W: Write>(
    storage: &Storage,
    settings: &Settings,
    format: ExportFormat,
    writer: &mut W,
) -> TrackerResult<()> {
    match format {
        ExportFormat::Json => export::export_snapshot_json(storage, writer, settings.pretty_json),
        ExportFormat::Yaml => export::export_snapshot_yaml(storage, writer),
        ExportFormat::Csv => export::export_items_csv(storage, writer),
        ExportFormat::Text => {
            let options = TextReportOptions {
                date_format: settings.date_format.clone(),
                currency_symbol: settings.currency_symbol.clone(),
            };
            export::export_text_report(storage, writer, &options)
        }
    }
}
