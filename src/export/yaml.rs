//! YAML export
//!
//! Same schema as the JSON snapshot, for reading rather than re-importing.

use std::io::Write;

use chrono::Utc;

use crate::error::{TrackerError, TrackerResult};
use crate::storage::{CatalogData, Storage};

/// Write a catalog snapshot as YAML
pub fn write_snapshot_yaml<W: Write>(data: &CatalogData, writer: &mut W) -> TrackerResult<()> {
    writeln!(writer, "# Price Tracker catalog export")
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    writeln!(writer, "# Import accepts the JSON export only.")
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TrackerError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, data).map_err(|e| TrackerError::Export(e.to_string()))?;

    Ok(())
}

/// Export the live catalog to YAML
pub fn export_snapshot_yaml<W: Write>(storage: &Storage, writer: &mut W) -> TrackerResult<()> {
    let data = storage.catalog.snapshot()?;
    write_snapshot_yaml(&data, writer)
}
