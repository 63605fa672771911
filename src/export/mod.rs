//! Export module for the price tracker
//!
//! - JSON: the canonical snapshot, also the only import format
//! - YAML: the same snapshot for reading
//! - CSV: one row per item (spreadsheet-compatible)
//! - Text: a printable report grouped by category

pub mod csv;
pub mod json;
pub mod text;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

pub use self::csv::{export_items_csv, write_items_csv};
pub use self::json::{default_export_filename, export_snapshot_json, parse_snapshot, write_snapshot_json};
pub use self::text::{export_text_report, render_text_report, write_text_report, TextReportOptions};
pub use self::yaml::{export_snapshot_yaml, write_snapshot_yaml};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
    Text,
}

impl ExportFormat {
    /// File extension for the default export name
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
            Self::Text => "text",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!(
                "Unknown export format '{}'. Valid formats: json, yaml, csv, text",
                other
            )),
        }
    }
}
