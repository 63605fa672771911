//! Plain-text report export
//!
//! A printable listing grouped by category. Every category gets a section,
//! even when it is empty.

use std::io::Write;

use chrono::Utc;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, Item};
use crate::storage::{CatalogData, Storage};

/// Formatting choices for the text report
#[derive(Debug, Clone)]
pub struct TextReportOptions {
    /// strftime format for created/updated dates
    pub date_format: String,
    /// Symbol appended to amounts
    pub currency_symbol: String,
}

impl Default for TextReportOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// Render the report as a string
pub fn render_text_report(data: &CatalogData, options: &TextReportOptions) -> String {
    let mut output = String::new();

    output.push_str("Price Tracker Report\n");
    output.push_str(&format!("Generated: {}\n", Utc::now().format(&options.date_format)));
    output.push_str(&"=".repeat(96));
    output.push('\n');

    for &category in Category::all() {
        let items = data.items(category);
        output.push_str(&format!(
            "\n{} ({} item{})\n",
            category.label().to_uppercase(),
            items.len(),
            if items.len() == 1 { "" } else { "s" }
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        if items.is_empty() {
            output.push_str("  (no items)\n");
            continue;
        }

        output.push_str(&format!(
            "{:<28} {:<12} {:<12} {:>14} {:>14}  {}\n",
            "Name", "Created", "Updated", "Cost", "Average", "Prices"
        ));

        for item in items {
            output.push_str(&item_line(item, options));
            output.push('\n');
        }
    }

    output
}

fn item_line(item: &Item, options: &TextReportOptions) -> String {
    let symbol = &options.currency_symbol;
    let cost = match item.cost {
        Some(cost) => format!("{:.2} {}", cost, symbol),
        None => "-".to_string(),
    };
    let prices = if item.prices.is_empty() {
        "-".to_string()
    } else {
        item.prices
            .iter()
            .map(|p| format!("{:.2}", p.effective_value()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let per_unit = if item.is_per_unit { " per unit" } else { "" };

    format!(
        "{:<28} {:<12} {:<12} {:>14} {:>14}  {}{}",
        truncate(&item.name, 28),
        item.created_at.format(&options.date_format),
        item.updated_at.format(&options.date_format),
        cost,
        format!("{:.2} {}", item.average_price(), symbol),
        prices,
        per_unit
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write the text report
pub fn write_text_report<W: Write>(
    data: &CatalogData,
    writer: &mut W,
    options: &TextReportOptions,
) -> TrackerResult<()> {
    writer
        .write_all(render_text_report(data, options).as_bytes())
        .map_err(|e| TrackerError::Export(e.to_string()))
}

/// Export the live catalog as a text report
pub fn export_text_report<W: Write>(
    storage: &Storage,
    writer: &mut W,
    options: &TextReportOptions,
) -> TrackerResult<()> {
    let data = storage.catalog.snapshot()?;
    write_text_report(&data, writer, options)
}
