//! CSV export
//!
//! One row per item across all categories, for spreadsheets.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, PriceEntry};
use crate::storage::{CatalogData, Storage};

const HEADER: [&str; 10] = [
    "Category",
    "ID",
    "Name",
    "Created",
    "Updated",
    "Cost",
    "Per Unit",
    "Price Count",
    "Average Price",
    "Prices",
];

/// Write every item as a CSV row
pub fn write_items_csv<W: Write>(data: &CatalogData, writer: W) -> TrackerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .map_err(|e| TrackerError::Export(e.to_string()))?;

    for &category in Category::all() {
        for item in data.items(category) {
            let cost = item.cost.map(|c| format!("{:.2}", c)).unwrap_or_default();
            let per_unit = item
                .per_unit()
                .map(|p| format!("{:.2}", p.per_unit()))
                .unwrap_or_default();

            csv_writer
                .write_record([
                    category.key().to_string(),
                    item.id.to_string(),
                    item.name.clone(),
                    item.created_at.to_rfc3339(),
                    item.updated_at.to_rfc3339(),
                    cost,
                    per_unit,
                    item.prices.len().to_string(),
                    format!("{:.2}", item.average_price()),
                    join_prices(&item.prices),
                ])
                .map_err(|e| TrackerError::Export(e.to_string()))?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    Ok(())
}

/// Export the live catalog to CSV
pub fn export_items_csv<W: Write>(storage: &Storage, writer: W) -> TrackerResult<()> {
    let data = storage.catalog.snapshot()?;
    write_items_csv(&data, writer)
}

fn join_prices(prices: &[PriceEntry]) -> String {
    prices
        .iter()
        .map(|p| format!("{:.2}", p.effective_value()))
        .collect::<Vec<_>>()
        .join(";")
}
