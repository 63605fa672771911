//! Catalog Summary Report
//!
//! Per-category totals: how many items are tracked, how many carry prices,
//! and which item averages the highest.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::models::Category;
use crate::storage::CatalogData;

/// Totals for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: Category,
    /// Items in the category
    pub item_count: usize,
    /// Items with at least one price
    pub priced_count: usize,
    /// Price observations across all items
    pub observation_count: usize,
    /// Mean of the priced items' averages (0 when nothing is priced)
    pub mean_average: f64,
    /// Name and average of the highest-averaging item
    pub top_item: Option<(String, f64)>,
}

/// Summarize every category in fixed order
pub fn summarize(data: &CatalogData) -> Vec<CategorySummary> {
    Category::all()
        .iter()
        .map(|&category| summarize_category(data, category))
        .collect()
}

fn summarize_category(data: &CatalogData, category: Category) -> CategorySummary {
    let items = data.items(category);

    let mut priced_count = 0;
    let mut observation_count = 0;
    let mut average_sum = 0.0;
    let mut top_item: Option<(String, f64)> = None;

    for item in items {
        observation_count += item.prices.len();
        if item.prices.is_empty() {
            continue;
        }

        let average = item.average_price();
        priced_count += 1;
        average_sum += average;

        // First item wins ties, matching the stable price ordering
        let replace = match &top_item {
            Some((_, best)) => average > *best,
            None => true,
        };
        if replace {
            top_item = Some((item.name.clone(), average));
        }
    }

    let mean_average = if priced_count == 0 {
        0.0
    } else {
        average_sum / priced_count as f64
    };

    CategorySummary {
        category,
        item_count: items.len(),
        priced_count,
        observation_count,
        mean_average,
        top_item,
    }
}

/// Whole-catalog report
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub categories: Vec<CategorySummary>,
}

impl CatalogReport {
    /// Generate the report from a catalog snapshot
    pub fn generate(data: &CatalogData) -> Self {
        Self {
            categories: summarize(data),
        }
    }

    /// Total items across all categories
    pub fn total_items(&self) -> usize {
        self.categories.iter().map(|c| c.item_count).sum()
    }

    /// Total price observations across all categories
    pub fn total_observations(&self) -> usize {
        self.categories.iter().map(|c| c.observation_count).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Catalog Summary\n");
        output.push_str(&"=".repeat(78));
        output.push('\n');

        output.push_str(&format!(
            "{:<14} {:>6} {:>7} {:>7} {:>14}  {}\n",
            "Category", "Items", "Priced", "Prices", "Mean avg", "Top item"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for summary in &self.categories {
            let top = match &summary.top_item {
                Some((name, average)) => format!("{} ({:.2} {})", name, average, currency),
                None => "-".to_string(),
            };
            output.push_str(&format!(
                "{:<14} {:>6} {:>7} {:>7} {:>14}  {}\n",
                summary.category.label(),
                summary.item_count,
                summary.priced_count,
                summary.observation_count,
                format!("{:.2} {}", summary.mean_average, currency),
                top
            ));
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<14} {:>6} {:>7} {:>7}\n",
            "TOTAL",
            self.total_items(),
            "",
            self.total_observations()
        ));

        output
    }

    /// Export the report as CSV
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TrackerResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record([
                "Category",
                "Items",
                "Priced Items",
                "Price Observations",
                "Mean Average",
                "Top Item",
                "Top Average",
            ])
            .map_err(|e| TrackerError::Export(e.to_string()))?;

        for summary in &self.categories {
            let (top_name, top_average) = match &summary.top_item {
                Some((name, average)) => (name.clone(), format!("{:.2}", average)),
                None => (String::new(), String::new()),
            };
            csv_writer
                .write_record([
                    summary.category.key().to_string(),
                    summary.item_count.to_string(),
                    summary.priced_count.to_string(),
                    summary.observation_count.to_string(),
                    format!("{:.2}", summary.mean_average),
                    top_name,
                    top_average,
                ])
                .map_err(|e| TrackerError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| TrackerError::Export(e.to_string()))?;
        Ok(())
    }
}
