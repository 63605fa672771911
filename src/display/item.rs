//! Item display formatting
//!
//! Formats items for terminal output in table and detail views.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use super::{format_amount, format_money};
use crate::models::{Category, Item};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Prices")]
    price_count: usize,
    #[tabled(rename = "Average")]
    average: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Format a category's items as a table
pub fn format_item_list(
    category: Category,
    items: &[Item],
    currency: &str,
    date_format: &str,
) -> String {
    if items.is_empty() {
        return format!(
            "No {} found.\n\nAdd one with 'pricetrack item add {} <name>'.",
            category.label().to_lowercase(),
            category.key()
        );
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|item| ItemRow {
            id: item.id.short().to_string(),
            name: item.name.clone(),
            price_count: item.prices.len(),
            average: format_money(item.average_price(), currency, item.is_per_unit),
            cost: item
                .cost
                .map(|c| format_money(c, currency, false))
                .unwrap_or_default(),
            updated: item.updated_at.format(date_format).to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(2..5), Alignment::right());

    format!(
        "{} ({})\n{}\n",
        category.label(),
        items.len(),
        table
    )
}

/// Format a single item's details
pub fn format_item_details(
    category: Category,
    item: &Item,
    currency: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Item: {}\n", item.name));
    output.push_str(&format!("  Category:   {}\n", category.label()));
    output.push_str(&format!("  ID:         {}\n", item.id));
    output.push_str(&format!(
        "  Created:    {}\n",
        item.created_at.format(date_format)
    ));
    output.push_str(&format!(
        "  Updated:    {}\n",
        item.updated_at.format(date_format)
    ));

    if let Some(cost) = item.cost {
        output.push_str(&format!("  Cost:       {:.2} {}\n", cost, currency));
    }

    if let Some(per_unit) = item.per_unit() {
        output.push_str(&format!(
            "  Per unit:   {:.2} {} for {} = {:.2} {}/unit\n",
            per_unit.total_cost,
            currency,
            format_amount(per_unit.quantity),
            per_unit.per_unit(),
            currency
        ));
    }

    output.push_str(&format!(
        "  Average:    {:.2} {}\n",
        item.average_price(),
        currency
    ));

    if item.prices.is_empty() {
        output.push_str("\n  No prices recorded.\n");
    } else {
        output.push_str(&format!("\n  Prices ({}):\n", item.prices.len()));
        for (index, entry) in item.prices.iter().enumerate() {
            output.push_str(&format!("    {:>3}. {} {}\n", index + 1, entry, currency));
        }
    }

    output
}
