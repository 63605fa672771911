//! Item CLI commands
//!
//! Implements CLI commands for adding, listing, editing and deleting items.

use clap::Subcommand;

use super::{flat_prices, per_unit_from_args, warn_if_unsaved};
use crate::config::settings::Settings;
use crate::display::{format_item_details, format_item_list};
use crate::error::TrackerResult;
use crate::models::{Category, ItemDraft, ItemPatch};
use crate::reports::SortKey;
use crate::services::CatalogService;
use crate::storage::Storage;

/// Item subcommands
#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add a new item
    Add {
        /// Category (skins, accessories, items, cars, houses)
        category: Category,
        /// Item name
        name: String,
        /// Asset cost (cars and houses)
        #[arg(long)]
        cost: Option<f64>,
        /// Total cost of a per-unit purchase (items)
        #[arg(long, requires = "quantity")]
        total: Option<f64>,
        /// Quantity of a per-unit purchase (items)
        #[arg(long, requires = "total")]
        quantity: Option<f64>,
    },

    /// List items in a category
    List {
        /// Category
        category: Category,
        /// Only show items whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Sort order: name, date or price
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show item details
    Show {
        /// Category
        category: Category,
        /// Item name or ID
        item: String,
    },

    /// Edit an item
    Edit {
        /// Category
        category: Category,
        /// Item name or ID
        item: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New asset cost
        #[arg(long, conflicts_with = "clear_cost")]
        cost: Option<f64>,
        /// Remove the asset cost
        #[arg(long)]
        clear_cost: bool,
        /// New per-unit total cost
        #[arg(long, requires = "quantity", conflicts_with = "clear_per_unit")]
        total: Option<f64>,
        /// New per-unit quantity
        #[arg(long, requires = "total")]
        quantity: Option<f64>,
        /// Switch back to flat pricing
        #[arg(long)]
        clear_per_unit: bool,
        /// Replace the price list (comma-separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "clear_prices")]
        prices: Option<Vec<f64>>,
        /// Remove every recorded price
        #[arg(long)]
        clear_prices: bool,
    },

    /// Delete an item and its prices
    Delete {
        /// Category
        category: Category,
        /// Item name or ID
        item: String,
    },
}

/// Handle an item command
pub fn handle_item_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ItemCommands,
) -> TrackerResult<()> {
    let service = CatalogService::new(storage);
    let currency = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        ItemCommands::Add {
            category,
            name,
            cost,
            total,
            quantity,
        } => {
            let draft = ItemDraft {
                name,
                cost,
                per_unit: per_unit_from_args(total, quantity)?,
            };
            let outcome = service.add(category, draft)?;
            warn_if_unsaved(&outcome);

            let item = outcome.value;
            println!("Added {} item: {}", category.key(), item.name);
            println!("  ID: {}", item.id);
            if !item.prices.is_empty() {
                println!("  Average price: {:.2} {}", item.average_price(), currency);
            }
        }

        ItemCommands::List {
            category,
            search,
            sort,
        } => {
            let sort = sort
                .as_deref()
                .map(SortKey::parse)
                .unwrap_or(settings.default_sort);
            let items = service.list(category, search.as_deref(), sort)?;

            if items.is_empty() && search.is_some() && service.count(category)? > 0 {
                println!("No {} match the search.", category.label().to_lowercase());
            } else {
                println!("{}", format_item_list(category, &items, currency, date_format));
            }
        }

        ItemCommands::Show { category, item } => {
            let item = service.require(category, &item)?;
            print!("{}", format_item_details(category, &item, currency, date_format));
        }

        ItemCommands::Edit {
            category,
            item,
            name,
            cost,
            clear_cost,
            total,
            quantity,
            clear_per_unit,
            prices,
            clear_prices,
        } => {
            let existing = service.require(category, &item)?;

            let prices = if clear_prices {
                Some(Vec::new())
            } else {
                prices.as_deref().map(flat_prices).transpose()?
            };

            let patch = ItemPatch {
                name,
                cost,
                clear_cost,
                per_unit: per_unit_from_args(total, quantity)?,
                clear_per_unit,
                prices,
            };

            let outcome = service.update(category, &existing.id, patch)?;
            warn_if_unsaved(&outcome);
            println!("Updated item: {}", outcome.value.name);
        }

        ItemCommands::Delete { category, item } => {
            let existing = service.require(category, &item)?;
            let outcome = service.remove(category, &existing.id)?;
            warn_if_unsaved(&outcome);

            let removed = outcome.value;
            println!(
                "Deleted item: {} ({} price{} removed)",
                removed.name,
                removed.prices.len(),
                if removed.prices.len() == 1 { "" } else { "s" }
            );
        }
    }

    Ok(())
}
