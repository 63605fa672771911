//! Price CLI commands
//!
//! Record and remove price observations. Indexes are 1-based here, matching
//! the numbering in `item show`.

use clap::Subcommand;

use super::{per_unit_from_args, warn_if_unsaved};
use crate::config::settings::Settings;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, PriceEntry};
use crate::services::CatalogService;
use crate::storage::Storage;

/// Price subcommands
#[derive(Subcommand)]
pub enum PriceCommands {
    /// Record a price for an item
    Add {
        /// Category
        category: Category,
        /// Item name or ID
        item: String,
        /// Observed price
        #[arg(required_unless_present = "total", conflicts_with = "total")]
        value: Option<f64>,
        /// Total cost, priced per unit together with --quantity
        #[arg(long, requires = "quantity")]
        total: Option<f64>,
        /// Quantity bought for --total
        #[arg(long, requires = "total")]
        quantity: Option<f64>,
    },

    /// Remove a recorded price
    Remove {
        /// Category
        category: Category,
        /// Item name or ID
        item: String,
        /// Price number as shown by `item show` (starting at 1)
        index: usize,
    },
}

/// Handle a price command
pub fn handle_price_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PriceCommands,
) -> TrackerResult<()> {
    let service = CatalogService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        PriceCommands::Add {
            category,
            item,
            value,
            total,
            quantity,
        } => {
            let entry = match (value, per_unit_from_args(total, quantity)?) {
                (Some(value), None) => {
                    PriceEntry::flat(value).map_err(|e| TrackerError::Validation(e.to_string()))?
                }
                (None, Some(per_unit)) => per_unit.to_entry(),
                _ => {
                    return Err(TrackerError::Validation(
                        "Give either a price or --total with --quantity".into(),
                    ))
                }
            };

            let existing = service.require(category, &item)?;
            let outcome = service.add_price(category, &existing.id, entry)?;
            warn_if_unsaved(&outcome);

            let updated = outcome.value;
            println!("Recorded price {} {} for {}", entry, currency, updated.name);
            println!(
                "  Average over {} price{}: {:.2} {}",
                updated.prices.len(),
                if updated.prices.len() == 1 { "" } else { "s" },
                updated.average_price(),
                currency
            );
        }

        PriceCommands::Remove {
            category,
            item,
            index,
        } => {
            if index == 0 {
                return Err(TrackerError::Validation(
                    "Price numbers start at 1".into(),
                ));
            }

            let existing = service.require(category, &item)?;
            let outcome = service
                .remove_price(category, &existing.id, index - 1)
                .map_err(|e| match e {
                    TrackerError::Index { len, .. } => TrackerError::Index { index, len },
                    other => other,
                })?;
            warn_if_unsaved(&outcome);

            let (removed, updated) = outcome.value;
            println!("Removed price #{} ({} {}) from {}", index, removed, currency, updated.name);
            println!(
                "  Average now: {:.2} {}",
                updated.average_price(),
                currency
            );
        }
    }

    Ok(())
}
