//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod export;
pub mod history;
pub mod import;
pub mod item;
pub mod price;
pub mod report;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::handle_export_command;
pub use history::handle_history_command;
pub use import::handle_import_command;
pub use item::{handle_item_command, ItemCommands};
pub use price::{handle_price_command, PriceCommands};
pub use report::handle_report_command;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{PerUnitCost, PriceEntry};
use crate::services::Outcome;

/// Tell the user when a change could not be written to disk
///
/// The change itself still applies for the rest of this run.
pub(crate) fn warn_if_unsaved<T>(outcome: &Outcome<T>) {
    if let Some(e) = &outcome.save_error {
        eprintln!("Warning: the change was applied but could not be saved: {}", e);
    }
}

/// Build per-unit inputs from a `--total`/`--quantity` pair
pub(crate) fn per_unit_from_args(
    total: Option<f64>,
    quantity: Option<f64>,
) -> TrackerResult<Option<PerUnitCost>> {
    match (total, quantity) {
        (Some(total), Some(quantity)) => PerUnitCost::new(total, quantity)
            .map(Some)
            .map_err(|e| TrackerError::Validation(e.to_string())),
        (None, None) => Ok(None),
        _ => Err(TrackerError::Validation(
            "--total and --quantity must be given together".into(),
        )),
    }
}

/// Build flat price entries from raw amounts
pub(crate) fn flat_prices(values: &[f64]) -> TrackerResult<Vec<PriceEntry>> {
    values
        .iter()
        .map(|&v| PriceEntry::flat(v).map_err(|e| TrackerError::Validation(e.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_unit_from_args() {
        assert!(per_unit_from_args(None, None).unwrap().is_none());

        let per_unit = per_unit_from_args(Some(100.0), Some(4.0)).unwrap().unwrap();
        assert_eq!(per_unit.per_unit(), 25.0);

        assert!(per_unit_from_args(Some(100.0), None).unwrap_err().is_validation());
        assert!(per_unit_from_args(Some(100.0), Some(0.0)).unwrap_err().is_validation());
    }

    #[test]
    fn test_flat_prices() {
        let prices = flat_prices(&[1.0, 2.5]).unwrap();
        assert_eq!(prices, vec![PriceEntry::Flat(1.0), PriceEntry::Flat(2.5)]);
        assert!(flat_prices(&[1.0, -2.0]).unwrap_err().is_validation());
    }
}
