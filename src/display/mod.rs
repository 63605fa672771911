//! Display formatting for terminal output
//!
//! Item tables and detail views, plus the compact amount format used in
//! lists (`1.5k`, `2.25M`). Exports and reports print exact amounts instead.

pub mod item;

pub use item::{format_item_details, format_item_list};

/// Format an amount compactly for list views
///
/// Thousands and millions are abbreviated with up to two decimals; smaller
/// amounts keep up to two decimals. Trailing zeros are dropped.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    if value >= 1_000_000.0 {
        format!("{}M", trim_decimals(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{}k", trim_decimals(value / 1_000.0))
    } else {
        trim_decimals(value)
    }
}

/// Format an amount with a currency symbol, optionally per unit
pub fn format_money(value: f64, symbol: &str, per_unit: bool) -> String {
    let suffix = if per_unit { "/unit" } else { "" };
    format!("{} {}{}", format_amount(value), symbol, suffix)
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}
