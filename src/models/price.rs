//! Price observations
//!
//! A price is either a flat amount or a total cost spread over a quantity.
//! The variant is decided once, at construction; everything downstream reads
//! the uniform [`PriceEntry::effective_value`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceEntry", into = "RawPriceEntry")]
pub enum PriceEntry {
    /// A plain observed price
    Flat(f64),
    /// A total cost for a quantity of units
    Computed { total_cost: f64, quantity: f64 },
}

impl PriceEntry {
    /// Create a flat price entry
    pub fn flat(value: f64) -> Result<Self, PriceValidationError> {
        check_amount(value)?;
        Ok(Self::Flat(value))
    }

    /// Create a per-unit price entry from a total and a quantity
    pub fn computed(total_cost: f64, quantity: f64) -> Result<Self, PriceValidationError> {
        check_amount(total_cost)?;
        check_quantity(quantity)?;
        Ok(Self::Computed {
            total_cost,
            quantity,
        })
    }

    /// The value used for aggregation
    pub fn effective_value(&self) -> f64 {
        match *self {
            Self::Flat(value) => value,
            Self::Computed {
                total_cost,
                quantity,
            } => total_cost / quantity,
        }
    }
}

impl fmt::Display for PriceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Flat(value) => write!(f, "{}", value),
            Self::Computed {
                total_cost,
                quantity,
            } => write!(f, "{} ({} / {})", total_cost / quantity, total_cost, quantity),
        }
    }
}

/// Arithmetic mean of the entries' effective values; 0 when there are none
pub fn average_price(prices: &[PriceEntry]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let sum: f64 = prices.iter().map(PriceEntry::effective_value).sum();
    sum / prices.len() as f64
}

/// Per-unit pricing inputs: a total cost and the number of units it bought
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerUnitCost {
    pub total_cost: f64,
    pub quantity: f64,
}

impl PerUnitCost {
    /// Validate and build per-unit inputs
    pub fn new(total_cost: f64, quantity: f64) -> Result<Self, PriceValidationError> {
        check_amount(total_cost)?;
        check_quantity(quantity)?;
        Ok(Self {
            total_cost,
            quantity,
        })
    }

    /// The computed price entry for these inputs
    pub fn to_entry(self) -> PriceEntry {
        PriceEntry::Computed {
            total_cost: self.total_cost,
            quantity: self.quantity,
        }
    }

    /// Price of a single unit
    pub fn per_unit(&self) -> f64 {
        self.total_cost / self.quantity
    }
}

/// Validate a monetary amount (finite and non-negative)
pub fn check_amount(value: f64) -> Result<(), PriceValidationError> {
    if !value.is_finite() {
        return Err(PriceValidationError::NotFinite);
    }
    if value < 0.0 {
        return Err(PriceValidationError::NegativeAmount(value));
    }
    Ok(())
}

fn check_quantity(quantity: f64) -> Result<(), PriceValidationError> {
    if !quantity.is_finite() {
        return Err(PriceValidationError::NotFinite);
    }
    if quantity <= 0.0 {
        return Err(PriceValidationError::NonPositiveQuantity(quantity));
    }
    Ok(())
}

/// Validation errors for price entries
#[derive(Debug, Clone, PartialEq)]
pub enum PriceValidationError {
    NegativeAmount(f64),
    NonPositiveQuantity(f64),
    NotFinite,
}

impl fmt::Display for PriceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(v) => write!(f, "Amount cannot be negative ({})", v),
            Self::NonPositiveQuantity(q) => {
                write!(f, "Quantity must be greater than zero ({})", q)
            }
            Self::NotFinite => write!(f, "Amount must be a finite number"),
        }
    }
}

impl std::error::Error for PriceValidationError {}

/// Wire shape: a bare number, or a total/quantity record
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPriceEntry {
    Flat(f64),
    Computed {
        #[serde(rename = "totalCost")]
        total_cost: f64,
        quantity: f64,
        /// Derived; written for readers of the file, ignored on load
        #[serde(rename = "perUnit", default, skip_deserializing)]
        per_unit: f64,
    },
}

impl TryFrom<RawPriceEntry> for PriceEntry {
    type Error = PriceValidationError;

    fn try_from(raw: RawPriceEntry) -> Result<Self, Self::Error> {
        match raw {
            RawPriceEntry::Flat(value) => PriceEntry::flat(value),
            RawPriceEntry::Computed {
                total_cost,
                quantity,
                ..
            } => PriceEntry::computed(total_cost, quantity),
        }
    }
}

impl From<PriceEntry> for RawPriceEntry {
    fn from(entry: PriceEntry) -> Self {
        match entry {
            PriceEntry::Flat(value) => RawPriceEntry::Flat(value),
            PriceEntry::Computed {
                total_cost,
                quantity,
            } => RawPriceEntry::Computed {
                total_cost,
                quantity,
                per_unit: total_cost / quantity,
            },
        }
    }
}
