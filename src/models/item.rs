//! Cataloged item model
//!
//! An item is one priced entity inside a category: a name, an ordered price
//! history, timestamps and a few category-specific optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ItemId;
use super::price::{average_price, check_amount, PerUnitCost, PriceEntry, PriceValidationError};

/// A cataloged item with its price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,

    /// Display name (stored trimmed)
    pub name: String,

    /// Observed prices in insertion order
    #[serde(default)]
    pub prices: Vec<PriceEntry>,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// When the item was last modified
    pub updated_at: DateTime<Utc>,

    /// Asset cost (cars and houses only)
    #[serde(default, alias = "govCost", skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    /// Whether the item is priced per unit (items category only)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_per_unit: bool,

    /// Total cost of the last per-unit purchase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,

    /// Quantity of the last per-unit purchase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

impl Item {
    /// Create a new item with no prices
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            name: name.into().trim().to_string(),
            prices: Vec::new(),
            created_at: now,
            updated_at: now,
            cost: None,
            is_per_unit: false,
            total_cost: None,
            quantity: None,
        }
    }

    /// Stamp the item as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Average of all recorded prices (0 when none)
    pub fn average_price(&self) -> f64 {
        average_price(&self.prices)
    }

    /// Per-unit inputs, if the item is priced per unit
    pub fn per_unit(&self) -> Option<PerUnitCost> {
        if !self.is_per_unit {
            return None;
        }
        match (self.total_cost, self.quantity) {
            (Some(total_cost), Some(quantity)) => PerUnitCost::new(total_cost, quantity).ok(),
            _ => None,
        }
    }

    /// Switch the item to per-unit pricing
    pub fn set_per_unit(&mut self, per_unit: PerUnitCost) {
        self.is_per_unit = true;
        self.total_cost = Some(per_unit.total_cost);
        self.quantity = Some(per_unit.quantity);
        self.touch();
    }

    /// Switch the item back to flat pricing
    pub fn clear_per_unit(&mut self) {
        self.is_per_unit = false;
        self.total_cost = None;
        self.quantity = None;
        self.touch();
    }

    /// Append a price observation
    pub fn add_price(&mut self, entry: PriceEntry) {
        self.prices.push(entry);
        self.touch();
    }

    /// Remove the price at `index`, returning it
    pub fn remove_price(&mut self, index: usize) -> Option<PriceEntry> {
        if index >= self.prices.len() {
            return None;
        }
        let removed = self.prices.remove(index);
        self.touch();
        Some(removed)
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }

        if let Some(cost) = self.cost {
            check_amount(cost).map_err(ItemValidationError::Cost)?;
        }

        if let Some(total) = self.total_cost {
            check_amount(total).map_err(ItemValidationError::PerUnit)?;
        }

        if let Some(quantity) = self.quantity {
            if !(quantity.is_finite() && quantity > 0.0) {
                return Err(ItemValidationError::PerUnit(
                    PriceValidationError::NonPositiveQuantity(quantity),
                ));
            }
        }

        if self.is_per_unit && (self.total_cost.is_none() || self.quantity.is_none()) {
            return Err(ItemValidationError::IncompletePerUnit);
        }

        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Field values for a new item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub cost: Option<f64>,
    pub per_unit: Option<PerUnitCost>,
}

impl ItemDraft {
    /// Draft with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the asset cost
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Price the item per unit
    pub fn with_per_unit(mut self, per_unit: PerUnitCost) -> Self {
        self.per_unit = Some(per_unit);
        self
    }

    /// Build the item with a fresh id and equal created/updated timestamps
    pub fn into_item(self) -> Item {
        let mut item = Item::new(self.name);
        item.cost = self.cost;
        if let Some(per_unit) = self.per_unit {
            item.is_per_unit = true;
            item.total_cost = Some(per_unit.total_cost);
            item.quantity = Some(per_unit.quantity);
            item.prices.push(per_unit.to_entry());
        }
        item
    }
}

/// Changes to apply to an existing item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    /// New name
    pub name: Option<String>,
    /// New asset cost
    pub cost: Option<f64>,
    /// Remove the asset cost
    pub clear_cost: bool,
    /// New per-unit inputs
    pub per_unit: Option<PerUnitCost>,
    /// Switch back to flat pricing
    pub clear_per_unit: bool,
    /// Replacement price list
    pub prices: Option<Vec<PriceEntry>>,
}

impl ItemPatch {
    /// Check whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cost.is_none()
            && !self.clear_cost
            && self.per_unit.is_none()
            && !self.clear_per_unit
            && self.prices.is_none()
    }

    /// Apply the patch to `item`, stamping `updated_at`
    ///
    /// Name normalization and duplicate checks are the caller's job.
    pub fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }

        if self.clear_cost {
            item.cost = None;
        } else if let Some(cost) = self.cost {
            item.cost = Some(cost);
        }

        if let Some(prices) = self.prices {
            item.prices = prices;
        }

        if self.clear_per_unit {
            item.clear_per_unit();
        } else if let Some(per_unit) = self.per_unit {
            item.set_per_unit(per_unit);
            if item.prices.is_empty() {
                item.prices.push(per_unit.to_entry());
            }
        }

        item.touch();
    }
}

/// Validation errors for items
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValidationError {
    EmptyName,
    Cost(PriceValidationError),
    PerUnit(PriceValidationError),
    IncompletePerUnit,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Item name cannot be empty"),
            Self::Cost(e) => write!(f, "Invalid cost: {}", e),
            Self::PerUnit(e) => write!(f, "Invalid per-unit price: {}", e),
            Self::IncompletePerUnit => {
                write!(f, "Per-unit items need both a total cost and a quantity")
            }
        }
    }
}

impl std::error::Error for ItemValidationError {}
