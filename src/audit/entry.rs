//! Audit entry data structures
//!
//! Defines the structure of audit log entries: what happened, to which
//! catalog entity, in which category, and the before/after state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Item};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// The whole catalog was replaced from a snapshot
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Item,
    Price,
    Catalog,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Item => write!(f, "Item"),
            EntityType::Price => write!(f, "Price"),
            EntityType::Catalog => write!(f, "Catalog"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Category the entity lives in (absent for catalog-wide operations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// ID of the affected entity
    pub entity_id: String,

    /// Item name at the time of the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// State before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// State after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable change summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn for_item(operation: Operation, entity_type: EntityType, category: Category, item: &Item) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            category: Some(category),
            entity_id: item.id.to_string(),
            entity_name: Some(item.name.clone()),
            before: None,
            after: None,
            summary: None,
        }
    }

    /// Entry for a newly created item
    pub fn item_created(category: Category, item: &Item) -> Self {
        Self {
            after: serde_json::to_value(item).ok(),
            ..Self::for_item(Operation::Create, EntityType::Item, category, item)
        }
    }

    /// Entry for an edited item
    pub fn item_updated(category: Category, before: &Item, after: &Item, summary: Option<String>) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            summary,
            ..Self::for_item(Operation::Update, EntityType::Item, category, after)
        }
    }

    /// Entry for a deleted item (its prices go with it)
    pub fn item_deleted(category: Category, item: &Item) -> Self {
        Self {
            before: serde_json::to_value(item).ok(),
            ..Self::for_item(Operation::Delete, EntityType::Item, category, item)
        }
    }

    /// Entry for a price added to or removed from an item
    pub fn price_changed(
        operation: Operation,
        category: Category,
        item: &Item,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            after: serde_json::to_value(&item.prices).ok(),
            summary: Some(summary.into()),
            ..Self::for_item(operation, EntityType::Price, category, item)
        }
    }

    /// Entry for a whole-catalog import
    pub fn catalog_imported(source: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Import,
            entity_type: EntityType::Catalog,
            category: None,
            entity_id: source.into(),
            entity_name: None,
            before: None,
            after: None,
            summary: Some(summary.into()),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
        );

        if let Some(category) = self.category {
            output.push_str(&format!(" {}/{}", category.key(), self.entity_id));
        } else {
            output.push_str(&format!(" {}", self.entity_id));
        }

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(summary) = &self.summary {
            output.push_str(&format!("\n  Changes: {}", summary));
        }

        output
    }
}
