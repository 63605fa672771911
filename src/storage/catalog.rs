//! Catalog repository for JSON storage
//!
//! Holds the five category collections in memory and persists them as one
//! blob in `catalog.json`. Loading is defensive: each category recovers to an
//! empty collection on its own, so one corrupt field never blanks the rest.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TrackerError;
use crate::models::{Category, Item, ItemId};
use crate::services::normalize_name;

use super::file_io::{read_optional, write_json_atomic};

/// The whole catalog: one ordered item sequence per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub skins: Vec<Item>,
    pub accessories: Vec<Item>,
    pub items: Vec<Item>,
    pub cars: Vec<Item>,
    pub houses: Vec<Item>,
}

impl CatalogData {
    /// Items of one category
    pub fn items(&self, category: Category) -> &Vec<Item> {
        match category {
            Category::Skins => &self.skins,
            Category::Accessories => &self.accessories,
            Category::Items => &self.items,
            Category::Cars => &self.cars,
            Category::Houses => &self.houses,
        }
    }

    /// Mutable items of one category
    pub fn items_mut(&mut self, category: Category) -> &mut Vec<Item> {
        match category {
            Category::Skins => &mut self.skins,
            Category::Accessories => &mut self.accessories,
            Category::Items => &mut self.items,
            Category::Cars => &mut self.cars,
            Category::Houses => &mut self.houses,
        }
    }

    /// Total number of items across all categories
    pub fn total_items(&self) -> usize {
        Category::all().iter().map(|&c| self.items(c).len()).sum()
    }

    /// Check whether every category is empty
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Decode a stored blob, recovering each category independently
    ///
    /// Returns the decoded catalog plus the categories that had to be reset.
    pub fn from_json_lenient(raw: &str) -> (Self, Vec<Category>) {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Stored catalog is not valid JSON, starting fresh: {}", e);
                return (Self::default(), Category::all().to_vec());
            }
        };

        let map = match value {
            Value::Object(map) => map,
            other => {
                log::warn!(
                    "Stored catalog is a JSON {} instead of an object, starting fresh",
                    json_kind(&other)
                );
                return (Self::default(), Category::all().to_vec());
            }
        };

        let mut data = Self::default();
        let mut recovered = Vec::new();

        for &category in Category::all() {
            let Some(field) = map.get(category.key()) else {
                log::debug!("Stored catalog has no '{}' collection", category.key());
                continue;
            };

            match decode_category(field) {
                Ok(items) => *data.items_mut(category) = items,
                Err(reason) => {
                    log::warn!(
                        "Discarding stored '{}' collection: {}",
                        category.key(),
                        reason
                    );
                    recovered.push(category);
                }
            }
        }

        (data, recovered)
    }
}

fn decode_category(field: &Value) -> Result<Vec<Item>, String> {
    if !field.is_array() {
        return Err(format!("expected an array, found {}", json_kind(field)));
    }

    let items: Vec<Item> = serde_json::from_value(field.clone()).map_err(|e| e.to_string())?;
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for item in &items {
        item.validate()
            .map_err(|e| format!("item '{}': {}", item.id, e))?;
        if !names.insert(normalize_name(&item.name)) {
            return Err(format!("duplicate name '{}'", item.name));
        }
        if !ids.insert(&item.id) {
            return Err(format!("duplicate id '{}'", item.id));
        }
    }
    Ok(items)
}

/// Name of a JSON value's type for log messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Outcome of loading the stored catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Whether a stored blob existed at all
    pub found: bool,
    /// Categories that were reset to empty because their data was unusable
    pub recovered: Vec<Category>,
}

impl LoadReport {
    /// Check if any category had to be recovered
    pub fn had_recovery(&self) -> bool {
        !self.recovered.is_empty()
    }
}

/// Repository for catalog persistence
pub struct CatalogRepository {
    path: PathBuf,
    data: RwLock<CatalogData>,
}

impl CatalogRepository {
    /// Create a new catalog repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(CatalogData::default()),
        }
    }

    /// Path of the stored blob
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the catalog from disk
    ///
    /// Missing or malformed data never fails the load; the affected
    /// categories come back empty and are named in the report. A damaged
    /// blob is copied aside before anything can overwrite it.
    pub fn load(&self) -> Result<LoadReport, TrackerError> {
        let raw = match read_optional(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not read stored catalog, starting fresh: {}", e);
                let mut data = self.write_lock()?;
                *data = CatalogData::default();
                return Ok(LoadReport {
                    found: true,
                    recovered: Category::all().to_vec(),
                });
            }
        };

        let Some(raw) = raw else {
            log::info!("No stored catalog at {}, starting empty", self.path.display());
            let mut data = self.write_lock()?;
            *data = CatalogData::default();
            return Ok(LoadReport::default());
        };

        let (decoded, recovered) = CatalogData::from_json_lenient(&raw);
        if !recovered.is_empty() {
            self.preserve_damaged(&raw);
        }

        log::info!(
            "Loaded catalog with {} items from {}",
            decoded.total_items(),
            self.path.display()
        );

        let mut data = self.write_lock()?;
        *data = decoded;

        Ok(LoadReport {
            found: true,
            recovered,
        })
    }

    fn preserve_damaged(&self, raw: &str) {
        let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let aside = self.path.with_extension(format!("json.damaged-{}", stamp));
        match std::fs::write(&aside, raw) {
            Ok(()) => log::warn!("Kept a copy of the damaged catalog at {}", aside.display()),
            Err(e) => log::warn!("Could not keep a copy of the damaged catalog: {}", e),
        }
    }

    /// Save the whole catalog to disk
    ///
    /// Failures are reported as [`TrackerError::Persistence`]; the in-memory
    /// catalog is untouched either way.
    pub fn save(&self) -> Result<(), TrackerError> {
        let data = self.read_lock()?;
        write_json_atomic(&self.path, &*data, true).map_err(|e| {
            log::warn!("Failed to save catalog: {}", e);
            TrackerError::Persistence(e.to_string())
        })?;
        log::debug!("Saved catalog with {} items", data.total_items());
        Ok(())
    }

    /// Copy of the whole catalog
    pub fn snapshot(&self) -> Result<CatalogData, TrackerError> {
        Ok(self.read_lock()?.clone())
    }

    /// Get an item by ID
    pub fn get(&self, category: Category, id: &ItemId) -> Result<Option<Item>, TrackerError> {
        Ok(self
            .read_lock()?
            .items(category)
            .iter()
            .find(|item| &item.id == id)
            .cloned())
    }

    /// Run a read-only query against one category without copying it
    pub fn with_items<R>(
        &self,
        category: Category,
        f: impl FnOnce(&[Item]) -> R,
    ) -> Result<R, TrackerError> {
        let data = self.read_lock()?;
        Ok(f(data.items(category)))
    }

    /// Run a mutation against one category under a single write lock
    ///
    /// If `f` fails the collection must be left as it was.
    pub fn modify<R>(
        &self,
        category: Category,
        f: impl FnOnce(&mut Vec<Item>) -> Result<R, TrackerError>,
    ) -> Result<R, TrackerError> {
        let mut data = self.write_lock()?;
        f(data.items_mut(category))
    }

    /// Swap the whole catalog in one step, returning the previous contents
    pub fn replace_all(&self, new_data: CatalogData) -> Result<CatalogData, TrackerError> {
        let mut data = self.write_lock()?;
        Ok(std::mem::replace(&mut *data, new_data))
    }

    /// Number of items in a category
    pub fn count(&self, category: Category) -> Result<usize, TrackerError> {
        Ok(self.read_lock()?.items(category).len())
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, CatalogData>, TrackerError> {
        self.data
            .read()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, CatalogData>, TrackerError> {
        self.data
            .write()
            .map_err(|e| TrackerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
