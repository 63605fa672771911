//! JSON snapshot export and import validation
//!
//! The snapshot is the stored layout itself: one object with the five
//! category arrays in fixed order. Import is all-or-nothing, so the whole
//! payload is checked before anything touches the live catalog.

use std::collections::HashSet;
use std::io::Write;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, Item};
use crate::services::duplicate::normalize_name;
use crate::storage::catalog::json_kind;
use crate::storage::{CatalogData, Storage};

/// File name used when the user gives no output path
pub fn default_export_filename(date: NaiveDate, extension: &str) -> String {
    format!("price-tracker-{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Write a catalog snapshot as JSON
pub fn write_snapshot_json<W: Write>(
    data: &CatalogData,
    writer: &mut W,
    pretty: bool,
) -> TrackerResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, data)
    } else {
        serde_json::to_writer(&mut *writer, data)
    }
    .map_err(|e| TrackerError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| TrackerError::Export(e.to_string()))?;
    Ok(())
}

/// Export the live catalog to JSON
pub fn export_snapshot_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> TrackerResult<()> {
    let data = storage.catalog.snapshot()?;
    write_snapshot_json(&data, writer, pretty)
}

/// Parse and validate a snapshot payload
///
/// Any problem is a [`TrackerError::Import`]; nothing partial is returned.
/// Extra top-level keys are ignored.
pub fn parse_snapshot(raw: &str) -> TrackerResult<CatalogData> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TrackerError::Import(format!("Not valid JSON: {}", e)))?;

    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(TrackerError::Import(format!(
                "Expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
    };

    let missing: Vec<&str> = Category::all()
        .iter()
        .map(|c| c.key())
        .filter(|key| !map.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(TrackerError::Import(format!(
            "Missing categories: {}",
            missing.join(", ")
        )));
    }

    let mut data = CatalogData::default();
    for &category in Category::all() {
        *data.items_mut(category) = parse_category(&map, category)?;
    }

    Ok(data)
}

fn parse_category(map: &Map<String, Value>, category: Category) -> TrackerResult<Vec<Item>> {
    let key = category.key();
    let entries = match map.get(key) {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(TrackerError::Import(format!(
                "'{}' must be an array, found {}",
                key,
                json_kind(other)
            )))
        }
        None => return Err(TrackerError::Import(format!("Missing category: {}", key))),
    };

    let mut items = Vec::with_capacity(entries.len());
    let mut names = HashSet::new();
    let mut ids = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let item: Item = serde_json::from_value(entry.clone())
            .map_err(|e| TrackerError::Import(format!("{}[{}]: {}", key, index, e)))?;

        item.validate()
            .map_err(|e| TrackerError::Import(format!("{}[{}]: {}", key, index, e)))?;

        if !names.insert(normalize_name(&item.name)) {
            return Err(TrackerError::Import(format!(
                "{}[{}]: duplicate name '{}'",
                key, index, item.name
            )));
        }
        if !ids.insert(item.id.clone()) {
            return Err(TrackerError::Import(format!(
                "{}[{}]: duplicate id '{}'",
                key, index, item.id
            )));
        }

        items.push(item);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceEntry;

    fn sample() -> CatalogData {
        let mut data = CatalogData::default();
        let mut knife = Item::new("Karambit");
        knife.add_price(PriceEntry::flat(1200.0).unwrap());
        data.skins.push(knife);

        let mut car = Item::new("Sedan");
        car.cost = Some(15000.0);
        data.cars.push(car);
        data
    }

    fn to_json(data: &CatalogData) -> String {
        let mut buffer = Vec::new();
        write_snapshot_json(data, &mut buffer, true).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_default_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(default_export_filename(date, "json"), "price-tracker-2025-03-09.json");
    }

    #[test]
    fn test_snapshot_has_five_keys_in_order() {
        let json = to_json(&sample());
        let positions: Vec<usize> = ["\"skins\"", "\"accessories\"", "\"items\"", "\"cars\"", "\"houses\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let data = sample();
        assert_eq!(to_json(&data), to_json(&data));
    }

    #[test]
    fn test_parse_exported_snapshot() {
        let data = sample();
        let parsed = parse_snapshot(&to_json(&data)).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let raw = r#"{"skins":[],"accessories":[],"items":[],"cars":[],"houses":[],"exportedAt":"x"}"#;
        assert!(parse_snapshot(raw).unwrap().is_empty());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let raw = r#"{"skins":[],"accessories":[],"items":[],"cars":[]}"#;
        let err = parse_snapshot(raw).unwrap_err();
        assert!(err.is_import());
        assert!(err.to_string().contains("houses"));
    }

    #[test]
    fn test_non_array_is_rejected() {
        let raw = r#"{"skins":{},"accessories":[],"items":[],"cars":[],"houses":[]}"#;
        let err = parse_snapshot(raw).unwrap_err();
        assert!(err.to_string().contains("'skins' must be an array, found object"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(parse_snapshot("[1, 2]").unwrap_err().is_import());
        assert!(parse_snapshot("not json").unwrap_err().is_import());
    }

    #[test]
    fn test_invalid_items_are_rejected() {
        let bad_price = r#"{"skins":[{"id":"1","name":"A","prices":[-5],
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}],
            "accessories":[],"items":[],"cars":[],"houses":[]}"#;
        assert!(parse_snapshot(bad_price).unwrap_err().is_import());

        let empty_name = r#"{"skins":[{"id":"1","name":"  ","prices":[],
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}],
            "accessories":[],"items":[],"cars":[],"houses":[]}"#;
        assert!(parse_snapshot(empty_name).unwrap_err().is_import());
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let dup_names = r#"{"skins":[
            {"id":"1","name":"Fade","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
            {"id":"2","name":" fade ","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}],
            "accessories":[],"items":[],"cars":[],"houses":[]}"#;
        let err = parse_snapshot(dup_names).unwrap_err();
        assert!(err.to_string().contains("duplicate name"));

        let dup_ids = r#"{"skins":[
            {"id":"1","name":"Fade","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
            {"id":"1","name":"Slate","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}],
            "accessories":[],"items":[],"cars":[],"houses":[]}"#;
        let err = parse_snapshot(dup_ids).unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn test_same_name_in_different_categories_is_fine() {
        let raw = r#"{"skins":[
            {"id":"1","name":"Fade","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}],
            "accessories":[
            {"id":"2","name":"Fade","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}],
            "items":[],"cars":[],"houses":[]}"#;
        let data = parse_snapshot(raw).unwrap();
        assert_eq!(data.total_items(), 2);
    }
}
