//! Catalog service
//!
//! Business logic for items and their price histories: creation, editing,
//! deletion, price observations and the read-side queries used by the list
//! and detail views. Every mutation persists the whole catalog afterwards.

use crate::audit::{AuditEntry, Operation};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Category, Item, ItemDraft, ItemId, ItemPatch, PriceEntry};
use crate::reports::{sort_in_place, SortKey};
use crate::storage::Storage;

use super::duplicate::{is_duplicate, normalize_name};

/// Result of a mutation that has already been applied in memory
///
/// `save_error` is set when writing the catalog to disk failed. The change
/// still stands for the rest of the session.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub save_error: Option<TrackerError>,
}

impl<T> Outcome<T> {
    /// Whether the change reached disk
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            save_error: self.save_error,
        }
    }
}

/// Items whose name contains `search`, case-insensitively, in stored order
///
/// An empty search matches everything. Nothing is copied.
pub fn filter_items<'i>(items: &'i [Item], search: &str) -> impl Iterator<Item = &'i Item> + 'i {
    let needle = search.trim().to_lowercase();
    items
        .iter()
        .filter(move |item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
}

/// Service for catalog management
pub struct CatalogService<'a> {
    storage: &'a Storage,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    // === Commands ===

    /// Add a new item to a category
    pub fn add(&self, category: Category, draft: ItemDraft) -> TrackerResult<Outcome<Item>> {
        if draft.name.trim().is_empty() {
            return Err(TrackerError::Validation("Item name cannot be empty".into()));
        }
        check_category_fields(category, draft.cost.is_some(), draft.per_unit.is_some())?;

        let item = draft.into_item();
        item.validate()
            .map_err(|e| TrackerError::Validation(e.to_string()))?;

        let created = item.clone();
        self.storage.catalog.modify(category, move |items| {
            if is_duplicate(items, &item.name, None) {
                return Err(TrackerError::duplicate_item(item.name));
            }
            items.push(item);
            Ok(())
        })?;

        log::info!("Added {} item '{}' ({})", category.key(), created.name, created.id);
        self.storage
            .record(AuditEntry::item_created(category, &created));

        Ok(self.persisted(created))
    }

    /// Apply a patch to an existing item
    pub fn update(
        &self,
        category: Category,
        id: &ItemId,
        patch: ItemPatch,
    ) -> TrackerResult<Outcome<Item>> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(TrackerError::Validation("Item name cannot be empty".into()));
            }
        }
        check_category_fields(category, patch.cost.is_some(), patch.per_unit.is_some())?;

        let summary = describe_patch(&patch);
        let (before, after) = self.storage.catalog.modify(category, |items| {
            let position = position_of(items, id)?;

            if let Some(name) = &patch.name {
                if is_duplicate(items, name, Some(id)) {
                    return Err(TrackerError::duplicate_item(name.trim()));
                }
            }

            let before = items[position].clone();
            let mut updated = before.clone();
            patch.apply(&mut updated);
            updated
                .validate()
                .map_err(|e| TrackerError::Validation(e.to_string()))?;

            items[position] = updated.clone();
            Ok((before, updated))
        })?;

        log::info!("Updated {} item '{}' ({})", category.key(), after.name, after.id);
        self.storage
            .record(AuditEntry::item_updated(category, &before, &after, summary));

        Ok(self.persisted(after))
    }

    /// Delete an item and all of its prices
    ///
    /// Deleting an id that is not there is an error, including a second
    /// delete of the same item.
    pub fn remove(&self, category: Category, id: &ItemId) -> TrackerResult<Outcome<Item>> {
        let removed = self.storage.catalog.modify(category, |items| {
            let position = position_of(items, id)?;
            Ok(items.remove(position))
        })?;

        log::info!("Deleted {} item '{}' ({})", category.key(), removed.name, removed.id);
        self.storage
            .record(AuditEntry::item_deleted(category, &removed));

        Ok(self.persisted(removed))
    }

    /// Record a price observation for an item
    pub fn add_price(
        &self,
        category: Category,
        id: &ItemId,
        entry: PriceEntry,
    ) -> TrackerResult<Outcome<Item>> {
        let updated = self.storage.catalog.modify(category, |items| {
            let position = position_of(items, id)?;
            items[position].add_price(entry);
            Ok(items[position].clone())
        })?;

        log::debug!("Added price {} to '{}'", entry, updated.name);
        self.storage.record(AuditEntry::price_changed(
            Operation::Create,
            category,
            &updated,
            format!("added price {}", entry),
        ));

        Ok(self.persisted(updated))
    }

    /// Remove the price at a zero-based `index`, returning it with the updated item
    pub fn remove_price(
        &self,
        category: Category,
        id: &ItemId,
        index: usize,
    ) -> TrackerResult<Outcome<(PriceEntry, Item)>> {
        let (removed, updated) = self.storage.catalog.modify(category, |items| {
            let position = position_of(items, id)?;
            let item = &mut items[position];
            let len = item.prices.len();
            let removed = item
                .remove_price(index)
                .ok_or(TrackerError::Index { index, len })?;
            Ok((removed, item.clone()))
        })?;

        log::debug!("Removed price #{} ({}) from '{}'", index, removed, updated.name);
        self.storage.record(AuditEntry::price_changed(
            Operation::Delete,
            category,
            &updated,
            format!("removed price #{} ({})", index + 1, removed),
        ));

        Ok(self.persisted((removed, updated)))
    }

    // === Queries ===

    /// Items of a category filtered by name and ordered by `sort`
    ///
    /// The stored order is never changed.
    pub fn list(
        &self,
        category: Category,
        search: Option<&str>,
        sort: SortKey,
    ) -> TrackerResult<Vec<Item>> {
        let mut items = self.storage.catalog.with_items(category, |items| {
            filter_items(items, search.unwrap_or(""))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        sort_in_place(&mut items, sort);
        Ok(items)
    }

    /// Get an item by ID
    pub fn get(&self, category: Category, id: &ItemId) -> TrackerResult<Option<Item>> {
        self.storage.catalog.get(category, id)
    }

    /// Find an item by name or ID string
    ///
    /// Names match after trimming and lowercasing. Failing that, the full id
    /// matches, and so does the short id shown in lists when it is unique.
    pub fn find(&self, category: Category, identifier: &str) -> TrackerResult<Option<Item>> {
        let normalized = normalize_name(identifier);
        if normalized.is_empty() {
            return Ok(None);
        }

        self.storage.catalog.with_items(category, |items| {
            if let Some(item) = items.iter().find(|i| normalize_name(&i.name) == normalized) {
                return Some(item.clone());
            }

            let wanted = identifier.trim();
            if let Some(item) = items.iter().find(|i| i.id.as_str() == wanted) {
                return Some(item.clone());
            }

            let mut by_short = items.iter().filter(|i| i.id.short() == wanted);
            match (by_short.next(), by_short.next()) {
                (Some(item), None) => Some(item.clone()),
                _ => None,
            }
        })
    }

    /// Find an item or fail with a not-found error
    pub fn require(&self, category: Category, identifier: &str) -> TrackerResult<Item> {
        self.find(category, identifier)?
            .ok_or_else(|| TrackerError::item_not_found(identifier.trim()))
    }

    /// Average price of one item (0 when it has no prices)
    pub fn average_price(&self, category: Category, id: &ItemId) -> TrackerResult<f64> {
        self.get(category, id)?
            .map(|item| item.average_price())
            .ok_or_else(|| TrackerError::item_not_found(id.as_str()))
    }

    /// Whether `name` is already taken in the category
    pub fn is_duplicate_name(
        &self,
        category: Category,
        name: &str,
        exclude: Option<&ItemId>,
    ) -> TrackerResult<bool> {
        self.storage
            .catalog
            .with_items(category, |items| is_duplicate(items, name, exclude))
    }

    /// Number of items in a category
    pub fn count(&self, category: Category) -> TrackerResult<usize> {
        self.storage.catalog.count(category)
    }

    fn persisted<T>(&self, value: T) -> Outcome<T> {
        Outcome {
            value,
            save_error: self.storage.save_all().err(),
        }
    }
}

fn position_of(items: &[Item], id: &ItemId) -> TrackerResult<usize> {
    items
        .iter()
        .position(|item| &item.id == id)
        .ok_or_else(|| TrackerError::item_not_found(id.as_str()))
}

fn check_category_fields(category: Category, has_cost: bool, has_per_unit: bool) -> TrackerResult<()> {
    if has_cost && !category.tracks_cost() {
        return Err(TrackerError::Validation(format!(
            "{} items do not track a cost",
            category.label()
        )));
    }
    if has_per_unit && !category.supports_per_unit() {
        return Err(TrackerError::Validation(format!(
            "{} items cannot be priced per unit",
            category.label()
        )));
    }
    Ok(())
}

fn describe_patch(patch: &ItemPatch) -> Option<String> {
    let mut changes = Vec::new();
    if let Some(name) = &patch.name {
        changes.push(format!("name -> '{}'", name.trim()));
    }
    if patch.clear_cost {
        changes.push("cost cleared".to_string());
    } else if let Some(cost) = patch.cost {
        changes.push(format!("cost -> {}", cost));
    }
    if let Some(prices) = &patch.prices {
        changes.push(format!("prices replaced ({} entries)", prices.len()));
    }
    if patch.clear_per_unit {
        changes.push("per-unit pricing off".to_string());
    } else if let Some(per_unit) = &patch.per_unit {
        changes.push(format!(
            "per-unit {} / {}",
            per_unit.total_cost, per_unit.quantity
        ));
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::PerUnitCost;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add(service: &CatalogService, category: Category, name: &str) -> Item {
        service
            .add(category, ItemDraft::named(name))
            .unwrap()
            .into_value()
    }

    #[test]
    fn test_add_item() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let outcome = service.add(Category::Skins, ItemDraft::named("Dragon Lore")).unwrap();
        assert!(outcome.is_saved());
        let item = outcome.value;
        assert_eq!(item.created_at, item.updated_at);

        let listed = service.list(Category::Skins, None, SortKey::Insertion).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Dragon Lore");
        assert_eq!(listed[0].id, item.id);
    }

    #[test]
    fn test_add_rejects_normalized_duplicate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        add(&service, Category::Skins, "Dragon Lore");
        let err = service
            .add(Category::Skins, ItemDraft::named(" dragon lore "))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count(Category::Skins).unwrap(), 1);

        // Same name in another category is fine
        assert!(service
            .add(Category::Accessories, ItemDraft::named("Dragon Lore"))
            .is_ok());
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service.add(Category::Items, ItemDraft::named("   ")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.count(Category::Items).unwrap(), 0);
    }

    #[test]
    fn test_add_per_unit_item() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let draft = ItemDraft::named("Widget").with_per_unit(PerUnitCost::new(100.0, 4.0).unwrap());
        let item = service.add(Category::Items, draft).unwrap().into_value();

        assert_eq!(item.prices, vec![PriceEntry::computed(100.0, 4.0).unwrap()]);
        assert_eq!(service.average_price(Category::Items, &item.id).unwrap(), 25.0);
    }

    #[test]
    fn test_category_specific_fields() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service
            .add(Category::Skins, ItemDraft::named("Knife").with_cost(10.0))
            .unwrap_err();
        assert!(err.is_validation());

        let per_unit = PerUnitCost::new(10.0, 2.0).unwrap();
        let err = service
            .add(Category::Cars, ItemDraft::named("Sedan").with_per_unit(per_unit))
            .unwrap_err();
        assert!(err.is_validation());

        let house = service
            .add(Category::Houses, ItemDraft::named("Villa").with_cost(250000.0))
            .unwrap()
            .into_value();
        assert_eq!(house.cost, Some(250000.0));
    }

    #[test]
    fn test_update_item() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Cars, "Sedan");
        let patch = ItemPatch {
            name: Some("  Coupe ".into()),
            cost: Some(5000.0),
            ..ItemPatch::default()
        };
        let updated = service.update(Category::Cars, &item.id, patch).unwrap().into_value();

        assert_eq!(updated.name, "Coupe");
        assert_eq!(updated.cost, Some(5000.0));
        assert!(updated.updated_at >= item.updated_at);
        assert_eq!(updated.created_at, item.created_at);

        let stored = service.get(Category::Cars, &item.id).unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_update_keeps_own_name_but_rejects_others() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let first = add(&service, Category::Items, "Bolts");
        add(&service, Category::Items, "Nuts");

        let same = ItemPatch {
            name: Some("BOLTS".into()),
            ..ItemPatch::default()
        };
        assert!(service.update(Category::Items, &first.id, same).is_ok());

        let clash = ItemPatch {
            name: Some("nuts".into()),
            ..ItemPatch::default()
        };
        let err = service.update(Category::Items, &first.id, clash).unwrap_err();
        assert!(err.is_validation());
        let stored = service.get(Category::Items, &first.id).unwrap().unwrap();
        assert_eq!(stored.name, "BOLTS");
    }

    #[test]
    fn test_update_missing_item() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let err = service
            .update(Category::Skins, &ItemId::new(), ItemPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_patch_touches_item() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Skins, "Howl");
        let updated = service
            .update(Category::Skins, &item.id, ItemPatch::default())
            .unwrap()
            .into_value();
        assert!(updated.updated_at >= item.updated_at);
        assert_eq!(updated.name, "Howl");
    }

    #[test]
    fn test_remove_twice() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Accessories, "Ring");
        let removed = service.remove(Category::Accessories, &item.id).unwrap().into_value();
        assert_eq!(removed.id, item.id);

        let listed = service.list(Category::Accessories, None, SortKey::Insertion).unwrap();
        assert!(listed.iter().all(|i| i.id != item.id));

        let err = service.remove(Category::Accessories, &item.id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_price_add_and_remove() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Skins, "Asiimov");
        service
            .add_price(Category::Skins, &item.id, PriceEntry::flat(10.0).unwrap())
            .unwrap();
        let updated = service
            .add_price(Category::Skins, &item.id, PriceEntry::flat(20.0).unwrap())
            .unwrap()
            .into_value();
        assert_eq!(updated.average_price(), 15.0);

        let (removed, updated) = service
            .remove_price(Category::Skins, &item.id, 0)
            .unwrap()
            .into_value();
        assert_eq!(removed, PriceEntry::Flat(10.0));
        assert_eq!(updated.prices, vec![PriceEntry::Flat(20.0)]);

        let err = service.remove_price(Category::Skins, &item.id, 5).unwrap_err();
        assert!(matches!(err, TrackerError::Index { index: 5, len: 1 }));
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        for name in ["Red Widget", "blue widget", "Gadget"] {
            add(&service, Category::Items, name);
        }

        let widgets = service
            .list(Category::Items, Some("WIDGET"), SortKey::Name)
            .unwrap();
        let names: Vec<_> = widgets.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["blue widget", "Red Widget"]);

        // Stored order is untouched by sorted listings
        let stored = service.list(Category::Items, None, SortKey::Insertion).unwrap();
        assert_eq!(stored[0].name, "Red Widget");
    }

    #[test]
    fn test_filter_items_is_lazy_view() {
        let items = vec![Item::new("Alpha"), Item::new("Beta"), Item::new("alphabet")];
        let matched: Vec<&Item> = filter_items(&items, "alpha").collect();
        assert_eq!(matched.len(), 2);
        assert!(std::ptr::eq(matched[0], &items[0]));
        assert_eq!(filter_items(&items, "").count(), 3);
    }

    #[test]
    fn test_find_by_name_then_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Houses, "Beach House");

        let by_name = service.find(Category::Houses, " beach house").unwrap().unwrap();
        assert_eq!(by_name.id, item.id);

        let by_id = service.find(Category::Houses, item.id.as_str()).unwrap().unwrap();
        assert_eq!(by_id.name, "Beach House");

        let by_short = service.find(Category::Houses, item.id.short()).unwrap().unwrap();
        assert_eq!(by_short.id, item.id);

        assert!(service.find(Category::Houses, "Castle").unwrap().is_none());
        assert!(service.require(Category::Houses, "Castle").unwrap_err().is_not_found());
    }

    #[test]
    fn test_is_duplicate_name_query() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Skins, "Fade");
        assert!(service.is_duplicate_name(Category::Skins, "fade ", None).unwrap());
        assert!(!service
            .is_duplicate_name(Category::Skins, "fade", Some(&item.id))
            .unwrap());
        assert!(!service.is_duplicate_name(Category::Cars, "fade", None).unwrap());
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let item_id = {
            let storage = Storage::new(paths.clone()).unwrap();
            storage.load_all().unwrap();
            let service = CatalogService::new(&storage);
            let item = add(&service, Category::Cars, "Truck");
            service
                .add_price(Category::Cars, &item.id, PriceEntry::flat(900.0).unwrap())
                .unwrap();
            item.id
        };

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let service = CatalogService::new(&storage);
        assert_eq!(service.average_price(Category::Cars, &item_id).unwrap(), 900.0);
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();
        let service = CatalogService::new(&storage);

        // A directory where the catalog file should be makes the rename fail
        std::fs::create_dir_all(paths.catalog_file()).unwrap();

        let outcome = service.add(Category::Skins, ItemDraft::named("Vanilla")).unwrap();
        assert!(!outcome.is_saved());
        assert!(outcome.save_error.as_ref().unwrap().is_persistence());
        assert_eq!(service.count(Category::Skins).unwrap(), 1);
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CatalogService::new(&storage);

        let item = add(&service, Category::Skins, "Slate");
        service.remove(Category::Skins, &item.id).unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Delete);
    }
}
