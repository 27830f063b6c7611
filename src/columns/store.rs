use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::columns::catalog::{ColumnCatalog, ColumnDescriptor, ColumnKey};
use crate::columns::derive::derive_columns;
use crate::columns::state::{ColumnDefaults, ColumnState};
use crate::events::ColumnEvent;
use crate::persistence::StoredColumns;

/// Result of a column operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOperationResult<K> {
    /// Whether the state was changed
    pub success: bool,
    /// Human-readable description for status message
    pub description: String,
    /// Event to publish, also present for rejections
    pub event: Option<ColumnEvent<K>>,
}

impl<K> ColumnOperationResult<K> {
    /// A committed change
    pub fn success(description: impl Into<String>, event: ColumnEvent<K>) -> Self {
        Self {
            success: true,
            description: description.into(),
            event: Some(event),
        }
    }

    /// A refused change the user should hear about
    pub fn rejected(description: impl Into<String>, event: ColumnEvent<K>) -> Self {
        Self {
            success: false,
            description: description.into(),
            event: Some(event),
        }
    }

    /// A silently absorbed request
    pub fn ignored(description: impl Into<String>) -> Self {
        Self {
            success: false,
            description: description.into(),
            event: None,
        }
    }
}

/// Holds the visible set and column order of one table
#[derive(Debug, Clone)]
pub struct ColumnStore<K> {
    catalog: ColumnCatalog<K>,
    defaults: ColumnDefaults<K>,
    state: ColumnState<K>,
}

impl<K: ColumnKey> ColumnStore<K> {
    /// Create a store seeded from `persisted` when usable, else from defaults.
    ///
    /// `defaults` of `None` means every catalog column visible in catalog
    /// order. Defaults that name no visible catalog column are an error.
    pub fn new(
        catalog: ColumnCatalog<K>,
        defaults: Option<ColumnDefaults<K>>,
        persisted: Option<&StoredColumns>,
    ) -> Result<Self> {
        let defaults = match defaults {
            Some(defaults) => {
                let clean = ColumnState::from_defaults(&catalog, &defaults);
                if clean.visible.is_empty() {
                    bail!("Default visible columns must contain at least one catalog column");
                }
                ColumnDefaults::new(clean.visible, clean.order)
            }
            None => ColumnDefaults::all(&catalog),
        };

        let state = match persisted {
            Some(stored) => {
                let restored = ColumnState::from_stored(&catalog, stored);
                if restored.visible.is_empty() {
                    warn!(target: "column_store",
                        "Persisted columns had no visible catalog column, using defaults");
                    ColumnState::from_defaults(&catalog, &defaults)
                } else {
                    debug!(target: "column_store",
                        "Restored {} visible columns from storage", restored.visible.len());
                    restored
                }
            }
            None => ColumnState::from_defaults(&catalog, &defaults),
        };

        Ok(Self {
            catalog,
            defaults,
            state,
        })
    }

    pub fn catalog(&self) -> &ColumnCatalog<K> {
        &self.catalog
    }

    pub fn defaults(&self) -> &ColumnDefaults<K> {
        &self.defaults
    }

    pub fn state(&self) -> &ColumnState<K> {
        &self.state
    }

    pub fn is_visible(&self, key: &K) -> bool {
        self.state.is_visible(key)
    }

    /// Visible columns in display order, recomputed on every call
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor<K>> {
        derive_columns(&self.catalog, &self.state.visible, &self.state.order)
    }

    /// Hidden columns in catalog order
    pub fn hidden_columns(&self) -> Vec<&ColumnDescriptor<K>> {
        self.catalog
            .columns()
            .iter()
            .filter(|c| !self.state.is_visible(&c.key))
            .collect()
    }

    /// Show a hidden column or hide a visible one
    pub fn toggle_column(&mut self, key: &K) -> ColumnOperationResult<K> {
        if !self.catalog.contains(key) {
            debug!(target: "column_store", "toggle_column: unknown column '{}'", key);
            return ColumnOperationResult::ignored(format!("Unknown column '{}'", key));
        }

        let header = self.catalog.header_of(key);

        if self.state.is_visible(key) {
            if self.state.visible.len() == 1 {
                warn!(target: "column_store", "Refusing to hide last visible column '{}'", key);
                return ColumnOperationResult::rejected(
                    "At least one column must stay visible",
                    ColumnEvent::LastColumnKept(key.clone()),
                );
            }

            self.state.visible.retain(|k| k != key);
            info!(target: "column_store", "Hid column '{}'", key);
            ColumnOperationResult::success(
                format!("Column '{}' hidden", header),
                ColumnEvent::Hidden(key.clone()),
            )
        } else {
            self.state.visible.push(key.clone());
            if !self.state.order.contains(key) {
                self.state.order.push(key.clone());
            }
            info!(target: "column_store", "Showed column '{}'", key);
            ColumnOperationResult::success(
                format!("Column '{}' shown", header),
                ColumnEvent::Shown(key.clone()),
            )
        }
    }

    /// Go back to the defaults the store was built with
    pub fn reset_to_default(&mut self) -> ColumnOperationResult<K> {
        self.state = ColumnState::from_defaults(&self.catalog, &self.defaults);
        info!(target: "column_store", "Columns reset to default");
        ColumnOperationResult::success("Columns reset to default", ColumnEvent::Reset)
    }

    /// Keep only the first column in display order visible.
    /// The recorded order is left untouched.
    pub fn hide_all_but_one(&mut self) -> ColumnOperationResult<K> {
        let first = match self.visible_columns().first() {
            Some(column) => column.key.clone(),
            None => return ColumnOperationResult::ignored("No visible columns"),
        };

        self.state.visible = vec![first.clone()];
        info!(target: "column_store", "Hid all columns except '{}'", first);
        ColumnOperationResult::success(
            format!("Only column '{}' is visible", self.catalog.header_of(&first)),
            ColumnEvent::HiddenAllBut(first),
        )
    }

    /// Make every catalog column visible. Columns missing from the order are
    /// appended in catalog order.
    pub fn show_all(&mut self) -> ColumnOperationResult<K> {
        let hidden: Vec<K> = self.hidden_columns().iter().map(|c| c.key.clone()).collect();
        if hidden.is_empty() {
            return ColumnOperationResult::ignored("No hidden columns");
        }

        for key in hidden {
            if !self.state.order.contains(&key) {
                self.state.order.push(key.clone());
            }
            self.state.visible.push(key);
        }

        let count = self.state.visible.len();
        info!(target: "column_store", "All {} columns visible", count);
        ColumnOperationResult::success(
            format!("Showing all {} columns", count),
            ColumnEvent::ShownAll { count },
        )
    }

    /// Move `key` into the slot currently held by `target`.
    ///
    /// Both columns must be visible and distinct. Keys between the two slots
    /// shift by one.
    pub fn move_column(&mut self, key: &K, target: &K) -> ColumnOperationResult<K> {
        if key == target {
            return ColumnOperationResult::ignored("Column dropped onto itself");
        }
        if !self.state.is_visible(key) || !self.state.is_visible(target) {
            debug!(target: "column_store",
                "move_column: '{}' -> '{}' ignored, both columns must be visible", key, target);
            return ColumnOperationResult::ignored("Only visible columns can be moved");
        }

        self.complete_order();

        let (from, to) = match (
            self.state.order.iter().position(|k| k == key),
            self.state.order.iter().position(|k| k == target),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => return ColumnOperationResult::ignored("Column missing from order"),
        };

        let moved = self.state.order.remove(from);
        self.state.order.insert(to, moved);

        info!(target: "column_store",
            "Moved column '{}' from {} to {} (slot of '{}')", key, from, to, target);
        ColumnOperationResult::success(
            format!(
                "Moved '{}' to the slot of '{}'",
                self.catalog.header_of(key),
                self.catalog.header_of(target)
            ),
            ColumnEvent::Moved {
                key: key.clone(),
                target: target.clone(),
                order: self.state.order.clone(),
            },
        )
    }

    /// Swap with the previous visible column; the first wraps to the end
    pub fn move_column_left(&mut self, key: &K) -> ColumnOperationResult<K> {
        let keys = self.visible_keys();
        let idx = match keys.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => return ColumnOperationResult::ignored("Only visible columns can be moved"),
        };
        if keys.len() < 2 {
            return ColumnOperationResult::ignored("Only one visible column");
        }

        let target = if idx == 0 {
            keys[keys.len() - 1].clone()
        } else {
            keys[idx - 1].clone()
        };
        self.move_column(key, &target)
    }

    /// Swap with the next visible column; the last wraps to the front
    pub fn move_column_right(&mut self, key: &K) -> ColumnOperationResult<K> {
        let keys = self.visible_keys();
        let idx = match keys.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => return ColumnOperationResult::ignored("Only visible columns can be moved"),
        };
        if keys.len() < 2 {
            return ColumnOperationResult::ignored("Only one visible column");
        }

        let target = if idx == keys.len() - 1 {
            keys[0].clone()
        } else {
            keys[idx + 1].clone()
        };
        self.move_column(key, &target)
    }

    fn visible_keys(&self) -> Vec<K> {
        self.visible_columns()
            .into_iter()
            .map(|c| c.key.clone())
            .collect()
    }

    /// Append visible keys missing from the order, in display order.
    /// Display order is unchanged by this.
    fn complete_order(&mut self) {
        let missing: Vec<K> = self
            .state
            .visible
            .iter()
            .filter(|k| !self.state.order.contains(k))
            .cloned()
            .collect();
        self.state.order.extend(missing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(order: &[&'static str]) -> ColumnStore<&'static str> {
        let catalog =
            ColumnCatalog::from_pairs(order.iter().map(|k| (*k, k.to_uppercase()))).unwrap();
        ColumnStore::new(catalog, None, None).unwrap()
    }

    fn keys(store: &ColumnStore<&'static str>) -> Vec<&'static str> {
        store.visible_columns().iter().map(|c| c.key).collect()
    }

    #[test]
    fn test_new_defaults_to_all_columns() {
        let store = store(&["a", "b", "c"]);
        assert_eq!(keys(&store), vec!["a", "b", "c"]);
        assert_eq!(store.state().order(), &["a", "b", "c"]);
    }

    #[test]
    fn test_empty_default_visible_is_error() {
        let catalog = ColumnCatalog::from_pairs(vec![("a", "A")]).unwrap();
        let defaults = ColumnDefaults::new(vec!["x"], vec!["a"]);
        assert!(ColumnStore::new(catalog, Some(defaults), None).is_err());
    }

    #[test]
    fn test_persisted_without_visible_falls_back() {
        let catalog = ColumnCatalog::from_pairs(vec![("a", "A"), ("b", "B")]).unwrap();
        let stored = StoredColumns {
            visible: vec!["gone".to_string()],
            order: vec!["b".to_string()],
        };
        let store = ColumnStore::new(catalog, None, Some(&stored)).unwrap();
        assert_eq!(keys(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_toggle_unknown_is_ignored() {
        let mut store = store(&["a", "b"]);
        let result = store.toggle_column(&"zz");
        assert!(!result.success);
        assert!(result.event.is_none());
        assert_eq!(keys(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_toggle_appends_new_key_to_order() {
        let catalog = ColumnCatalog::from_pairs(vec![("a", "A"), ("b", "B"), ("c", "C")]).unwrap();
        let defaults = ColumnDefaults::new(vec!["a", "b"], vec!["b", "a"]);
        let mut store = ColumnStore::new(catalog, Some(defaults), None).unwrap();

        let result = store.toggle_column(&"c");
        assert!(result.success);
        assert_eq!(result.event, Some(ColumnEvent::Shown("c")));
        assert_eq!(store.state().order(), &["b", "a", "c"]);
        assert_eq!(keys(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_column_completes_missing_order() {
        let catalog = ColumnCatalog::from_pairs(vec![("a", "A"), ("b", "B"), ("c", "C")]).unwrap();
        let defaults = ColumnDefaults::new(vec!["a", "b", "c"], vec!["b"]);
        let mut store = ColumnStore::new(catalog, Some(defaults), None).unwrap();
        assert_eq!(keys(&store), vec!["b", "a", "c"]);

        let result = store.move_column(&"c", &"b");
        assert!(result.success);
        assert_eq!(store.state().order(), &["c", "b", "a"]);
        assert_eq!(keys(&store), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_move_left_and_right_wrap() {
        let mut store = store(&["a", "b", "c"]);

        store.move_column_left(&"b");
        assert_eq!(keys(&store), vec!["b", "a", "c"]);

        store.move_column_left(&"b");
        assert_eq!(keys(&store), vec!["a", "c", "b"]);

        store.move_column_right(&"b");
        assert_eq!(keys(&store), vec!["b", "a", "c"]);

        store.move_column_right(&"a");
        assert_eq!(keys(&store), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_skips_hidden_neighbours() {
        let mut store = store(&["a", "b", "c", "d"]);
        store.toggle_column(&"b");
        store.move_column_right(&"a");
        assert_eq!(keys(&store), vec!["c", "a", "d"]);
        assert_eq!(store.state().order(), &["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_with_single_column_is_ignored() {
        let mut store = store(&["a", "b"]);
        store.hide_all_but_one();
        let result = store.move_column_left(&"a");
        assert!(!result.success);
    }

    #[test]
    fn test_show_all() {
        let mut store = store(&["a", "b", "c"]);
        store.hide_all_but_one();
        assert_eq!(store.hidden_columns().len(), 2);

        let result = store.show_all();
        assert_eq!(result.event, Some(ColumnEvent::ShownAll { count: 3 }));
        assert_eq!(keys(&store), vec!["a", "b", "c"]);

        let again = store.show_all();
        assert!(!again.success);
    }
}
