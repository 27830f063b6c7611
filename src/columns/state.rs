use crate::columns::catalog::{ColumnCatalog, ColumnKey};
use crate::persistence::StoredColumns;

/// Baseline visibility and order for a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefaults<K> {
    pub visible: Vec<K>,
    pub order: Vec<K>,
}

impl<K: ColumnKey> ColumnDefaults<K> {
    pub fn new(visible: Vec<K>, order: Vec<K>) -> Self {
        Self { visible, order }
    }

    /// Every catalog column visible, in catalog order
    pub fn all(catalog: &ColumnCatalog<K>) -> Self {
        let keys: Vec<K> = catalog.keys().cloned().collect();
        Self {
            visible: keys.clone(),
            order: keys,
        }
    }
}

/// The (visible set, column order) pair of one table.
///
/// Both vectors are duplicate free. `visible` keeps insertion order, which
/// decides the relative position of visible keys missing from `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnState<K> {
    pub(crate) visible: Vec<K>,
    pub(crate) order: Vec<K>,
}

impl<K: ColumnKey> ColumnState<K> {
    /// Build a state restricted to catalog keys with duplicates removed
    pub fn sanitized(catalog: &ColumnCatalog<K>, visible: &[K], order: &[K]) -> Self {
        Self {
            visible: known_unique(catalog, visible.iter()),
            order: known_unique(catalog, order.iter()),
        }
    }

    pub fn from_defaults(catalog: &ColumnCatalog<K>, defaults: &ColumnDefaults<K>) -> Self {
        Self::sanitized(catalog, &defaults.visible, &defaults.order)
    }

    /// Restore a persisted pair, dropping strings that name no catalog column
    pub fn from_stored(catalog: &ColumnCatalog<K>, stored: &StoredColumns) -> Self {
        let visible: Vec<K> = stored
            .visible
            .iter()
            .filter_map(|s| catalog.resolve_stored(s))
            .cloned()
            .collect();
        let order: Vec<K> = stored
            .order
            .iter()
            .filter_map(|s| catalog.resolve_stored(s))
            .cloned()
            .collect();
        Self::sanitized(catalog, &visible, &order)
    }

    pub fn to_stored(&self) -> StoredColumns {
        StoredColumns {
            visible: self.visible.iter().map(|k| k.to_string()).collect(),
            order: self.order.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn visible(&self) -> &[K] {
        &self.visible
    }

    pub fn order(&self) -> &[K] {
        &self.order
    }

    pub fn is_visible(&self, key: &K) -> bool {
        self.visible.contains(key)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

fn known_unique<'a, K, I>(catalog: &ColumnCatalog<K>, keys: I) -> Vec<K>
where
    K: ColumnKey + 'a,
    I: Iterator<Item = &'a K>,
{
    let mut out: Vec<K> = Vec::new();
    for key in keys {
        if catalog.contains(key) && !out.contains(key) {
            out.push(key.clone());
        }
    }
    out
}
