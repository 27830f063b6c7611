//! Per-table column customization engine
//!
//! `ColumnCustomizer` ties a `ColumnStore` and a `DragReorder` machine to a
//! storage backend and a list of subscribers. Every committed change is
//! saved under the table id and published; rejected changes are published
//! only.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::columns::catalog::{ColumnCatalog, ColumnDescriptor, ColumnKey};
use crate::columns::drag::{DragOutcome, DragReorder, DragState};
use crate::columns::state::{ColumnDefaults, ColumnState};
use crate::columns::store::{ColumnOperationResult, ColumnStore};
use crate::events::ColumnSubscriber;
use crate::persistence::{ColumnStateStore, MemoryStateStore};

pub struct ColumnCustomizer<K> {
    table_id: String,
    store: ColumnStore<K>,
    drag: DragReorder<K>,
    storage: Arc<dyn ColumnStateStore>,
    subscribers: Vec<Box<dyn ColumnSubscriber<K>>>,
}

impl<K: ColumnKey> ColumnCustomizer<K> {
    pub fn builder(table_id: impl Into<String>) -> ColumnCustomizerBuilder<K> {
        ColumnCustomizerBuilder::new(table_id)
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn catalog(&self) -> &ColumnCatalog<K> {
        self.store.catalog()
    }

    pub fn state(&self) -> &ColumnState<K> {
        self.store.state()
    }

    pub fn store(&self) -> &ColumnStore<K> {
        &self.store
    }

    pub fn drag_state(&self) -> &DragState<K> {
        self.drag.state()
    }

    /// Visible columns in display order
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor<K>> {
        self.store.visible_columns()
    }

    pub fn hidden_columns(&self) -> Vec<&ColumnDescriptor<K>> {
        self.store.hidden_columns()
    }

    pub fn is_visible(&self, key: &K) -> bool {
        self.store.is_visible(key)
    }

    /// Add a subscriber
    pub fn subscribe(&mut self, subscriber: Box<dyn ColumnSubscriber<K>>) {
        info!(target: "engine", "[{}] Adding subscriber: {}", self.table_id, subscriber.name());
        self.subscribers.push(subscriber);
    }

    pub fn toggle_column(&mut self, key: &K) -> ColumnOperationResult<K> {
        let result = self.store.toggle_column(key);
        self.publish(result)
    }

    pub fn reset_to_default(&mut self) -> ColumnOperationResult<K> {
        let result = self.store.reset_to_default();
        self.publish(result)
    }

    pub fn hide_all_but_one(&mut self) -> ColumnOperationResult<K> {
        let result = self.store.hide_all_but_one();
        self.publish(result)
    }

    pub fn show_all(&mut self) -> ColumnOperationResult<K> {
        let result = self.store.show_all();
        self.publish(result)
    }

    pub fn move_column_left(&mut self, key: &K) -> ColumnOperationResult<K> {
        let result = self.store.move_column_left(key);
        self.publish(result)
    }

    pub fn move_column_right(&mut self, key: &K) -> ColumnOperationResult<K> {
        let result = self.store.move_column_right(key);
        self.publish(result)
    }

    pub fn begin_drag(&mut self, key: &K) -> DragOutcome<K> {
        self.drag.begin_drag(&self.store, key)
    }

    pub fn hover_target(&mut self, key: &K) -> DragOutcome<K> {
        self.drag.hover_target(&self.store, key)
    }

    pub fn leave_target(&mut self) -> DragOutcome<K> {
        self.drag.leave_target()
    }

    /// Finish the drag on `target`, committing the reorder when valid
    pub fn drop_on(&mut self, target: &K) -> DragOutcome<K> {
        match self.drag.drop_on(&mut self.store, target) {
            DragOutcome::Reordered(result) => DragOutcome::Reordered(self.publish(result)),
            other => other,
        }
    }

    pub fn end_drag(&mut self) -> DragOutcome<K> {
        self.drag.end_drag()
    }

    fn publish(&mut self, result: ColumnOperationResult<K>) -> ColumnOperationResult<K> {
        let event = match &result.event {
            Some(event) => event,
            None => {
                debug!(target: "engine", "[{}] {}", self.table_id, result.description);
                return result;
            }
        };

        if event.is_mutation() {
            self.persist();
        }

        let catalog = self.store.catalog();
        let state = self.store.state();
        for subscriber in self.subscribers.iter_mut() {
            subscriber.on_column_event(&self.table_id, event, catalog, state);
        }

        result
    }

    fn persist(&self) {
        let stored = self.store.state().to_stored();
        if let Err(e) = self.storage.save(&self.table_id, &stored) {
            warn!(target: "persistence",
                "[{}] Failed to save columns to '{}': {:#}", self.table_id, self.storage.name(), e);
        }
    }
}

/// Builder for one table's engine
pub struct ColumnCustomizerBuilder<K> {
    table_id: String,
    catalog: Option<ColumnCatalog<K>>,
    defaults: Option<ColumnDefaults<K>>,
    storage: Option<Arc<dyn ColumnStateStore>>,
    subscribers: Vec<Box<dyn ColumnSubscriber<K>>>,
}

impl<K: ColumnKey> ColumnCustomizerBuilder<K> {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            catalog: None,
            defaults: None,
            storage: None,
            subscribers: Vec::new(),
        }
    }

    pub fn catalog(mut self, catalog: ColumnCatalog<K>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn defaults(mut self, defaults: ColumnDefaults<K>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn ColumnStateStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn subscriber(mut self, subscriber: Box<dyn ColumnSubscriber<K>>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Load any saved pair for the table and build the engine.
    /// A storage read failure is logged and treated as nothing saved.
    pub fn build(self) -> Result<ColumnCustomizer<K>> {
        let catalog = self
            .catalog
            .ok_or_else(|| anyhow!("Table '{}' has no column catalog", self.table_id))?;
        let storage: Arc<dyn ColumnStateStore> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(MemoryStateStore::new()),
        };

        let persisted = match storage.load(&self.table_id) {
            Ok(persisted) => persisted,
            Err(e) => {
                warn!(target: "persistence",
                    "[{}] Could not load saved columns, using defaults: {:#}", self.table_id, e);
                None
            }
        };

        let store = ColumnStore::new(catalog, self.defaults, persisted.as_ref())?;
        info!(target: "engine",
            "[{}] Ready with {} of {} columns visible ({})",
            self.table_id,
            store.state().visible_count(),
            store.catalog().len(),
            if persisted.is_some() { "restored" } else { "defaults" }
        );

        Ok(ColumnCustomizer {
            table_id: self.table_id,
            store,
            drag: DragReorder::new(),
            storage,
            subscribers: self.subscribers,
        })
    }
}

/// Several independent tables sharing one storage backend
pub struct ColumnCustomizerRegistry<K> {
    storage: Arc<dyn ColumnStateStore>,
    tables: HashMap<String, ColumnCustomizer<K>>,
}

impl<K: ColumnKey> ColumnCustomizerRegistry<K> {
    pub fn new(storage: Arc<dyn ColumnStateStore>) -> Self {
        Self {
            storage,
            tables: HashMap::new(),
        }
    }

    /// Create the engine for a table, replacing any previous one
    pub fn register(
        &mut self,
        table_id: &str,
        catalog: ColumnCatalog<K>,
        defaults: Option<ColumnDefaults<K>>,
    ) -> Result<&mut ColumnCustomizer<K>> {
        let mut builder = ColumnCustomizer::builder(table_id)
            .catalog(catalog)
            .storage(self.storage.clone());
        if let Some(defaults) = defaults {
            builder = builder.defaults(defaults);
        }
        let engine = builder.build()?;

        self.tables.insert(table_id.to_string(), engine);
        self.tables
            .get_mut(table_id)
            .ok_or_else(|| anyhow!("Table '{}' vanished after registration", table_id))
    }

    pub fn get(&self, table_id: &str) -> Option<&ColumnCustomizer<K>> {
        self.tables.get(table_id)
    }

    pub fn get_mut(&mut self, table_id: &str) -> Option<&mut ColumnCustomizer<K>> {
        self.tables.get_mut(table_id)
    }

    /// Drop a table's engine; its saved columns stay in storage
    pub fn remove(&mut self, table_id: &str) -> Option<ColumnCustomizer<K>> {
        self.tables.remove(table_id)
    }

    pub fn table_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
