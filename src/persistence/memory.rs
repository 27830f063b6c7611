use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ColumnStateStore, StoredColumns};

/// In-process store, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    tables: Mutex<HashMap<String, StoredColumns>>,
    saves: Mutex<usize>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a saved pair
    pub fn with_table(table_id: &str, columns: StoredColumns) -> Self {
        let store = Self::new();
        store
            .tables
            .lock()
            .unwrap()
            .insert(table_id.to_string(), columns);
        store
    }

    /// What is currently saved for a table
    pub fn get(&self, table_id: &str) -> Option<StoredColumns> {
        self.tables.lock().unwrap().get(table_id).cloned()
    }

    /// Number of saves performed since creation
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn table_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tables.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ColumnStateStore for MemoryStateStore {
    fn load(&self, table_id: &str) -> Result<Option<StoredColumns>> {
        Ok(self.get(table_id))
    }

    fn save(&self, table_id: &str, columns: &StoredColumns) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .insert(table_id.to_string(), columns.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let store = MemoryStateStore::new();
        assert!(store.load("leads").unwrap().is_none());

        let columns = StoredColumns {
            visible: vec!["name".to_string()],
            order: vec!["name".to_string(), "phone".to_string()],
        };
        store.save("leads", &columns).unwrap();
        assert_eq!(store.load("leads").unwrap(), Some(columns));
        assert_eq!(store.save_count(), 1);
        assert!(store.load("agents").unwrap().is_none());
    }
}
