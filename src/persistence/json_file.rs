use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{ColumnStateStore, StoredColumns};
use crate::utils::app_paths::AppPaths;

/// All tables in one pretty printed JSON document: `{ table_id: {visible, order} }`
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the user data directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(AppPaths::column_state_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents, `None` when the file is missing or blank
    fn read_contents(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read column state from {:?}", self.path))?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(contents))
    }

    fn read_all(&self) -> Result<BTreeMap<String, StoredColumns>> {
        match self.read_contents()? {
            Some(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Invalid column state file {:?}", self.path)),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Tables to merge a save into. A file that does not parse is moved to
    /// `<name>.bak` and replaced, so one bad write cannot block later saves.
    fn read_for_update(&self) -> Result<BTreeMap<String, StoredColumns>> {
        let contents = match self.read_contents()? {
            Some(contents) => contents,
            None => return Ok(BTreeMap::new()),
        };

        match serde_json::from_str(&contents) {
            Ok(tables) => Ok(tables),
            Err(e) => {
                let backup = self.backup_path();
                warn!(target: "persistence",
                    "Column state file {:?} is invalid ({}), moving it to {:?}", self.path, e, backup);
                if let Err(e) = fs::rename(&self.path, &backup) {
                    warn!(target: "persistence", "Could not keep a backup at {:?}: {}", backup, e);
                }
                Ok(BTreeMap::new())
            }
        }
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    fn write_all(&self, tables: &BTreeMap<String, StoredColumns>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(tables)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write column state to {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace column state at {:?}", self.path))?;
        Ok(())
    }
}

impl ColumnStateStore for JsonFileStateStore {
    fn load(&self, table_id: &str) -> Result<Option<StoredColumns>> {
        let mut tables = self.read_all()?;
        Ok(tables.remove(table_id))
    }

    fn save(&self, table_id: &str, columns: &StoredColumns) -> Result<()> {
        let mut tables = self.read_for_update()?;
        tables.insert(table_id.to_string(), columns.clone());
        self.write_all(&tables)?;
        debug!(target: "persistence", "Saved columns for '{}' to {:?}", table_id, self.path);
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn columns(visible: &[&str], order: &[&str]) -> StoredColumns {
        StoredColumns {
            visible: visible.iter().map(|s| s.to_string()).collect(),
            order: order.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("columns.json"));
        assert!(store.load("leads").unwrap().is_none());
    }

    #[test]
    fn test_tables_are_kept_apart() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("nested").join("columns.json"));

        store.save("leads", &columns(&["name"], &["name", "phone"])).unwrap();
        store.save("agents", &columns(&["agent"], &[])).unwrap();
        store.save("leads", &columns(&["phone"], &["phone", "name"])).unwrap();

        assert_eq!(
            store.load("leads").unwrap(),
            Some(columns(&["phone"], &["phone", "name"]))
        );
        assert_eq!(store.load("agents").unwrap(), Some(columns(&["agent"], &[])));
        assert!(!dir.path().join("nested").join("columns.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("columns.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStateStore::new(path);
        assert!(store.load("leads").is_err());
    }

    #[test]
    fn test_save_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("columns.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStateStore::new(path);

        store.save("leads", &columns(&["phone"], &["phone", "name"])).unwrap();

        assert_eq!(
            store.load("leads").unwrap(),
            Some(columns(&["phone"], &["phone", "name"]))
        );
        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), "{ not json");

        // Later saves merge into the repaired file
        store.save("agents", &columns(&["agent"], &["agent"])).unwrap();
        assert!(store.load("leads").unwrap().is_some());
    }
}
