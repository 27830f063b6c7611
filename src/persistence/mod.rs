//! Storage for per-table column preferences
//!
//! The engine never touches storage directly. It hands a `StoredColumns`
//! pair to a `ColumnStateStore` after every committed change and asks for
//! one when a table is created.

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod json_file;
mod memory;

pub use json_file::JsonFileStateStore;
pub use memory::MemoryStateStore;

/// Persisted form of a table's columns: two arrays of key strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredColumns {
    #[serde(default)]
    pub visible: Vec<String>,
    #[serde(default)]
    pub order: Vec<String>,
}

/// Keyed get/set of column preferences
pub trait ColumnStateStore: Send + Sync {
    /// Load the saved pair for a table, `None` if nothing was saved
    fn load(&self, table_id: &str) -> Result<Option<StoredColumns>>;

    /// Save the pair for a table, replacing any previous value
    fn save(&self, table_id: &str, columns: &StoredColumns) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}
