use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::persistence::{ColumnStateStore, JsonFileStateStore, MemoryStateStore};
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document in the data directory
    #[default]
    Json,
    /// Nothing is written, preferences last for the session
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Column state file, defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show a row number column before the lead columns
    pub show_row_numbers: bool,

    /// Colour notices, table headers and search matches
    pub use_color: bool,

    /// Rows shown by `show`
    pub max_rows: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_row_numbers: false,
            use_color: true,
            max_rows: 20,
        }
    }
}

impl Config {
    /// Load config from the default location, writing the commented
    /// template if absent
    pub fn load() -> Result<Self> {
        Self::load_or_create(&Self::get_config_path()?)
    }

    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::write_default_with_comments(path)?;
        }
        Self::load_from(path)
    }

    /// Write the commented default config to `path`
    pub fn write_default_with_comments(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        fs::write(path, Self::create_default_with_comments())
            .with_context(|| format!("Failed to write config {:?}", path))?;
        info!(target: "config", "Default config written to {:?}", path);
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Open the configured column state backend
    pub fn open_storage(&self) -> Result<Arc<dyn ColumnStateStore>> {
        let store: Arc<dyn ColumnStateStore> = match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStateStore::new()),
            StorageBackend::Json => match &self.storage.state_file {
                Some(path) => Arc::new(JsonFileStateStore::new(path.clone())),
                None => Arc::new(JsonFileStateStore::default_location()?),
            },
        };
        info!(target: "config", "Using '{}' column state backend", store.name());
        Ok(store)
    }

    /// A default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Column Customizer Configuration File
# Location: ~/.config/column-customizer/config.toml (Linux)

[storage]
# Where column preferences are kept: "json" or "memory"
backend = "json"

# Column state file (leave commented to use the data directory)
# state_file = "/path/to/columns.json"

[logging]
# Default filter when RUST_LOG is not set, e.g. "debug" or "column_store=trace"
level = "info"

[display]
# Show a row number column before the data columns
show_row_numbers = false

# Colour notices, table headers and search matches
use_color = true

# Rows printed by the `show` command
max_rows = 20
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.logging.level, "info");
        assert!(config.display.use_color);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.storage.backend, parsed.storage.backend);
        assert_eq!(config.display.max_rows, parsed.display.max_rows);
    }

    #[test]
    fn test_commented_default_parses() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed.storage.backend, StorageBackend::Json);
        assert!(parsed.storage.state_file.is_none());
        assert_eq!(parsed.display.max_rows, 20);
    }

    #[test]
    fn test_missing_config_gets_commented_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("column-customizer").join("config.toml");

        let config = Config::load_or_create(&path).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.display.max_rows, 20);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Column Customizer Configuration File"));

        // An existing file is read, not replaced
        fs::write(&path, "[display]\nmax_rows = 5\n").unwrap();
        assert_eq!(Config::load_or_create(&path).unwrap().display.max_rows, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[storage]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(parsed.storage.backend, StorageBackend::Memory);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_load_from_written_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("config.toml");

        let mut config = Config::default();
        config.display.show_row_numbers = true;
        config.storage.state_file = Some(dir.path().join("columns.json"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.display.show_row_numbers);
        assert_eq!(loaded.storage.state_file, Some(dir.path().join("columns.json")));
    }

    #[test]
    fn test_memory_backend_opens() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        let store = config.open_storage().unwrap();
        assert_eq!(store.name(), "memory");
    }
}
