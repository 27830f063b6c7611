//! Configuration module
//!
//! Settings for storage, logging and the interactive display.

pub mod config;

pub use config::{Config, DisplayConfig, LoggingConfig, StorageBackend, StorageConfig};
