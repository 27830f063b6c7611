//! Column customization core
//!
//! The catalog describes every column a table can show, the store owns the
//! visible set and column order for one table, and the drag machine turns
//! reorder gestures into moves on the store.

pub mod catalog;
pub mod derive;
pub mod drag;
pub mod state;
pub mod store;
