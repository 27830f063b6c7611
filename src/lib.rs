pub mod columns;
pub mod config;
pub mod engine;
pub mod events;
pub mod logging;
pub mod persistence;
pub mod utils;

pub use columns::catalog::{ColumnCatalog, ColumnDescriptor, ColumnKey};
pub use columns::drag::{DragOutcome, DragReorder, DragSession, DragState};
pub use columns::state::{ColumnDefaults, ColumnState};
pub use columns::store::{ColumnOperationResult, ColumnStore};
pub use engine::{ColumnCustomizer, ColumnCustomizerBuilder, ColumnCustomizerRegistry};
pub use events::{ColumnEvent, ColumnSubscriber, Notice, NoticeLevel, NoticeLog};
pub use persistence::{ColumnStateStore, JsonFileStateStore, MemoryStateStore, StoredColumns};
