//! Column events and the notices derived from them

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::columns::catalog::{ColumnCatalog, ColumnKey};
use crate::columns::state::ColumnState;

/// Something that happened to a table's columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnEvent<K> {
    /// A hidden column became visible
    Shown(K),

    /// A visible column was hidden
    Hidden(K),

    /// Hiding was refused because the column is the last visible one
    LastColumnKept(K),

    /// Visibility and order went back to the table defaults
    Reset,

    /// Every column except this one was hidden
    HiddenAllBut(K),

    /// Every catalog column is visible again
    ShownAll { count: usize },

    /// A column took the slot of another
    Moved { key: K, target: K, order: Vec<K> },
}

impl<K: ColumnKey> ColumnEvent<K> {
    /// Whether the event left the table state changed
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ColumnEvent::LastColumnKept(_))
    }

    /// The notification a UI should show for this event, naming columns by
    /// their catalog header
    pub fn notice(&self, catalog: &ColumnCatalog<K>) -> Notice {
        match self {
            ColumnEvent::LastColumnKept(_) => {
                Notice::warning("At least one column must stay visible")
            }
            ColumnEvent::Reset => Notice::confirmation("Columns reset to default"),
            ColumnEvent::Moved { key, target, .. } => Notice::confirmation(format!(
                "Moved '{}' to the slot of '{}'",
                catalog.header_of(key),
                catalog.header_of(target)
            )),
            ColumnEvent::Shown(key) => {
                Notice::info(format!("Column '{}' shown", catalog.header_of(key)))
            }
            ColumnEvent::Hidden(key) => {
                Notice::info(format!("Column '{}' hidden", catalog.header_of(key)))
            }
            ColumnEvent::HiddenAllBut(key) => {
                Notice::info(format!("Only column '{}' is visible", catalog.header_of(key)))
            }
            ColumnEvent::ShownAll { count } => {
                Notice::info(format!("Showing all {} columns", count))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Confirmation,
    Warning,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Confirmation => "ok",
            NoticeLevel::Warning => "warning",
        };
        f.write_str(label)
    }
}

/// A transient, user facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn confirmation(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Confirmation,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Trait for components that react to column changes
pub trait ColumnSubscriber<K> {
    /// Handle an event. `state` is the table state after the event.
    fn on_column_event(
        &mut self,
        table_id: &str,
        event: &ColumnEvent<K>,
        catalog: &ColumnCatalog<K>,
        state: &ColumnState<K>,
    );

    /// Get subscriber name for debugging
    fn name(&self) -> &str;
}

/// Subscriber that records the notice of every event.
///
/// Clones share the same log, so a test or UI can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Rc<RefCell<Vec<(String, Notice)>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices recorded so far, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().iter().map(|(_, n)| n.clone()).collect()
    }

    /// Notices recorded for one table
    pub fn notices_for(&self, table_id: &str) -> Vec<Notice> {
        self.notices
            .borrow()
            .iter()
            .filter(|(id, _)| id == table_id)
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().map(|(_, n)| n.clone())
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .borrow_mut()
            .drain(..)
            .map(|(_, n)| n)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl<K: ColumnKey> ColumnSubscriber<K> for NoticeLog {
    fn on_column_event(
        &mut self,
        table_id: &str,
        event: &ColumnEvent<K>,
        catalog: &ColumnCatalog<K>,
        _state: &ColumnState<K>,
    ) {
        self.notices
            .borrow_mut()
            .push((table_id.to_string(), event.notice(catalog)));
    }

    fn name(&self) -> &str {
        "notice_log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ColumnCatalog<&'static str> {
        ColumnCatalog::from_pairs(vec![("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")]).unwrap()
    }

    #[test]
    fn test_notice_levels() {
        let catalog = catalog();
        let warning = ColumnEvent::LastColumnKept("a").notice(&catalog);
        assert_eq!(warning.level, NoticeLevel::Warning);
        assert_eq!(warning.message, "At least one column must stay visible");

        assert_eq!(
            ColumnEvent::<&str>::Reset.notice(&catalog).level,
            NoticeLevel::Confirmation
        );
        let moved = ColumnEvent::Moved {
            key: "a",
            target: "c",
            order: vec!["b", "c", "a"],
        };
        assert_eq!(moved.notice(&catalog).level, NoticeLevel::Confirmation);
        assert_eq!(ColumnEvent::Shown("a").notice(&catalog).level, NoticeLevel::Info);
    }

    #[test]
    fn test_notices_use_headers() {
        let catalog = catalog();
        let moved = ColumnEvent::Moved {
            key: "a",
            target: "c",
            order: vec!["b", "c", "a"],
        };
        assert_eq!(moved.notice(&catalog).message, "Moved 'Alpha' to the slot of 'Gamma'");
        assert_eq!(
            ColumnEvent::HiddenAllBut("b").notice(&catalog).message,
            "Only column 'Beta' is visible"
        );
    }

    #[test]
    fn test_is_mutation() {
        assert!(!ColumnEvent::LastColumnKept("a").is_mutation());
        assert!(ColumnEvent::Hidden("a").is_mutation());
        assert!(ColumnEvent::<&str>::ShownAll { count: 3 }.is_mutation());
    }
}
