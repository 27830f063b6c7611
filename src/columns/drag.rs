//! Drag-and-drop column reordering
//!
//! Gestures arrive from an input layer that does not guarantee ordering, so
//! every transition that does not fit the current state is absorbed rather
//! than reported as an error.

use tracing::debug;

use crate::columns::catalog::ColumnKey;
use crate::columns::store::{ColumnOperationResult, ColumnStore};
use crate::trace_gesture;

/// An in-progress reorder gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession<K> {
    pub dragged: K,
    pub hovered: Option<K>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState<K> {
    Idle,
    Dragging(DragSession<K>),
}

impl<K> Default for DragState<K> {
    fn default() -> Self {
        DragState::Idle
    }
}

/// What a gesture did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome<K> {
    /// The gesture did not fit the current state
    Ignored,
    /// A drag session began on this column
    Started(K),
    /// The pointer is over this drop target
    Hovering(K),
    /// The pointer left the drop target
    Left,
    /// The drag ended without a reorder
    Cancelled,
    /// A drop happened but a column was no longer visible
    Absorbed,
    /// The drop moved the dragged column
    Reordered(ColumnOperationResult<K>),
}

/// State machine: `Idle -> Dragging -> (hover)* -> Idle`
#[derive(Debug, Clone)]
pub struct DragReorder<K> {
    state: DragState<K>,
}

impl<K> Default for DragReorder<K> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
        }
    }
}

impl<K: ColumnKey> DragReorder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState<K> {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession<K>> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging a visible column. Starting again mid-drag restarts the
    /// session on the new column.
    pub fn begin_drag(&mut self, store: &ColumnStore<K>, key: &K) -> DragOutcome<K> {
        trace_gesture!("begin_drag", key);
        if !store.is_visible(key) {
            debug!(target: "drag", "begin_drag on hidden or unknown column '{}' ignored", key);
            return DragOutcome::Ignored;
        }

        self.state = DragState::Dragging(DragSession {
            dragged: key.clone(),
            hovered: None,
        });
        DragOutcome::Started(key.clone())
    }

    /// Mark a visible column, other than the dragged one, as the drop target
    pub fn hover_target(&mut self, store: &ColumnStore<K>, key: &K) -> DragOutcome<K> {
        trace_gesture!("hover_target", key);
        let session = match &mut self.state {
            DragState::Dragging(session) => session,
            DragState::Idle => return DragOutcome::Ignored,
        };

        if &session.dragged == key || !store.is_visible(key) {
            return DragOutcome::Ignored;
        }

        session.hovered = Some(key.clone());
        DragOutcome::Hovering(key.clone())
    }

    /// Clear the drop target, the drag continues
    pub fn leave_target(&mut self) -> DragOutcome<K> {
        match &mut self.state {
            DragState::Dragging(session) => {
                session.hovered = None;
                DragOutcome::Left
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }

    /// Drop the dragged column onto `target`. Always ends the session.
    pub fn drop_on(&mut self, store: &mut ColumnStore<K>, target: &K) -> DragOutcome<K> {
        trace_gesture!("drop_on", target);
        let session = match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => session,
            DragState::Idle => return DragOutcome::Ignored,
        };

        if &session.dragged == target {
            debug!(target: "drag", "'{}' dropped onto itself, cancelled", target);
            return DragOutcome::Cancelled;
        }

        if !store.is_visible(&session.dragged) || !store.is_visible(target) {
            debug!(target: "drag",
                "drop of '{}' onto '{}' absorbed, column not visible", session.dragged, target);
            return DragOutcome::Absorbed;
        }

        let result = store.move_column(&session.dragged, target);
        if result.success {
            DragOutcome::Reordered(result)
        } else {
            DragOutcome::Absorbed
        }
    }

    /// Cancel the drag without touching the order
    pub fn end_drag(&mut self) -> DragOutcome<K> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                debug!(target: "drag", "Drag of '{}' cancelled", session.dragged);
                DragOutcome::Cancelled
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }
}
