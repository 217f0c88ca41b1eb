//! Bounded undo/redo history for one buffer.
//!
//! The journal is a double-ended stack: `past` holds edits that can be undone
//! (oldest at the front so eviction is O(1)), `future` holds edits that were
//! undone and can be redone. Recording a new edit discards the future, the
//! same way a browser discards forward history on navigation.

use std::collections::VecDeque;

use super::edit::EditOp;
use super::line_store::LineStore;
use crate::error::{EditorError, Result};

/// Maximum number of undoable edits kept per buffer.
pub const MAX_UNDO_DEPTH: usize = 200;

#[derive(Debug, Clone)]
pub struct Journal {
    past: VecDeque<EditOp>,
    future: Vec<EditOp>,
    capacity: usize,
    /// `past.len()` at the last save or load. `None` once that state can no
    /// longer be reached by undo/redo.
    clean_point: Option<usize>,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

impl Journal {
    pub fn new() -> Self {
        Self::with_capacity(MAX_UNDO_DEPTH)
    }

    /// A journal keeping at most `capacity` undoable edits (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            capacity: capacity.max(1),
            clean_point: Some(0),
        }
    }

    /// Record an edit that has already been applied to the store.
    pub fn record(&mut self, op: EditOp) {
        // A clean point in the discarded future is gone for good
        if let Some(point) = self.clean_point {
            if point > self.past.len() {
                self.clean_point = None;
            }
        }
        self.future.clear();
        self.past.push_back(op);

        if self.past.len() > self.capacity {
            self.past.pop_front();
            self.clean_point = self.clean_point.and_then(|p| p.checked_sub(1));
        }
    }

    /// Revert the newest edit.
    ///
    /// The entry stays on `past` if the inverse cannot be applied, so a failed
    /// undo changes neither the store nor the journal.
    pub fn undo(&mut self, store: &mut LineStore) -> Result<EditOp> {
        let op = self.past.back().ok_or(EditorError::NothingToUndo)?;
        op.inverse().apply(store)?;
        let op = self.past.pop_back().ok_or(EditorError::NothingToUndo)?;
        self.future.push(op.clone());
        Ok(op)
    }

    /// Reapply the most recently undone edit.
    pub fn redo(&mut self, store: &mut LineStore) -> Result<EditOp> {
        let op = self.future.last().ok_or(EditorError::NothingToRedo)?;
        op.apply(store)?;
        let op = self.future.pop().ok_or(EditorError::NothingToRedo)?;
        self.past.push_back(op.clone());
        Ok(op)
    }

    pub fn mark_clean(&mut self) {
        self.clean_point = Some(self.past.len());
    }

    /// Whether the store matches what was last saved or loaded.
    pub fn is_clean(&self) -> bool {
        self.clean_point == Some(self.past.len())
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undoable edits.
    pub fn depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// True when nothing has ever been recorded or everything was evicted.
    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }
}
