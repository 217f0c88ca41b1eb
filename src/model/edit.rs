use super::line_store::{LineRange, LineStore};
use crate::error::Result;

/// Represents a single reversible edit in a buffer's history.
///
/// Each variant carries the line number where it applies and every line it
/// adds or removes, so the inverse can be built without consulting the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// `lines` were inserted before line `at`.
    Insert { at: usize, lines: Vec<String> },
    /// `lines` were removed starting at line `at`.
    Delete { at: usize, lines: Vec<String> },
    /// `old` starting at line `at` was replaced by `new`.
    Replace {
        at: usize,
        old: Vec<String>,
        new: Vec<String>,
    },
}

impl EditOp {
    /// Create a new insert edit
    pub fn insert(at: usize, lines: Vec<String>) -> Self {
        Self::Insert { at, lines }
    }

    /// Create a new delete edit
    pub fn delete(at: usize, lines: Vec<String>) -> Self {
        Self::Delete { at, lines }
    }

    /// Create a new replace edit
    pub fn replace(at: usize, old: Vec<String>, new: Vec<String>) -> Self {
        Self::Replace { at, old, new }
    }

    /// The edit that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            EditOp::Insert { at, lines } => EditOp::Delete {
                at: *at,
                lines: lines.clone(),
            },
            EditOp::Delete { at, lines } => EditOp::Insert {
                at: *at,
                lines: lines.clone(),
            },
            EditOp::Replace { at, old, new } => EditOp::Replace {
                at: *at,
                old: new.clone(),
                new: old.clone(),
            },
        }
    }

    /// Re-execute this edit against `store`.
    ///
    /// Fails with an address error, leaving `store` untouched, if the store
    /// is not in the shape the edit was recorded against.
    pub fn apply(&self, store: &mut LineStore) -> Result<()> {
        match self {
            EditOp::Insert { at, lines } => {
                store.insert(*at, lines.clone())?;
            }
            EditOp::Delete { at, lines } => {
                if lines.is_empty() {
                    return Ok(());
                }
                let removed = store.delete(span(*at, lines.len())?)?;
                debug_assert_eq!(&removed, lines);
            }
            EditOp::Replace { at, old, new } => {
                if old.is_empty() {
                    store.insert(*at, new.clone())?;
                } else {
                    let displaced = store.replace(span(*at, old.len())?, new.clone())?;
                    debug_assert_eq!(&displaced, old);
                }
            }
        }
        Ok(())
    }

    /// Short description used in status messages.
    pub fn describe(&self) -> String {
        match self {
            EditOp::Insert { at, lines } => {
                format!("insert {} line(s) at {}", lines.len(), at)
            }
            EditOp::Delete { at, lines } => {
                format!("delete {} line(s) at {}", lines.len(), at)
            }
            EditOp::Replace { at, old, new } => {
                format!("replace {} line(s) at {} with {}", old.len(), at, new.len())
            }
        }
    }
}

fn span(at: usize, len: usize) -> Result<LineRange> {
    LineRange::new(at, at + len - 1)
}
