use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::edit::EditOp;
use super::journal::Journal;
use super::line_store::{LineRange, LineStore};
use crate::error::Result;

/// Display name of a buffer with no file.
pub const UNNAMED: &str = "(unnamed)";

/// Stable identifier of a buffer for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

static UNNAMED_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Identity used to name the recovery snapshot of a buffer without a path.
fn unnamed_recovery_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let n = UNNAMED_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("unsaved-{}-{}-{}", std::process::id(), nanos, n)
}

/// One open document: its lines, its history and where it lives on disk.
#[derive(Debug)]
pub struct Buffer {
    id: BufferId,
    store: LineStore,
    journal: Journal,
    path: Option<PathBuf>,
    recovery_id: String,
    /// Bumped on every content change
    revision: u64,
    /// Opened on a path that did not exist yet
    new_file: bool,
}

impl Buffer {
    pub fn new_unnamed(id: BufferId, undo_limit: usize) -> Self {
        Self {
            id,
            store: LineStore::new(),
            journal: Journal::with_capacity(undo_limit),
            path: None,
            recovery_id: unnamed_recovery_id(),
            revision: 0,
            new_file: false,
        }
    }

    /// A buffer holding the contents of the file at `path`.
    pub fn from_file(id: BufferId, path: PathBuf, lines: Vec<String>, undo_limit: usize) -> Self {
        Self {
            id,
            store: LineStore::from_lines(lines),
            journal: Journal::with_capacity(undo_limit),
            recovery_id: path.to_string_lossy().into_owned(),
            path: Some(path),
            revision: 0,
            new_file: false,
        }
    }

    /// An empty buffer for a path that will be created on first save.
    pub fn new_file(id: BufferId, path: PathBuf, undo_limit: usize) -> Self {
        let mut buffer = Self::from_file(id, path, Vec::new(), undo_limit);
        buffer.new_file = true;
        buffer
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    pub fn lines(&self) -> &[String] {
        self.store.lines()
    }

    pub fn line_count(&self) -> usize {
        self.store.line_count()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Associate the buffer with a file. The recovery identity follows the
    /// path so snapshots are found again when the file is reopened.
    pub fn set_path(&mut self, path: PathBuf) {
        self.recovery_id = path.to_string_lossy().into_owned();
        self.path = Some(path);
    }

    /// The path for display, or `(unnamed)`.
    pub fn name(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => UNNAMED.to_string(),
        }
    }

    pub fn recovery_id(&self) -> &str {
        &self.recovery_id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_new_file(&self) -> bool {
        self.new_file
    }

    pub fn is_dirty(&self) -> bool {
        !self.journal.is_clean()
    }

    /// Unnamed, empty, clean and without history: safe to replace on `open`.
    pub fn is_pristine(&self) -> bool {
        self.path.is_none() && self.store.is_empty() && self.journal.is_empty()
    }

    /// Record that the contents now match the file on disk.
    pub fn mark_saved(&mut self) {
        self.journal.mark_clean();
        self.new_file = false;
    }

    fn commit(&mut self, op: EditOp) -> Result<()> {
        op.apply(&mut self.store)?;
        tracing::trace!("buffer {:?}: {}", self.id, op.describe());
        self.journal.record(op);
        self.revision += 1;
        Ok(())
    }

    /// Insert `lines` before line `before` as one undoable edit.
    pub fn insert_lines(&mut self, before: usize, lines: Vec<String>) -> Result<Option<LineRange>> {
        self.store.check_insert(before)?;
        if lines.is_empty() {
            return Ok(None);
        }
        let count = lines.len();
        self.commit(EditOp::insert(before, lines))?;
        LineRange::new(before, before + count - 1).map(Some)
    }

    /// Append `lines` after the last line.
    pub fn append_lines(&mut self, lines: Vec<String>) -> Result<Option<LineRange>> {
        self.insert_lines(self.store.line_count() + 1, lines)
    }

    pub fn delete_lines(&mut self, range: LineRange) -> Result<Vec<String>> {
        let old = self.store.read(range)?.to_vec();
        self.commit(EditOp::delete(range.start(), old.clone()))?;
        Ok(old)
    }

    /// Replace `range` with `lines`. With no replacement lines this is a
    /// plain deletion.
    pub fn replace_lines(&mut self, range: LineRange, lines: Vec<String>) -> Result<()> {
        if lines.is_empty() {
            return self.delete_lines(range).map(|_| ());
        }
        let old = self.store.read(range)?.to_vec();
        self.commit(EditOp::replace(range.start(), old, lines))
    }

    /// Replace the whole contents as a single edit.
    pub fn replace_all(&mut self, lines: Vec<String>) -> Result<()> {
        match self.store.full_range() {
            Some(range) => self.replace_lines(range, lines),
            None => self.insert_lines(1, lines).map(|_| ()),
        }
    }

    pub fn undo(&mut self) -> Result<EditOp> {
        let op = self.journal.undo(&mut self.store)?;
        self.revision += 1;
        Ok(op)
    }

    pub fn redo(&mut self) -> Result<EditOp> {
        let op = self.journal.redo(&mut self.store)?;
        self.revision += 1;
        Ok(op)
    }

    /// 1-based numbers and text of the lines containing `needle`.
    ///
    /// With `ignore_case`, both sides are compared in Unicode lowercase.
    pub fn find(&self, needle: &str, ignore_case: bool) -> Vec<(usize, &str)> {
        let folded = needle.to_lowercase();
        self.store
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| {
                if ignore_case {
                    line.to_lowercase().contains(&folded)
                } else {
                    line.contains(needle)
                }
            })
            .map(|(i, line)| (i + 1, line.as_str()))
            .collect()
    }
}
