//! The set of open buffers and which one is current.

use std::io;
use std::path::{Path, PathBuf};

use super::buffer::{Buffer, BufferId};
use super::journal::MAX_UNDO_DEPTH;
use crate::error::{EditorError, Result};
use crate::services::persistence;

/// One row of `lsb` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSummary {
    /// 1-based position in the list
    pub index: usize,
    pub name: String,
    pub dirty: bool,
    pub current: bool,
}

/// What [`BufferRegistry::open`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The path was already open; it is now current.
    Switched,
    /// The file was read into a new buffer.
    Loaded { lines: usize },
    /// The file does not exist yet; an empty buffer was created for it.
    NewFile,
}

/// Ordered collection of buffers. Never empty.
#[derive(Debug)]
pub struct BufferRegistry {
    buffers: Vec<Buffer>,
    current: usize,
    next_id: usize,
    undo_limit: usize,
}

impl Default for BufferRegistry {
    fn default() -> Self {
        Self::new(MAX_UNDO_DEPTH)
    }
}

impl BufferRegistry {
    /// A registry holding one unnamed buffer.
    pub fn new(undo_limit: usize) -> Self {
        let mut registry = Self {
            buffers: Vec::new(),
            current: 0,
            next_id: 0,
            undo_limit,
        };
        let first = Buffer::new_unnamed(registry.alloc_id(), undo_limit);
        registry.buffers.push(first);
        registry
    }

    fn alloc_id(&mut self) -> BufferId {
        let id = BufferId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current]
    }

    /// 1-based position of the current buffer.
    pub fn current_index(&self) -> usize {
        self.current + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.iter()
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id() == id)
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.iter().find(|b| b.id() == id)
    }

    /// Add an unnamed buffer and make it current.
    pub fn create_new(&mut self) -> BufferId {
        let id = self.alloc_id();
        self.buffers.push(Buffer::new_unnamed(id, self.undo_limit));
        self.current = self.buffers.len() - 1;
        id
    }

    /// Add an unnamed buffer pre-filled with `lines` as one undoable edit, so
    /// it starts out dirty.
    pub fn create_with_lines(&mut self, lines: Vec<String>) -> Result<BufferId> {
        let id = self.create_new();
        self.current_mut().insert_lines(1, lines)?;
        Ok(id)
    }

    pub fn next(&mut self) -> BufferId {
        self.current = (self.current + 1) % self.buffers.len();
        self.current().id()
    }

    pub fn previous(&mut self) -> BufferId {
        self.current = (self.current + self.buffers.len() - 1) % self.buffers.len();
        self.current().id()
    }

    pub fn list(&self) -> Vec<BufferSummary> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(i, b)| BufferSummary {
                index: i + 1,
                name: b.name(),
                dirty: b.is_dirty(),
                current: i == self.current,
            })
            .collect()
    }

    pub fn dirty_buffers(&self) -> Vec<&Buffer> {
        self.buffers.iter().filter(|b| b.is_dirty()).collect()
    }

    /// Make `path` the current buffer, loading it if it is not open yet.
    ///
    /// On an I/O error other than "not found" the registry is left untouched.
    pub fn open(&mut self, path: &Path) -> Result<OpenOutcome> {
        let path = absolutize(path);

        if let Some(pos) = self.buffers.iter().position(|b| b.path() == Some(path.as_path())) {
            self.current = pos;
            return Ok(OpenOutcome::Switched);
        }

        let id = self.alloc_id();
        let (buffer, outcome) = match persistence::load_lines(&path) {
            Ok(lines) => {
                let count = lines.len();
                (
                    Buffer::from_file(id, path, lines, self.undo_limit),
                    OpenOutcome::Loaded { lines: count },
                )
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => (
                Buffer::new_file(id, path, self.undo_limit),
                OpenOutcome::NewFile,
            ),
            Err(e) => return Err(EditorError::io(path, e)),
        };
        tracing::info!("opened {} ({:?})", buffer.name(), outcome);

        if self.current().is_pristine() {
            self.buffers[self.current] = buffer;
        } else {
            self.buffers.push(buffer);
            self.current = self.buffers.len() - 1;
        }
        Ok(outcome)
    }
}

/// Resolve `path` against the working directory without touching the
/// filesystem (the file may not exist yet).
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
