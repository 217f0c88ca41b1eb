//! Ordered line storage for a single buffer.
//!
//! Addresses are 1-based at the API boundary and 0-based internally. Every
//! mutating call validates its address before touching the vector, so a
//! failed call leaves the store exactly as it was.

use crate::error::{EditorError, Result};

/// Inclusive, 1-based range of lines. Always normalised: `1 <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start == 0 || end == 0 {
            return Err(EditorError::address("line numbers start at 1"));
        }
        if end < start {
            return Err(EditorError::address(format!(
                "range end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one line.
    pub fn single(line: usize) -> Result<Self> {
        Self::new(line, line)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of lines covered. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    fn to_index_range(self) -> std::ops::Range<usize> {
        self.start - 1..self.end
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// The text of one buffer as a sequence of lines without terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<String>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        debug_assert!(lines.iter().all(|l| !l.contains('\n')));
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Total characters including one terminator per line.
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count() + 1).sum()
    }

    /// The range covering every line, or `None` for an empty store.
    pub fn full_range(&self) -> Option<LineRange> {
        if self.lines.is_empty() {
            None
        } else {
            Some(LineRange {
                start: 1,
                end: self.lines.len(),
            })
        }
    }

    /// Validate that `range` lies inside `[1, line_count]`.
    pub fn check(&self, range: LineRange) -> Result<()> {
        if self.lines.is_empty() {
            return Err(EditorError::address(format!(
                "{range}: buffer is empty"
            )));
        }
        if range.end > self.lines.len() {
            return Err(EditorError::address(format!(
                "{range}: buffer has {} line(s)",
                self.lines.len()
            )));
        }
        Ok(())
    }

    /// Validate an insertion point: `1 <= before <= line_count + 1`.
    pub fn check_insert(&self, before: usize) -> Result<()> {
        if before == 0 || before > self.lines.len() + 1 {
            return Err(EditorError::address(format!(
                "cannot insert before line {before}: buffer has {} line(s)",
                self.lines.len()
            )));
        }
        Ok(())
    }

    pub fn read(&self, range: LineRange) -> Result<&[String]> {
        self.check(range)?;
        Ok(&self.lines[range.to_index_range()])
    }

    /// Insert `lines` before line `before`. Returns the range now occupied by
    /// the new lines, or `None` when `lines` is empty.
    pub fn insert(&mut self, before: usize, lines: Vec<String>) -> Result<Option<LineRange>> {
        self.check_insert(before)?;
        if lines.is_empty() {
            return Ok(None);
        }
        let count = lines.len();
        let idx = before - 1;
        self.lines.splice(idx..idx, lines);
        Ok(Some(LineRange {
            start: before,
            end: before + count - 1,
        }))
    }

    /// Remove `range`, returning the removed lines.
    pub fn delete(&mut self, range: LineRange) -> Result<Vec<String>> {
        self.check(range)?;
        Ok(self.lines.drain(range.to_index_range()).collect())
    }

    /// Replace `range` with `lines`, returning the displaced lines.
    pub fn replace(&mut self, range: LineRange, lines: Vec<String>) -> Result<Vec<String>> {
        self.check(range)?;
        Ok(self.lines.splice(range.to_index_range(), lines).collect())
    }
}
