/// Command-line history with Up/Down navigation.
///
/// Entries are kept oldest first. Browsing starts past the newest entry; the
/// text that was being typed when browsing began (the draft) is handed back
/// when the user steps forward past the newest entry again.
use crate::config::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Clone)]
pub struct InputHistory {
    entries: Vec<String>,

    /// Index of the entry being shown, `None` when not browsing
    current_index: Option<usize>,

    max_entries: usize,

    /// Text typed before browsing started
    draft: String,
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_index: None,
            max_entries: max_entries.max(1),
            draft: String::new(),
        }
    }

    /// Record a submitted line and stop browsing.
    ///
    /// Blank lines and an exact repeat of the newest entry are not stored.
    pub fn push(&mut self, line: &str) {
        self.reset_navigation();
        if line.trim().is_empty() {
            return;
        }
        if self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    /// Step to an older entry. `current_text` is saved as the draft when
    /// browsing starts. Returns `None` when there is nothing older.
    pub fn previous(&mut self, current_text: &str) -> Option<&str> {
        let index = match self.current_index {
            None => {
                if self.entries.is_empty() {
                    return None;
                }
                self.draft = current_text.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(i) => i - 1,
        };
        self.current_index = Some(index);
        Some(&self.entries[index])
    }

    /// Step to a newer entry, or back to the draft after the newest one.
    /// Returns `None` when not browsing.
    pub fn next(&mut self) -> Option<&str> {
        let index = self.current_index?;
        if index + 1 < self.entries.len() {
            self.current_index = Some(index + 1);
            Some(&self.entries[index + 1])
        } else {
            self.current_index = None;
            Some(&self.draft)
        }
    }

    pub fn reset_navigation(&mut self) {
        self.current_index = None;
        self.draft.clear();
    }

    pub fn is_browsing(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
