//! Undo and redo action handlers.

use super::{Editor, Response};
use crate::error::Result;

impl Editor {
    /// Revert the last edit of the current buffer.
    pub(super) fn undo(&mut self) -> Result<Response> {
        let buffer = self.registry.current_mut();
        let op = buffer.undo()?;
        tracing::debug!("Undo: {} (depth now {})", op.describe(), buffer.journal().depth());
        Ok(Response::Message(format!("undo: {}", op.describe())))
    }

    /// Reapply the most recently undone edit.
    pub(super) fn redo(&mut self) -> Result<Response> {
        let buffer = self.registry.current_mut();
        let op = buffer.redo()?;
        tracing::debug!("Redo: {} (depth now {})", op.describe(), buffer.journal().depth());
        Ok(Response::Message(format!("redo: {}", op.describe())))
    }
}

#[cfg(test)]
mod tests {
    use crate::app::Editor;
    use crate::config::Config;
    use crate::config_io::DirectoryContext;
    use crate::error::EditorError;
    use crate::services::time_source::TestTimeSource;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_undo_then_redo_delete() {
        let temp = TempDir::new().unwrap();
        let mut ed = Editor::new(
            &Config::default(),
            DirectoryContext::for_testing(temp.path()),
            Arc::new(TestTimeSource::new()),
        );
        for line in ["a", "x", "y", ".", "d 1"] {
            ed.handle_line(line).unwrap();
        }
        assert_eq!(ed.registry().current().lines(), ["y"]);

        ed.handle_line("u").unwrap();
        assert_eq!(ed.registry().current().lines(), ["x", "y"]);
        ed.handle_line("redo").unwrap();
        assert_eq!(ed.registry().current().lines(), ["y"]);

        ed.handle_line("undo").unwrap();
        ed.handle_line("undo").unwrap();
        assert!(ed.registry().current().lines().is_empty());
        assert!(!ed.registry().current().is_dirty());
        assert!(matches!(ed.handle_line("undo"), Err(EditorError::NothingToUndo)));
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let temp = TempDir::new().unwrap();
        let mut ed = Editor::new(
            &Config::default(),
            DirectoryContext::for_testing(temp.path()),
            Arc::new(TestTimeSource::new()),
        );
        for line in ["a", "x", ".", "u", "a", "z", "."] {
            ed.handle_line(line).unwrap();
        }
        assert!(matches!(ed.handle_line("redo"), Err(EditorError::NothingToRedo)));
        assert_eq!(ed.registry().current().lines(), ["z"]);
    }
}
