//! Opening, saving, switching and quitting.

use std::path::{Path, PathBuf};

use super::{no_args, one_arg, Editor, PendingInput, Response};
use crate::error::{EditorError, Result, Warning};
use crate::input::completion::expand_home;
use crate::input::parser::ParsedCommand;
use crate::model::registry::{absolutize, OpenOutcome};
use crate::services::persistence::save_lines;

impl Editor {
    pub(super) fn open_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let path = one_arg(cmd, "open <path>")?;
        self.open_path(Path::new(path))
    }

    /// Open a file named on the command line or by `open`, then offer any
    /// snapshot left behind for it.
    pub fn open_path(&mut self, path: &Path) -> Result<Response> {
        let path = self.expand(&path.to_string_lossy());
        let outcome = self.registry.open(&path)?;
        let buffer = self.registry.current();
        let message = match outcome {
            OpenOutcome::Switched => format!("switched to {}", buffer.name()),
            OpenOutcome::Loaded { lines } => format!("opened {} ({} lines)", buffer.name(), lines),
            OpenOutcome::NewFile => format!("(new) {}", buffer.name()),
        };
        let opened = Response::Message(message);

        if outcome == OpenOutcome::Switched {
            return Ok(opened);
        }
        match self.offer_recovery() {
            Some(question) => Ok(Response::Batch(vec![opened, question])),
            None => Ok(opened),
        }
    }

    /// Summary shown before each command prompt when `editor.status_line`
    /// is on. Nothing while lines are being collected.
    pub fn status_line(&self) -> Option<String> {
        if !self.show_status_line || self.pending.is_some() {
            return None;
        }
        let buffer = self.registry.current();
        Some(format!(
            "[{}{}] lines={} chars={} theme={}",
            buffer.name(),
            if buffer.is_dirty() { " *" } else { "" },
            buffer.line_count(),
            buffer.store().char_count(),
            self.theme
        ))
    }

    pub(super) fn info(&self) -> Response {
        let buffer = self.registry.current();
        Response::Text(vec![
            format!(
                "file: {}{}",
                buffer.name(),
                if buffer.is_dirty() { " *" } else { "" }
            ),
            format!("  lines: {}", buffer.line_count()),
            format!("  chars: {}", buffer.store().char_count()),
            format!(
                "  buffer: {} of {}",
                self.registry.current_index(),
                self.registry.len()
            ),
            format!(
                "  undo: {} step(s), redo: {} step(s)",
                buffer.journal().depth(),
                buffer.journal().redo_depth()
            ),
            format!("  theme: {}", self.theme),
        ])
    }

    pub(super) fn write_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let target = match cmd.args.as_slice() {
            [] => None,
            [path] => Some(path.as_str()),
            _ => return Err(EditorError::usage("w|write [path]")),
        };
        self.write_current(target)
    }

    /// Save the current buffer, to `target` if given (which becomes its path).
    fn write_current(&mut self, target: Option<&str>) -> Result<Response> {
        let target = match target {
            Some(path) => absolutize(&self.expand(path)),
            None => self
                .registry
                .current()
                .path()
                .map(Path::to_path_buf)
                .ok_or(EditorError::NoFileName)?,
        };

        let buffer = self.registry.current_mut();
        save_lines(&target, buffer.lines(), &self.save_options)?;

        let old_identity = buffer.recovery_id().to_string();
        if buffer.path() != Some(target.as_path()) {
            buffer.set_path(target.clone());
        }
        buffer.mark_saved();
        let count = buffer.line_count();
        tracing::info!("saved {} ({} lines)", target.display(), count);

        if let Some(recovery) = self.recovery.as_mut() {
            let buffer = self.registry.current();
            recovery.discard(buffer);
            if old_identity != buffer.recovery_id() {
                recovery.discard_identity(&old_identity);
            }
        }

        Ok(Response::Message(format!(
            "saved {} ({} lines)",
            target.display(),
            count
        )))
    }

    /// `wq`: save, then quit. A failed save keeps the session running.
    pub(super) fn write_quit(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        no_args(cmd, "wq")?;
        let saved = self.write_current(None)?;
        match self.quit(false) {
            Response::Quit => Ok(Response::Quit),
            other => Ok(Response::Batch(vec![saved, other])),
        }
    }

    /// Quit unless some buffer has unsaved changes, in which case ask first.
    pub(super) fn quit(&mut self, force: bool) -> Response {
        if force {
            return Response::Quit;
        }
        let buffers: Vec<String> = self
            .registry
            .dirty_buffers()
            .iter()
            .map(|b| b.name())
            .collect();
        if buffers.is_empty() {
            return Response::Quit;
        }
        self.pending = Some(PendingInput::ConfirmQuit);
        Response::Warning(Warning::DirtyQuit { buffers })
    }

    pub(super) fn answer_quit(&mut self, yes: bool) -> Response {
        if yes {
            Response::Quit
        } else {
            Response::Text(vec!["(quit cancelled)".to_string()])
        }
    }

    pub(super) fn new_buffer(&mut self) -> Response {
        self.registry.create_new();
        Response::Message("(new buffer)".to_string())
    }

    pub(super) fn cycle_buffer(&mut self, forward: bool) -> Response {
        if self.registry.len() == 1 {
            return Response::Warning(Warning::OnlyOneBuffer);
        }
        let label = if forward {
            self.registry.next();
            "bnext"
        } else {
            self.registry.previous();
            "bprev"
        };
        Response::Message(format!("[{}] {}", label, self.registry.current().name()))
    }

    pub(super) fn list_buffers(&self) -> Response {
        let rows = self
            .registry
            .list()
            .into_iter()
            .map(|b| {
                format!(
                    "{} {} {}{}",
                    if b.current { '*' } else { ' ' },
                    b.index,
                    b.name,
                    if b.dirty { " +" } else { "" }
                )
            })
            .collect();
        Response::Text(rows)
    }

    /// Expand `~` against the session's home directory.
    pub(super) fn expand(&self, path: &str) -> PathBuf {
        expand_home(path, self.dir_context.home_dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config_io::DirectoryContext;
    use crate::services::time_source::TestTimeSource;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn editor(temp: &TempDir) -> Editor {
        Editor::new(
            &Config::default(),
            DirectoryContext::for_testing(temp.path()),
            Arc::new(TestTimeSource::new()),
        )
    }

    #[test]
    fn test_status_line_follows_config_and_mode() {
        let temp = TempDir::new().unwrap();
        assert_eq!(editor(&temp).status_line(), None);

        let mut config = Config::default();
        config.editor.status_line = true;
        let mut ed = Editor::new(
            &config,
            DirectoryContext::for_testing(temp.path()),
            Arc::new(TestTimeSource::new()),
        );
        assert_eq!(
            ed.status_line().as_deref(),
            Some("[(unnamed)] lines=0 chars=0 theme=default")
        );

        ed.handle_line("append").unwrap();
        assert_eq!(ed.status_line(), None);
        ed.handle_line("héllo").unwrap();
        ed.handle_line(".").unwrap();
        assert_eq!(
            ed.status_line().as_deref(),
            Some("[(unnamed) *] lines=1 chars=6 theme=default")
        );
    }

    #[test]
    fn test_open_reports_line_count() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "a\nb\n").unwrap();
        let mut ed = editor(&temp);

        let response = ed.open_path(&path).unwrap();
        assert_eq!(
            response,
            Response::Message(format!("opened {} (2 lines)", path.display()))
        );
        assert_eq!(ed.open_path(&path).unwrap(), Response::Message(format!("switched to {}", path.display())));
        assert_eq!(ed.registry().len(), 1);
    }

    #[test]
    fn test_write_without_name_fails() {
        let temp = TempDir::new().unwrap();
        let mut ed = editor(&temp);
        ed.handle_line("append").unwrap();
        ed.handle_line("x").unwrap();
        ed.handle_line(".").unwrap();
        assert!(matches!(ed.handle_line("w"), Err(EditorError::NoFileName)));
        assert!(ed.registry().current().is_dirty());
    }

    #[test]
    fn test_write_to_path_names_buffer() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out.txt");
        let mut ed = editor(&temp);
        ed.handle_line("append").unwrap();
        ed.handle_line("hello").unwrap();
        ed.handle_line(".").unwrap();

        ed.handle_line(&format!("write {}", target.display())).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
        assert_eq!(ed.registry().current().path(), Some(target.as_path()));
        assert!(!ed.registry().current().is_dirty());
    }

    #[test]
    fn test_dirty_quit_asks_and_can_be_declined() {
        let temp = TempDir::new().unwrap();
        let mut ed = editor(&temp);
        ed.handle_line("append").unwrap();
        ed.handle_line("keep me").unwrap();
        ed.handle_line(".").unwrap();

        let response = ed.handle_line("quit").unwrap();
        assert_eq!(
            response,
            Response::Warning(Warning::DirtyQuit {
                buffers: vec!["(unnamed)".to_string()]
            })
        );
        assert_eq!(ed.handle_line("n").unwrap(), Response::Text(vec!["(quit cancelled)".into()]));
        assert_eq!(ed.registry().current().lines(), ["keep me"]);

        ed.handle_line("q").unwrap();
        assert_eq!(ed.handle_line("yes").unwrap(), Response::Quit);
    }

    #[test]
    fn test_force_quit_skips_check() {
        let temp = TempDir::new().unwrap();
        let mut ed = editor(&temp);
        ed.handle_line("a").unwrap();
        ed.handle_line("x").unwrap();
        ed.handle_line(".").unwrap();
        assert_eq!(ed.handle_line("q!").unwrap(), Response::Quit);
    }

    #[test]
    fn test_bnext_with_one_buffer_warns() {
        let temp = TempDir::new().unwrap();
        let mut ed = editor(&temp);
        assert_eq!(
            ed.handle_line("bnext").unwrap(),
            Response::Warning(Warning::OnlyOneBuffer)
        );
    }

    #[test]
    fn test_list_buffers_marks_current_and_dirty() {
        let temp = TempDir::new().unwrap();
        let mut ed = editor(&temp);
        ed.handle_line("a").unwrap();
        ed.handle_line("x").unwrap();
        ed.handle_line(".").unwrap();
        ed.handle_line("new").unwrap();
        assert_eq!(
            ed.handle_line("lsb").unwrap(),
            Response::Text(vec![
                "  1 (unnamed) +".to_string(),
                "* 2 (unnamed)".to_string()
            ])
        );
    }
}
