// EditorTestHarness - drives the interpreter one input line at a time

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use trust::app::{Editor, Response};
use trust::config::Config;
use trust::config_io::DirectoryContext;
use trust::error::EditorError;
use trust::services::recovery::{RecoveryService, RecoveryStorage};
use trust::services::time_source::{TestTimeSource, TimeSource};
use trust::view::render::Renderer;
use trust::view::theme::Painter;

/// An editor session rooted in a private temp directory.
///
/// Every path the editor might touch (config, home, snapshots) points
/// inside the temp directory, so tests can run in parallel.
pub struct EditorTestHarness {
    editor: Editor,
    clock: Arc<TestTimeSource>,
    temp_dir: Arc<TempDir>,
}

impl EditorTestHarness {
    /// A session without recovery snapshots.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(Config::default(), false)
    }

    /// A session that writes snapshots to `<temp>/snapshots`.
    pub fn with_recovery() -> anyhow::Result<Self> {
        Self::with_config(Config::default(), true)
    }

    pub fn with_config(config: Config, recovery: bool) -> anyhow::Result<Self> {
        let temp_dir = Arc::new(tempfile::tempdir()?);
        Self::build(config, recovery, temp_dir)
    }

    /// A second session sharing this one's directory, as if the editor had
    /// been restarted after a crash.
    pub fn restart(&self) -> anyhow::Result<Self> {
        Self::build(Config::default(), true, Arc::clone(&self.temp_dir))
    }

    fn build(config: Config, recovery: bool, temp_dir: Arc<TempDir>) -> anyhow::Result<Self> {
        crate::common::tracing::init_tracing_from_env();
        let clock = Arc::new(TestTimeSource::new());
        let dir_context = DirectoryContext::for_testing(temp_dir.path());
        let mut editor = Editor::new(&config, dir_context, clock.clone());
        if recovery {
            let storage = RecoveryStorage::with_dir(temp_dir.path().join("snapshots"));
            storage.check_writable()?;
            let interval = Duration::from_secs(config.recovery.auto_save_interval_secs);
            editor = editor.with_recovery(RecoveryService::new(storage, interval, clock.now()));
        }
        Ok(Self {
            editor,
            clock,
            temp_dir,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Absolute path of `name` inside the session directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Feed one input line.
    pub fn run(&mut self, line: &str) -> Result<Response, EditorError> {
        self.editor.handle_line(line)
    }

    /// Feed several lines, panicking on the first error.
    pub fn run_all(&mut self, lines: &[&str]) -> Response {
        let mut last = Response::None;
        for line in lines {
            last = self
                .run(line)
                .unwrap_or_else(|e| panic!("{line:?} failed: {e}"));
        }
        last
    }

    /// Feed one line and return what the terminal would show, without colour.
    pub fn output(&mut self, line: &str) -> String {
        let renderer = Renderer::new(Painter::new(self.editor.theme(), false), false);
        let mut out = Vec::new();
        let written = match self.editor.handle_line(line) {
            Ok(response) => renderer.response(&mut out, &response),
            Err(e) => renderer.error(&mut out, self.editor.last_command(), &e),
        };
        written.expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("output is UTF-8")
    }

    /// Lines of the current buffer.
    pub fn lines(&self) -> Vec<String> {
        self.editor.registry().current().lines().to_vec()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.registry().current().is_dirty()
    }

    /// Advance the logical clock and run one main-loop tick.
    pub fn advance_and_tick(&mut self, by: Duration) -> usize {
        self.clock.advance(by);
        self.editor.tick()
    }
}
