//! Reading input lines.
//!
//! [`TerminalReader`] edits the line itself with the terminal in raw mode,
//! which gives history, completion and cursor movement. [`PlainReader`] is
//! used when stdin is a pipe or file and simply reads lines.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use super::line_editor::LineEditor;
use super::prompt::Prompt;
use super::theme::Painter;
use crate::input::completion::{complete, Completion, CompletionContext};
use crate::input::history::InputHistory;
use crate::services::terminal_modes::RawModeGuard;

/// What the line is for. Only commands get history and completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Command,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C while reading
    Interrupted,
    /// End of input, or Ctrl-D on an empty line
    Eof,
}

/// State the reader needs from the editor, refreshed before each read.
#[derive(Debug, Clone)]
pub struct ReaderContext {
    /// Command and alias names offered by completion
    pub names: Vec<String>,
    pub painter: Painter,
}

/// A source of input lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &Prompt, mode: ReadMode) -> io::Result<ReadOutcome>;

    fn update_context(&mut self, _ctx: ReaderContext) {}
}

/// Result of feeding one key to the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep reading; the line needs redrawing
    Redraw,
    /// Keep reading; nothing changed
    Ignore,
    /// Print these completion candidates below the prompt, then redraw
    ShowCandidates(Vec<String>),
    Submit(String),
    Interrupt,
    Eof,
}

/// Interactive reader for a terminal.
#[derive(Debug)]
pub struct TerminalReader {
    editor: LineEditor,
    history: InputHistory,
    names: Vec<String>,
    home: Option<PathBuf>,
    painter: Painter,
    /// Complete lines from a multi-line paste, returned before reading keys
    queued: VecDeque<String>,
}

impl TerminalReader {
    pub fn new(history_limit: usize, home: Option<PathBuf>, painter: Painter) -> Self {
        Self {
            editor: LineEditor::new(),
            history: InputHistory::with_capacity(history_limit),
            names: Vec::new(),
            home,
            painter,
            queued: VecDeque::new(),
        }
    }

    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    pub fn line(&self) -> &LineEditor {
        &self.editor
    }

    /// Apply one key press to the line being edited.
    pub fn handle_key(&mut self, key: KeyEvent, mode: ReadMode) -> KeyAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let command = mode == ReadMode::Command;

        match key.code {
            KeyCode::Enter => {
                let line = self.editor.take();
                if command {
                    self.history.push(&line);
                }
                KeyAction::Submit(line)
            }
            KeyCode::Char('c') if ctrl => {
                self.editor.take();
                self.queued.clear();
                self.history.reset_navigation();
                KeyAction::Interrupt
            }
            KeyCode::Char('d') if ctrl => {
                if self.editor.is_empty() {
                    self.history.reset_navigation();
                    KeyAction::Eof
                } else {
                    self.editor.delete();
                    KeyAction::Redraw
                }
            }
            KeyCode::Char('a') if ctrl => {
                self.editor.move_home();
                KeyAction::Redraw
            }
            KeyCode::Char('e') if ctrl => {
                self.editor.move_end();
                KeyAction::Redraw
            }
            KeyCode::Char('u') if ctrl => {
                self.editor.kill_to_start();
                KeyAction::Redraw
            }
            KeyCode::Char('k') if ctrl => {
                self.editor.kill_to_end();
                KeyAction::Redraw
            }
            KeyCode::Char(_) if ctrl => KeyAction::Ignore,
            KeyCode::Char(c) => {
                self.editor.insert_char(c);
                KeyAction::Redraw
            }
            KeyCode::Backspace => {
                self.editor.backspace();
                KeyAction::Redraw
            }
            KeyCode::Delete => {
                self.editor.delete();
                KeyAction::Redraw
            }
            KeyCode::Left => {
                self.editor.move_left();
                KeyAction::Redraw
            }
            KeyCode::Right => {
                self.editor.move_right();
                KeyAction::Redraw
            }
            KeyCode::Home => {
                self.editor.move_home();
                KeyAction::Redraw
            }
            KeyCode::End => {
                self.editor.move_end();
                KeyAction::Redraw
            }
            KeyCode::Up if command => match self.history.previous(self.editor.text()) {
                Some(entry) => {
                    let entry = entry.to_string();
                    self.editor.set_text(&entry);
                    KeyAction::Redraw
                }
                None => KeyAction::Ignore,
            },
            KeyCode::Down if command => match self.history.next() {
                Some(entry) => {
                    let entry = entry.to_string();
                    self.editor.set_text(&entry);
                    KeyAction::Redraw
                }
                None => KeyAction::Ignore,
            },
            KeyCode::Tab if command => self.complete(),
            KeyCode::Tab => {
                self.editor.insert_char('\t');
                KeyAction::Redraw
            }
            _ => KeyAction::Ignore,
        }
    }

    /// Bracketed paste.
    ///
    /// A command is always one line, so line breaks become spaces. While
    /// collecting text each pasted line is its own input line: the first
    /// completes the line being edited, the middle ones are queued, and text
    /// after the last break stays in the editor.
    pub fn handle_paste(&mut self, text: &str, mode: ReadMode) -> KeyAction {
        if mode == ReadMode::Command || !text.contains('\n') {
            self.editor.insert_str(text);
            return KeyAction::Redraw;
        }

        let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));
        self.editor.insert_str(lines.next().unwrap_or_default());
        let submitted = self.editor.take();

        let mut rest: Vec<&str> = lines.collect();
        let partial = rest.pop().unwrap_or_default();
        for line in rest {
            self.editor.insert_str(line);
            self.queued.push_back(self.editor.take());
        }
        self.editor.insert_str(partial);
        tracing::debug!("Paste split into {} queued line(s)", self.queued.len());
        KeyAction::Submit(submitted)
    }

    /// Next complete line left over from a multi-line paste.
    pub fn take_queued_line(&mut self) -> Option<String> {
        self.queued.pop_front()
    }

    fn complete(&mut self) -> KeyAction {
        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                tracing::debug!("Completion without a working directory: {}", e);
                return KeyAction::Ignore;
            }
        };
        let ctx = CompletionContext {
            names: self.names.clone(),
            cwd,
            home: self.home.clone(),
        };
        match complete(self.editor.before_cursor(), &ctx) {
            Completion::None => KeyAction::Ignore,
            Completion::Replace { start, text } => {
                self.editor.replace_before_cursor(start, &text);
                KeyAction::Redraw
            }
            Completion::Candidates(candidates) => KeyAction::ShowCandidates(candidates),
        }
    }

    fn redraw(&self, out: &mut impl Write, prompt: &Prompt) -> io::Result<()> {
        let text = self.painter.paint(|p| p.input, self.editor.text());
        let column = prompt.width() + self.editor.cursor_column();
        out.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::UntilNewLine))?
            .queue(Print(prompt.render(&self.painter)))?
            .queue(Print(text))?
            .queue(MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)))?;
        out.flush()
    }

    /// Leave a submitted line on screen as it was entered.
    fn finish_line(&self, out: &mut impl Write, prompt: &Prompt, line: &str) -> io::Result<()> {
        out.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::UntilNewLine))?
            .queue(Print(prompt.render(&self.painter)))?
            .queue(Print(self.painter.paint(|p| p.input, line)))?
            .queue(Print("\r\n"))?;
        out.flush()
    }
}

impl LineSource for TerminalReader {
    fn read_line(&mut self, prompt: &Prompt, mode: ReadMode) -> io::Result<ReadOutcome> {
        let mut out = io::stdout();
        if let Some(line) = self.take_queued_line() {
            self.finish_line(&mut out, prompt, &line)?;
            return Ok(ReadOutcome::Line(line));
        }

        let _guard = RawModeGuard::enable().map_err(io::Error::other)?;
        self.redraw(&mut out, prompt)?;

        loop {
            let action = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key, mode),
                Event::Paste(text) => self.handle_paste(&text, mode),
                Event::Resize(_, _) => KeyAction::Redraw,
                _ => KeyAction::Ignore,
            };

            match action {
                KeyAction::Ignore => {}
                KeyAction::Redraw => self.redraw(&mut out, prompt)?,
                KeyAction::ShowCandidates(candidates) => {
                    out.queue(Print("\r\n"))?
                        .queue(Print(candidates.join("  ")))?
                        .queue(Print("\r\n"))?;
                    self.redraw(&mut out, prompt)?;
                }
                KeyAction::Submit(line) => {
                    self.finish_line(&mut out, prompt, &line)?;
                    return Ok(ReadOutcome::Line(line));
                }
                KeyAction::Interrupt => {
                    out.queue(Print("^C\r\n"))?;
                    out.flush()?;
                    return Ok(ReadOutcome::Interrupted);
                }
                KeyAction::Eof => {
                    out.queue(Print("\r\n"))?;
                    out.flush()?;
                    return Ok(ReadOutcome::Eof);
                }
            }
        }
    }

    fn update_context(&mut self, ctx: ReaderContext) {
        self.names = ctx.names;
        self.painter = ctx.painter;
    }
}

/// Line reader for non-interactive input.
#[derive(Debug)]
pub struct PlainReader<R> {
    input: R,
    buf: String,
}

impl<R: BufRead> PlainReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> LineSource for PlainReader<R> {
    fn read_line(&mut self, _prompt: &Prompt, _mode: ReadMode) -> io::Result<ReadOutcome> {
        self.buf.clear();
        if self.input.read_line(&mut self.buf)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        let line = self
            .buf
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(&self.buf);
        Ok(ReadOutcome::Line(line.to_string()))
    }
}
