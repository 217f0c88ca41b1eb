//! The command interpreter.
//!
//! [`Editor`] owns every buffer and all session state. Each input line goes
//! through [`Editor::handle_line`], which either routes it to a pending
//! interaction (line collection, a yes/no question) or parses and runs it as
//! a command. The result is a [`Response`] for the renderer, or an
//! [`EditorError`] that leaves buffers exactly as they were.

mod buffer_actions;
mod edit_actions;
mod fs_actions;
mod recovery_actions;
mod undo_actions;
mod view_actions;

use crate::config::Config;
use crate::config_io::DirectoryContext;
use crate::error::{EditorError, Result, Warning};
use crate::input::commands::{all_names, command_for, Verb};
use crate::input::parser::{parse_command, Aliases, ParsedCommand};
use crate::model::buffer::BufferId;
use crate::model::line_store::LineRange;
use crate::model::registry::BufferRegistry;
use crate::services::persistence::SaveOptions;
use crate::services::recovery::{RecoveryEntry, RecoveryService};
use crate::services::time_source::SharedTimeSource;
use crate::view::prompt::Prompt;
use crate::view::reader::ReadMode;
use crate::view::theme::{Painter, Theme};

/// One printed buffer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintedLine {
    /// 1-based line number
    pub number: usize,
    pub text: String,
}

/// Where collected lines go once the terminating `.` arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectTarget {
    Append,
    /// Before this line
    Insert(usize),
    Change(LineRange),
}

/// Input the next line is answering instead of being a command.
#[derive(Debug, Clone)]
pub enum PendingInput {
    Collect {
        buffer: BufferId,
        target: CollectTarget,
        lines: Vec<String>,
    },
    ConfirmQuit,
    ConfirmRecovery {
        buffer: BufferId,
        entry: RecoveryEntry,
    },
}

/// What a handled line produced, for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    None,
    /// Confirmation of a completed action
    Message(String),
    /// Buffer lines. `gutter` is the number column width when numbering is on.
    Lines {
        lines: Vec<PrintedLine>,
        gutter: Option<usize>,
    },
    /// Search hits
    Matches(Vec<PrintedLine>),
    /// Plain informational output
    Text(Vec<String>),
    Warning(Warning),
    /// A yes/no question; the answer is the next line
    Question(String),
    /// Line collection started
    Collecting(CollectTarget),
    ClearScreen,
    Help,
    Version,
    /// Several responses in order
    Batch(Vec<Response>),
    Quit,
}

/// Text printed by `version`.
pub fn version_text() -> String {
    format!("trust v{} 🦀", env!("CARGO_PKG_VERSION"))
}

/// The editor session.
pub struct Editor {
    registry: BufferRegistry,
    aliases: Aliases,
    theme: Theme,
    color: bool,
    show_line_numbers: bool,
    show_status_line: bool,
    pending: Option<PendingInput>,
    recovery: Option<RecoveryService>,
    save_options: SaveOptions,
    dir_context: DirectoryContext,
    time_source: SharedTimeSource,
    /// Canonical name of the command being run, used to label errors
    last_command: Option<&'static str>,
}

impl Editor {
    pub fn new(config: &Config, dir_context: DirectoryContext, time_source: SharedTimeSource) -> Self {
        Self {
            registry: BufferRegistry::new(config.editor.undo_limit),
            aliases: config.aliases.iter().collect(),
            theme: config.theme(),
            color: config.editor.color,
            show_line_numbers: config.editor.line_numbers,
            show_status_line: config.editor.status_line,
            pending: None,
            recovery: None,
            save_options: SaveOptions {
                backup: config.editor.backup,
            },
            dir_context,
            time_source,
            last_command: None,
        }
    }

    /// Enable crash-recovery snapshots for this session.
    pub fn with_recovery(mut self, recovery: RecoveryService) -> Self {
        self.recovery = Some(recovery);
        self
    }

    pub fn registry(&self) -> &BufferRegistry {
        &self.registry
    }

    pub fn aliases(&self) -> &Aliases {
        &self.aliases
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn painter(&self) -> Painter {
        Painter::new(self.theme, self.color)
    }

    pub fn line_numbers(&self) -> bool {
        self.show_line_numbers
    }

    pub fn pending(&self) -> Option<&PendingInput> {
        self.pending.as_ref()
    }

    pub fn recovery(&self) -> Option<&RecoveryService> {
        self.recovery.as_ref()
    }

    /// Command that produced the most recent error, if the line was a command.
    pub fn last_command(&self) -> Option<&'static str> {
        self.last_command
    }

    pub fn prompt(&self) -> Prompt {
        match self.pending {
            Some(PendingInput::Collect { .. }) => Prompt::collect(),
            Some(PendingInput::ConfirmQuit | PendingInput::ConfirmRecovery { .. }) => {
                Prompt::confirm()
            }
            None => Prompt::command(self.registry.current().is_dirty()),
        }
    }

    pub fn read_mode(&self) -> ReadMode {
        match self.pending {
            Some(_) => ReadMode::Text,
            None => ReadMode::Command,
        }
    }

    /// Command and alias names for completion.
    pub fn completion_names(&self) -> Vec<String> {
        all_names()
            .map(str::to_string)
            .chain(self.aliases.names().map(str::to_string))
            .collect()
    }

    /// Greeting printed once at startup.
    pub fn banner(&self) -> Response {
        let buffer = self.registry.current();
        Response::Message(format!(
            "trust: editing {} ({} lines). type 'help'",
            buffer.name(),
            buffer.line_count()
        ))
    }

    /// Handle one line of input.
    pub fn handle_line(&mut self, line: &str) -> Result<Response> {
        self.last_command = None;
        if let Some(pending) = self.pending.take() {
            return self.handle_pending(pending, line);
        }

        let Some(command) = parse_command(line, &self.aliases)? else {
            return Ok(Response::None);
        };
        self.last_command = command_for(command.verb).map(|c| c.name());
        tracing::debug!("command {:?} {:?}", command.verb, command.args);
        self.dispatch(command)
    }

    /// Abandon whatever interaction is pending (Ctrl-C, SIGINT).
    pub fn interrupt(&mut self) -> Response {
        match self.pending.take() {
            Some(PendingInput::Collect { lines, .. }) => {
                tracing::debug!("Discarding {} collected line(s)", lines.len());
                Response::Text(vec!["(input discarded)".to_string()])
            }
            Some(PendingInput::ConfirmQuit) => Response::Text(vec!["(quit cancelled)".to_string()]),
            Some(PendingInput::ConfirmRecovery { .. }) => {
                Response::Text(vec!["(snapshot kept)".to_string()])
            }
            None => Response::None,
        }
    }

    fn handle_pending(&mut self, pending: PendingInput, line: &str) -> Result<Response> {
        match pending {
            PendingInput::Collect {
                buffer,
                target,
                mut lines,
            } => {
                if line == "." {
                    return self.finish_collect(buffer, target, lines);
                }
                lines.push(line.to_string());
                self.pending = Some(PendingInput::Collect {
                    buffer,
                    target,
                    lines,
                });
                Ok(Response::None)
            }
            PendingInput::ConfirmQuit => Ok(self.answer_quit(is_yes(line))),
            PendingInput::ConfirmRecovery { buffer, entry } => {
                self.answer_recovery(buffer, entry, is_yes(line))
            }
        }
    }

    fn dispatch(&mut self, cmd: ParsedCommand) -> Result<Response> {
        match cmd.verb {
            Verb::Open => self.open_command(&cmd),
            Verb::Info => no_args(&cmd, "info").map(|_| self.info()),
            Verb::Write => self.write_command(&cmd),
            Verb::WriteQuit => self.write_quit(&cmd),
            Verb::Quit => no_args(&cmd, "quit").map(|_| self.quit(cmd.force)),
            Verb::Print => self.print_command(&cmd),
            Verb::ReadLine => self.print_one(&cmd, "r <n>"),
            Verb::Goto => self.print_one(&cmd, "goto <n>"),
            Verb::Append => no_args(&cmd, "append").map(|_| self.begin_collect(CollectTarget::Append)),
            Verb::Insert => self.insert_command(&cmd),
            Verb::Change => self.change_command(&cmd),
            Verb::Delete => self.delete_command(&cmd),
            Verb::Find => self.find_command(&cmd, false),
            Verb::FindIgnoreCase => self.find_command(&cmd, true),
            Verb::Undo => no_args(&cmd, "undo").and_then(|_| self.undo()),
            Verb::Redo => no_args(&cmd, "redo").and_then(|_| self.redo()),
            Verb::Number => no_args(&cmd, "number").map(|_| self.toggle_numbers()),
            Verb::Theme => self.theme_command(&cmd),
            Verb::Alias => self.alias_command(&cmd),
            Verb::New => no_args(&cmd, "new").map(|_| self.new_buffer()),
            Verb::BufferNext => no_args(&cmd, "bnext").map(|_| self.cycle_buffer(true)),
            Verb::BufferPrev => no_args(&cmd, "bprev").map(|_| self.cycle_buffer(false)),
            Verb::ListBuffers => no_args(&cmd, "lsb").map(|_| self.list_buffers()),
            Verb::Recover => self.recover_command(&cmd),
            Verb::Pwd => no_args(&cmd, "pwd").and_then(|_| self.pwd()),
            Verb::Cd => self.cd_command(&cmd),
            Verb::Ls => self.ls_command(&cmd),
            Verb::Clear => no_args(&cmd, "clear").map(|_| Response::ClearScreen),
            Verb::Version => no_args(&cmd, "version").map(|_| Response::Version),
            Verb::Help => no_args(&cmd, "help").map(|_| Response::Help),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Reject arguments to a command that takes none.
fn no_args(cmd: &ParsedCommand, usage: &str) -> Result<()> {
    if cmd.args.is_empty() {
        Ok(())
    } else {
        Err(EditorError::usage(usage))
    }
}

/// The single argument of a command that takes exactly one.
fn one_arg<'a>(cmd: &'a ParsedCommand, usage: &str) -> Result<&'a str> {
    match cmd.args.as_slice() {
        [arg] => Ok(arg),
        _ => Err(EditorError::usage(usage)),
    }
}
