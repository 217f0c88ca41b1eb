//! Turning responses and errors into terminal output.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use super::theme::{Painter, Theme};
use crate::app::{version_text, CollectTarget, PrintedLine, Response};
use crate::error::{EditorError, Warning};
use crate::input::commands::COMMANDS;

/// Writes responses with the active theme.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    painter: Painter,
    /// Output is a terminal, so cursor control sequences are allowed
    terminal: bool,
}

impl Renderer {
    pub fn new(painter: Painter, terminal: bool) -> Self {
        Self { painter, terminal }
    }

    pub fn set_painter(&mut self, painter: Painter) {
        self.painter = painter;
    }

    pub fn response(&self, out: &mut impl Write, response: &Response) -> io::Result<()> {
        let p = &self.painter;
        match response {
            Response::None | Response::Quit => {}
            Response::Message(text) => writeln!(out, "{}", p.paint(|s| s.ok, text))?,
            Response::Lines { lines, gutter } => {
                for line in lines {
                    match *gutter {
                        Some(width) => {
                            let number = format!("{:>width$} | ", line.number);
                            writeln!(out, "{}{}", p.paint(|s| s.gutter, &number), line.text)?;
                        }
                        None => writeln!(out, "{}", line.text)?,
                    }
                }
            }
            Response::Matches(hits) => self.matches(out, hits)?,
            Response::Text(rows) => {
                for row in rows {
                    writeln!(out, "{row}")?;
                }
            }
            Response::Warning(warning) => self.warning(out, warning)?,
            Response::Question(text) => writeln!(out, "{}", p.paint(|s| s.warn, text))?,
            Response::Collecting(target) => {
                let hint = match target {
                    CollectTarget::Append => "enter text; '.' on a line ends".to_string(),
                    CollectTarget::Insert(n) => {
                        format!("enter text to insert before line {n}; '.' on a line ends")
                    }
                    CollectTarget::Change(range) => {
                        format!("enter replacement for {range}; '.' on a line ends")
                    }
                };
                writeln!(out, "{}", p.paint(|s| s.dim, &hint))?;
            }
            Response::ClearScreen => {
                if self.terminal {
                    out.queue(Clear(ClearType::Purge))?
                        .queue(Clear(ClearType::All))?
                        .queue(MoveTo(0, 0))?;
                }
            }
            Response::Help => self.help(out)?,
            Response::Version => writeln!(out, "{}", p.paint(|s| s.title, &version_text()))?,
            Response::Batch(responses) => {
                for response in responses {
                    self.response(out, response)?;
                }
            }
        }
        out.flush()
    }

    /// One line, prefixed with the command that failed.
    pub fn error(
        &self,
        out: &mut impl Write,
        command: Option<&str>,
        error: &EditorError,
    ) -> io::Result<()> {
        let text = match command {
            Some(name) => format!("{name}: {error}"),
            None => error.to_string(),
        };
        writeln!(out, "{}", self.painter.paint(|s| s.err, &text))?;
        out.flush()
    }

    pub fn status(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        writeln!(out, "{}", self.painter.paint(|s| s.dim, text))?;
        out.flush()
    }

    pub fn goodbye(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.painter.paint(|s| s.dim, "bye!"))?;
        out.flush()
    }

    fn matches(&self, out: &mut impl Write, hits: &[PrintedLine]) -> io::Result<()> {
        for hit in hits {
            let label = format!("match at {}:", hit.number);
            writeln!(out, "{} {}", self.painter.paint(|s| s.accent, &label), hit.text)?;
        }
        Ok(())
    }

    fn warning(&self, out: &mut impl Write, warning: &Warning) -> io::Result<()> {
        let text = warning.to_string();
        match warning {
            Warning::DirtyQuit { .. } => writeln!(out, "{}", self.painter.paint(|s| s.warn, &text)),
            Warning::OnlyOneBuffer => writeln!(out, "{}", self.painter.paint(|s| s.dim, &text)),
        }
    }

    fn help(&self, out: &mut impl Write) -> io::Result<()> {
        let p = &self.painter;
        writeln!(out, "{}", p.paint(|s| s.title, "Commands (trust)"))?;
        for command in COMMANDS {
            let synopsis = format!("{:<26}", command.synopsis);
            writeln!(
                out,
                "  {}  {}",
                p.paint(|s| s.help_cmd, &synopsis),
                p.paint(|s| s.help_text, command.description)
            )?;
        }
        let themes: Vec<&str> = Theme::ALL.iter().map(|t| t.name()).collect();
        writeln!(
            out,
            "{} {}",
            p.paint(|s| s.accent, "themes:"),
            p.paint(|s| s.help_text, &themes.join(", "))
        )
    }
}
