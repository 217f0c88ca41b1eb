//! Printing, line collection, deletion and search.

use super::{one_arg, CollectTarget, Editor, PendingInput, PrintedLine, Response};
use crate::error::{EditorError, Result};
use crate::input::parser::{parse_line_number, parse_range, ParsedCommand};
use crate::model::buffer::BufferId;
use crate::model::line_store::LineRange;

/// Columns needed to print `n`.
fn digits(n: usize) -> usize {
    n.max(1).to_string().len()
}

impl Editor {
    pub(super) fn print_command(&self, cmd: &ParsedCommand) -> Result<Response> {
        let buffer = self.registry.current();
        let range = match cmd.args.as_slice() {
            [] => match buffer.store().full_range() {
                Some(range) => range,
                None => return Ok(Response::Text(vec!["(empty)".to_string()])),
            },
            [range] => parse_range(range)?,
            _ => return Err(EditorError::usage("p|print [range]")),
        };
        self.print_range(range)
    }

    /// `r <n>` and `goto <n>`: print one line.
    pub(super) fn print_one(&self, cmd: &ParsedCommand, usage: &str) -> Result<Response> {
        let line = parse_line_number(one_arg(cmd, usage)?)?;
        self.print_range(LineRange::single(line)?)
    }

    fn print_range(&self, range: LineRange) -> Result<Response> {
        let buffer = self.registry.current();
        let lines = buffer
            .store()
            .read(range)?
            .iter()
            .zip(range.start()..)
            .map(|(text, number)| PrintedLine {
                number,
                text: text.clone(),
            })
            .collect();
        let gutter = self
            .show_line_numbers
            .then(|| digits(buffer.line_count()));
        Ok(Response::Lines { lines, gutter })
    }

    pub(super) fn begin_collect(&mut self, target: CollectTarget) -> Response {
        self.pending = Some(PendingInput::Collect {
            buffer: self.registry.current().id(),
            target,
            lines: Vec::new(),
        });
        Response::Collecting(target)
    }

    pub(super) fn insert_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let before = parse_line_number(one_arg(cmd, "i|insert <n>")?)?;
        self.registry.current().store().check_insert(before)?;
        Ok(self.begin_collect(CollectTarget::Insert(before)))
    }

    pub(super) fn change_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let range = parse_range(one_arg(cmd, "c|change <range>")?)?;
        self.registry.current().store().check(range)?;
        Ok(self.begin_collect(CollectTarget::Change(range)))
    }

    /// Apply collected lines as a single journal entry.
    pub(super) fn finish_collect(
        &mut self,
        id: BufferId,
        target: CollectTarget,
        lines: Vec<String>,
    ) -> Result<Response> {
        let buffer = self
            .registry
            .get_mut(id)
            .ok_or_else(|| EditorError::usage("buffer is gone"))?;
        let count = lines.len();

        if count == 0 && !matches!(target, CollectTarget::Change(_)) {
            return Ok(Response::Text(vec!["(no lines entered)".to_string()]));
        }

        let message = match target {
            CollectTarget::Append => {
                buffer.append_lines(lines)?;
                format!("appended {count} line(s)")
            }
            CollectTarget::Insert(before) => {
                buffer.insert_lines(before, lines)?;
                format!("inserted {count} line(s) before {before}")
            }
            CollectTarget::Change(range) => {
                buffer.replace_lines(range, lines)?;
                format!("changed {range} to {count} line(s)")
            }
        };
        Ok(Response::Message(message))
    }

    pub(super) fn delete_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let range = parse_range(one_arg(cmd, "d|delete <range>")?)?;
        let removed = self.registry.current_mut().delete_lines(range)?;
        Ok(Response::Message(format!(
            "deleted {} line(s)",
            removed.len()
        )))
    }

    pub(super) fn find_command(&self, cmd: &ParsedCommand, ignore_case: bool) -> Result<Response> {
        if cmd.text.is_empty() {
            let usage = if ignore_case { "findi <text>" } else { "find <text>" };
            return Err(EditorError::usage(usage));
        }
        let hits: Vec<PrintedLine> = self
            .registry
            .current()
            .find(&cmd.text, ignore_case)
            .into_iter()
            .map(|(number, text)| PrintedLine {
                number,
                text: text.to_string(),
            })
            .collect();
        if hits.is_empty() {
            Ok(Response::Text(vec!["no matches".to_string()]))
        } else {
            Ok(Response::Matches(hits))
        }
    }
}
