//! Recovery and auto-save operations for the Editor.
//!
//! - Periodic snapshots of dirty buffers from the main loop
//! - Offering a snapshot when its file is opened
//! - Listing and loading snapshots by hand (`recover`)
//! - Cleaning up this session's snapshots on exit

use super::{one_arg, Editor, PendingInput, Response};
use crate::error::{EditorError, Result};
use crate::input::parser::{parse_line_number, ParsedCommand};
use crate::model::buffer::BufferId;
use crate::services::recovery::RecoveryEntry;
use crate::services::time_source::{format_age, TimeSource};

impl Editor {
    /// Called by the main loop between reads.
    pub fn tick(&mut self) -> usize {
        let now = self.time_source.now();
        match self.recovery.as_mut() {
            Some(recovery) => recovery.tick(now, &self.registry),
            None => 0,
        }
    }

    /// Clean shutdown: remove the snapshots this session wrote.
    pub fn shutdown(&mut self) {
        if let Some(recovery) = self.recovery.as_mut() {
            recovery.end_session();
        }
    }

    /// If an earlier session left a snapshot for the current buffer, ask
    /// whether to restore it.
    pub(super) fn offer_recovery(&mut self) -> Option<Response> {
        let recovery = self.recovery.as_ref()?;
        let buffer = self.registry.current();
        let entry = recovery.find(buffer.recovery_id())?;
        let age = format_age(entry.age(self.time_source.system_now()));
        tracing::info!("Found recovery snapshot {:?} for {}", entry.path, buffer.name());

        let question = format!(
            "recovery snapshot found for {} ({} lines, {} old). restore?",
            buffer.name(),
            entry.line_count,
            age
        );
        self.pending = Some(PendingInput::ConfirmRecovery {
            buffer: buffer.id(),
            entry,
        });
        Some(Response::Question(question))
    }

    /// Restore the snapshot into `id` as one undoable edit, or throw it away.
    pub(super) fn answer_recovery(
        &mut self,
        id: BufferId,
        entry: RecoveryEntry,
        restore: bool,
    ) -> Result<Response> {
        let Some(recovery) = self.recovery.as_mut() else {
            return Ok(Response::None);
        };

        if !restore {
            recovery
                .remove_entry(&entry)
                .map_err(|e| EditorError::io(&entry.path, e))?;
            return Ok(Response::Text(vec!["(snapshot discarded)".to_string()]));
        }

        let lines = recovery
            .load(&entry)
            .map_err(|e| EditorError::io(&entry.path, e))?;
        let count = lines.len();
        let buffer = self
            .registry
            .get_mut(id)
            .ok_or_else(|| EditorError::usage("buffer is gone"))?;
        buffer.replace_all(lines)?;
        if let Err(e) = recovery.remove_entry(&entry) {
            tracing::warn!("Failed to remove restored snapshot {:?}: {}", entry.path, e);
        }
        Ok(Response::Message(format!(
            "restored {count} line(s) from snapshot"
        )))
    }

    /// `recover` lists snapshots, `recover <n>` loads one into a new buffer.
    pub(super) fn recover_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let Some(recovery) = self.recovery.as_mut() else {
            return Ok(Response::Text(vec!["(recovery is disabled)".to_string()]));
        };
        let base = recovery.storage().base_dir().to_path_buf();
        let entries = recovery
            .list_entries()
            .map_err(|e| EditorError::io(&base, e))?;

        if cmd.args.is_empty() {
            if entries.is_empty() {
                return Ok(Response::Text(vec!["no recovery snapshots".to_string()]));
            }
            let now = self.time_source.system_now();
            let rows = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    format!(
                        "{:>3}  {}  {} lines  {} ago",
                        i + 1,
                        entry.path.display(),
                        entry.line_count,
                        format_age(entry.age(now))
                    )
                })
                .collect();
            return Ok(Response::Text(rows));
        }

        let n = parse_line_number(one_arg(cmd, "recover [n]")?)
            .map_err(|_| EditorError::usage("recover [n]"))?;
        let entry = entries.get(n - 1).ok_or_else(|| {
            EditorError::usage(format!("recover: only {} snapshot(s)", entries.len()))
        })?;
        let lines = recovery
            .load(entry)
            .map_err(|e| EditorError::io(&entry.path, e))?;
        let count = lines.len();
        if let Err(e) = recovery.remove_entry(entry) {
            tracing::warn!("Failed to remove recovered snapshot {:?}: {}", entry.path, e);
        }
        self.registry.create_with_lines(lines)?;
        Ok(Response::Message(format!(
            "recovered {} line(s) into buffer {}",
            count,
            self.registry.current_index()
        )))
    }
}
