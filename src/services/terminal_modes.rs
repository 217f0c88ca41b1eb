//! Terminal mode management
//!
//! Raw mode is only held while a line is being read: the guard returned by
//! [`RawModeGuard::enable`] switches the terminal into raw mode with bracketed
//! paste, and dropping it restores cooked mode on every exit path. Command
//! output is printed with the terminal in its normal state.

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{disable_raw_mode, enable_raw_mode},
    ExecutableCommand,
};
use std::io::{stdout, Write};

/// Tracks which terminal modes have been enabled and restores them on drop.
#[derive(Debug, Default)]
pub struct RawModeGuard {
    raw_mode: bool,
    bracketed_paste: bool,
}

impl RawModeGuard {
    /// Enter raw mode. Bracketed paste is optional and its failure is only
    /// logged. On error nothing stays enabled.
    pub fn enable() -> Result<Self> {
        let mut guard = Self::default();

        if let Err(e) = enable_raw_mode() {
            tracing::error!("Failed to enable raw mode: {}", e);
            return Err(e.into());
        }
        guard.raw_mode = true;
        tracing::trace!("Enabled raw mode");

        if let Err(e) = stdout().execute(EnableBracketedPaste) {
            tracing::warn!("Failed to enable bracketed paste: {}", e);
        } else {
            guard.bracketed_paste = true;
        }

        Ok(guard)
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn undo(&mut self) {
        if self.bracketed_paste {
            let _ = stdout().execute(DisableBracketedPaste);
            self.bracketed_paste = false;
        }

        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
            tracing::trace!("Disabled raw mode");
        }

        let _ = stdout().flush();
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Check once at startup that the terminal accepts raw mode at all.
pub fn probe_raw_mode() -> Result<()> {
    let mut guard = RawModeGuard::enable()?;
    guard.undo();
    Ok(())
}

/// Unconditionally restore terminal state without tracking.
///
/// Used from the panic hook and signal handlers, where no guard is reachable.
pub fn emergency_cleanup() {
    let _ = stdout().execute(DisableBracketedPaste);
    let _ = disable_raw_mode();
    let _ = stdout().flush();
}
