//! Error and warning types shared by the editing core.
//!
//! Every command-level failure is an [`EditorError`]. The interpreter never
//! lets one escape past the prompt loop: it is rendered as a single line and
//! the session carries on. [`Warning`] covers outcomes that block an action
//! without being a failure (for example quitting with unsaved work).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the model and command layers.
pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    /// Invalid line number or range.
    #[error("bad address: {0}")]
    Address(String),

    /// The verb did not match any command or alias.
    #[error("unknown command: {0} (type 'help')")]
    UnknownCommand(String),

    #[error("unknown theme: {0} (try: default, dark, neon, matrix, paper)")]
    UnknownTheme(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    /// `write` on a buffer that has never been associated with a file.
    #[error("no filename (use: write <path>)")]
    NoFileName,

    /// Missing or malformed command arguments.
    #[error("usage: {0}")]
    Usage(String),
}

impl EditorError {
    pub fn address(msg: impl Into<String>) -> Self {
        Self::Address(msg.into())
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Non-fatal conditions that stop a command from taking effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Quit requested while these buffers hold unsaved edits.
    DirtyQuit { buffers: Vec<String> },
    /// `bnext`/`bprev` with a single buffer open.
    OnlyOneBuffer,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DirtyQuit { buffers } => write!(
                f,
                "unsaved changes in {}. quit anyway?",
                buffers.join(", ")
            ),
            Warning::OnlyOneBuffer => write!(f, "(only one buffer)"),
        }
    }
}
