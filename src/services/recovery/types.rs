//! Recovery data types
//!
//! A snapshot is a plain text file holding one buffer line per file line, with
//! no header. Its name is derived from the buffer's recovery identity (the
//! absolute path, or a per-session id for unnamed buffers).

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// File name prefix shared by every snapshot.
pub const SNAPSHOT_PREFIX: &str = ".trust-recover-";

/// Default seconds between autosave ticks.
pub const DEFAULT_AUTO_SAVE_INTERVAL_SECS: u64 = 120;

/// A snapshot found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryEntry {
    pub path: PathBuf,
    /// The hash part of the file name
    pub hash: String,
    pub modified: SystemTime,
    pub line_count: usize,
}

impl RecoveryEntry {
    /// Age of the snapshot relative to `now`. Zero if the clock went backwards.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or_default()
    }
}

/// First 16 hex digits of SHA-256 over a recovery identity.
pub fn identity_hash(identity: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

/// Snapshot file name for a recovery identity.
pub fn snapshot_file_name(identity: &str) -> String {
    format!("{SNAPSHOT_PREFIX}{}", identity_hash(identity))
}
