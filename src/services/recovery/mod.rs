//! File Recovery Service
//!
//! Dirty buffers are periodically copied into snapshot files so that unsaved
//! work survives a crash or a killed terminal.
//!
//! ## How it works
//!
//! 1. **Auto-Save**: the main loop calls [`RecoveryService::tick`] between
//!    reads; once the interval has elapsed every dirty buffer whose revision
//!    changed since its last snapshot is written out.
//! 2. **Discard**: a successful save removes that buffer's snapshot.
//! 3. **Discovery**: opening a path looks for a snapshot under the path's
//!    identity and offers it to the user. Nothing is restored automatically.
//! 4. **Clean exit**: [`RecoveryService::end_session`] removes every snapshot
//!    this session wrote.
//!
//! ## File Layout
//!
//! ```text
//! ~/
//! ├── .trust-recover-3f2a9c0d1e4b5a67   # one file per buffer
//! └── ...
//! ```

mod storage;
pub mod types;

pub use storage::RecoveryStorage;
pub use types::{identity_hash, RecoveryEntry, DEFAULT_AUTO_SAVE_INTERVAL_SECS, SNAPSHOT_PREFIX};

use std::collections::{HashMap, HashSet};
use std::io;
use std::time::{Duration, Instant};

use crate::model::buffer::Buffer;
use crate::model::registry::BufferRegistry;

/// The main recovery service
#[derive(Debug)]
pub struct RecoveryService {
    storage: RecoveryStorage,
    interval: Duration,
    last_tick: Instant,
    /// Revision of each buffer at its last snapshot, keyed by identity
    snapshot_revisions: HashMap<String, u64>,
    /// Identities this session has written snapshots for
    written: HashSet<String>,
}

impl RecoveryService {
    pub fn new(storage: RecoveryStorage, interval: Duration, started: Instant) -> Self {
        Self {
            storage,
            interval,
            last_tick: started,
            snapshot_revisions: HashMap::new(),
            written: HashSet::new(),
        }
    }

    pub fn storage(&self) -> &RecoveryStorage {
        &self.storage
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot dirty buffers if the interval has elapsed since the last
    /// tick. Returns how many snapshots were written.
    pub fn tick(&mut self, now: Instant, registry: &BufferRegistry) -> usize {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return 0;
        }
        self.last_tick = now;
        self.snapshot_dirty(registry)
    }

    /// Snapshot every dirty buffer whose content changed since its last
    /// snapshot. Failures are logged and skipped.
    ///
    /// A buffer that is clean again (undone back to its saved state) loses
    /// the snapshot this session wrote for it.
    pub fn snapshot_dirty(&mut self, registry: &BufferRegistry) -> usize {
        let mut written = 0;
        for buffer in registry.iter() {
            let id = buffer.recovery_id();
            if !buffer.is_dirty() {
                if self.written.contains(id) {
                    tracing::debug!("{} is clean again, dropping its snapshot", buffer.name());
                    self.discard(buffer);
                }
                continue;
            }
            if self.snapshot_revisions.get(id) == Some(&buffer.revision()) {
                continue;
            }
            match self.storage.write_snapshot(id, buffer.lines()) {
                Ok(path) => {
                    tracing::debug!("Wrote recovery snapshot for {} to {:?}", buffer.name(), path);
                    self.snapshot_revisions.insert(id.to_string(), buffer.revision());
                    self.written.insert(id.to_string());
                    written += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to write recovery snapshot for {}: {}", buffer.name(), e);
                }
            }
        }
        written
    }

    /// Drop the snapshot of a buffer that was just saved.
    pub fn discard(&mut self, buffer: &Buffer) {
        let id = buffer.recovery_id();
        self.snapshot_revisions.remove(id);
        self.written.remove(id);
        if let Err(e) = self.storage.remove(id) {
            tracing::warn!("Failed to remove recovery snapshot for {}: {}", buffer.name(), e);
        }
    }

    /// Forget a buffer's previous identity after it was renamed by a save.
    pub fn discard_identity(&mut self, identity: &str) {
        self.snapshot_revisions.remove(identity);
        if self.written.remove(identity) {
            if let Err(e) = self.storage.remove(identity) {
                tracing::warn!("Failed to remove recovery snapshot {}: {}", identity, e);
            }
        }
    }

    /// A snapshot left behind for `identity` by an earlier session.
    pub fn find(&self, identity: &str) -> Option<RecoveryEntry> {
        if self.written.contains(identity) {
            return None;
        }
        match self.storage.entry_for(identity) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Failed to inspect recovery snapshot for {}: {}", identity, e);
                None
            }
        }
    }

    pub fn list_entries(&self) -> io::Result<Vec<RecoveryEntry>> {
        self.storage.list_entries()
    }

    pub fn load(&self, entry: &RecoveryEntry) -> io::Result<Vec<String>> {
        self.storage.read_snapshot(&entry.path)
    }

    pub fn remove_entry(&mut self, entry: &RecoveryEntry) -> io::Result<()> {
        self.storage.remove_path(&entry.path)
    }

    /// Remove every snapshot written by this session (clean shutdown).
    pub fn end_session(&mut self) -> usize {
        let mut cleaned = 0;
        for id in self.written.drain() {
            match self.storage.remove(&id) {
                Ok(()) => cleaned += 1,
                Err(e) => tracing::warn!("Failed to remove recovery snapshot {}: {}", id, e),
            }
        }
        self.snapshot_revisions.clear();
        tracing::info!("Recovery session ended, cleaned up {} snapshot(s)", cleaned);
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::journal::MAX_UNDO_DEPTH;
    use tempfile::TempDir;

    fn create_test_service() -> (RecoveryService, Instant, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let start = Instant::now();
        let service = RecoveryService::new(
            RecoveryStorage::with_dir(temp_dir.path().to_path_buf()),
            Duration::from_secs(DEFAULT_AUTO_SAVE_INTERVAL_SECS),
            start,
        );
        (service, start, temp_dir)
    }

    fn dirty_registry() -> BufferRegistry {
        let mut registry = BufferRegistry::new(MAX_UNDO_DEPTH);
        registry
            .current_mut()
            .append_lines(vec!["unsaved".to_string()])
            .unwrap();
        registry
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let (mut service, start, _temp) = create_test_service();
        let registry = dirty_registry();

        assert_eq!(service.tick(start + Duration::from_secs(10), &registry), 0);
        assert_eq!(service.tick(start + Duration::from_secs(120), &registry), 1);
        assert_eq!(service.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn test_unchanged_buffer_is_not_rewritten() {
        let (mut service, start, _temp) = create_test_service();
        let mut registry = dirty_registry();

        assert_eq!(service.tick(start + Duration::from_secs(120), &registry), 1);
        assert_eq!(service.tick(start + Duration::from_secs(240), &registry), 0);

        registry.current_mut().append_lines(vec!["more".into()]).unwrap();
        assert_eq!(service.tick(start + Duration::from_secs(360), &registry), 1);
    }

    #[test]
    fn test_clean_buffers_are_skipped() {
        let (mut service, _start, _temp) = create_test_service();
        let registry = BufferRegistry::new(MAX_UNDO_DEPTH);
        assert_eq!(service.snapshot_dirty(&registry), 0);
    }

    #[test]
    fn test_snapshot_dropped_when_buffer_is_clean_again() {
        let (mut service, start, _temp) = create_test_service();
        let mut registry = dirty_registry();
        assert_eq!(service.tick(start + Duration::from_secs(120), &registry), 1);
        assert_eq!(service.list_entries().unwrap().len(), 1);

        registry.current_mut().undo().unwrap();
        assert!(!registry.current().is_dirty());
        assert_eq!(service.tick(start + Duration::from_secs(240), &registry), 0);
        assert!(service.list_entries().unwrap().is_empty());

        // Dirty again: the next tick writes a fresh snapshot
        registry.current_mut().append_lines(vec!["again".into()]).unwrap();
        assert_eq!(service.tick(start + Duration::from_secs(360), &registry), 1);
    }

    #[test]
    fn test_discard_removes_snapshot() {
        let (mut service, _start, _temp) = create_test_service();
        let registry = dirty_registry();
        service.snapshot_dirty(&registry);
        service.discard(registry.current());
        assert!(service.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_end_session_removes_only_own_snapshots() {
        let (mut service, _start, _temp) = create_test_service();
        service
            .storage()
            .write_snapshot("/left/behind.txt", &["old".to_string()])
            .unwrap();
        service.snapshot_dirty(&dirty_registry());
        assert_eq!(service.list_entries().unwrap().len(), 2);

        assert_eq!(service.end_session(), 1);
        let remaining = service.list_entries().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(service.find("/left/behind.txt").is_some());
    }

    #[test]
    fn test_find_ignores_own_snapshots() {
        let (mut service, _start, _temp) = create_test_service();
        let registry = dirty_registry();
        service.snapshot_dirty(&registry);
        assert!(service.find(registry.current().recovery_id()).is_none());
    }
}
