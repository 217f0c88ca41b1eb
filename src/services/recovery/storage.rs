//! Recovery file storage operations
//!
//! Snapshots are written with temp-file-then-rename so a crash mid-write never
//! leaves a truncated snapshot behind.

use super::types::{snapshot_file_name, RecoveryEntry, SNAPSHOT_PREFIX};
use crate::services::persistence;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Recovery storage manager
#[derive(Debug, Clone)]
pub struct RecoveryStorage {
    recovery_dir: PathBuf,
}

impl RecoveryStorage {
    pub fn with_dir(recovery_dir: PathBuf) -> Self {
        Self { recovery_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.recovery_dir
    }

    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.recovery_dir)
    }

    /// Verify that snapshots can be created in the directory.
    pub fn check_writable(&self) -> io::Result<()> {
        self.ensure_dir()?;
        let probe = NamedTempFile::with_prefix_in(SNAPSHOT_PREFIX, &self.recovery_dir)?;
        drop(probe);
        Ok(())
    }

    pub fn snapshot_path(&self, identity: &str) -> PathBuf {
        self.recovery_dir.join(snapshot_file_name(identity))
    }

    /// Atomically write `lines` as the snapshot for `identity`.
    pub fn write_snapshot(&self, identity: &str, lines: &[String]) -> io::Result<PathBuf> {
        self.ensure_dir()?;
        let target = self.snapshot_path(identity);

        let temp = NamedTempFile::with_prefix_in(SNAPSHOT_PREFIX, &self.recovery_dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            for line in lines {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }

    pub fn read_snapshot(&self, path: &Path) -> io::Result<Vec<String>> {
        persistence::load_lines(path)
    }

    /// The snapshot stored for `identity`, if one exists.
    pub fn entry_for(&self, identity: &str) -> io::Result<Option<RecoveryEntry>> {
        let path = self.snapshot_path(identity);
        if !path.is_file() {
            return Ok(None);
        }
        self.entry_from_path(path).map(Some)
    }

    fn entry_from_path(&self, path: PathBuf) -> io::Result<RecoveryEntry> {
        let modified = fs::metadata(&path)?.modified()?;
        let line_count = self.read_snapshot(&path)?.len();
        let hash = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(SNAPSHOT_PREFIX))
            .unwrap_or_default()
            .to_string();
        Ok(RecoveryEntry {
            path,
            hash,
            modified,
            line_count,
        })
    }

    /// Every snapshot in the directory, newest first.
    pub fn list_entries(&self) -> io::Result<Vec<RecoveryEntry>> {
        let mut entries = Vec::new();
        if !self.recovery_dir.exists() {
            return Ok(entries);
        }

        for dir_entry in fs::read_dir(&self.recovery_dir)? {
            let dir_entry = dir_entry?;
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_snapshot_name(name) || !dir_entry.file_type()?.is_file() {
                continue;
            }
            match self.entry_from_path(dir_entry.path()) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::debug!("Skipping unreadable snapshot {}: {}", name, e),
            }
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.hash.cmp(&b.hash)));
        Ok(entries)
    }

    /// Remove the snapshot for `identity`. A missing file is not an error.
    pub fn remove(&self, identity: &str) -> io::Result<()> {
        self.remove_path(&self.snapshot_path(identity))
    }

    pub fn remove_path(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// `.trust-recover-` followed by exactly 16 hex digits. Leftover temp files
/// share the prefix but not the shape.
fn is_snapshot_name(name: &str) -> bool {
    name.strip_prefix(SNAPSHOT_PREFIX)
        .is_some_and(|hash| hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (RecoveryStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = RecoveryStorage::with_dir(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_write_and_read_snapshot() {
        let (storage, _temp) = create_test_storage();
        let path = storage
            .write_snapshot("/work/a.txt", &owned(&["one", "two"]))
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert_eq!(storage.read_snapshot(&path).unwrap(), owned(&["one", "two"]));

        let entry = storage.entry_for("/work/a.txt").unwrap().unwrap();
        assert_eq!(entry.line_count, 2);
        assert_eq!(entry.path, path);
    }

    #[test]
    fn test_entry_for_missing_identity() {
        let (storage, _temp) = create_test_storage();
        assert!(storage.entry_for("/nowhere").unwrap().is_none());
    }

    #[test]
    fn test_list_ignores_unrelated_files() {
        let (storage, temp) = create_test_storage();
        storage.write_snapshot("a", &owned(&["x"])).unwrap();
        storage.write_snapshot("b", &owned(&["y", "z"])).unwrap();
        fs::write(temp.path().join("notes.txt"), "hi").unwrap();
        fs::write(temp.path().join(".trust-recover-tmp123"), "partial").unwrap();

        let entries = storage.list_entries().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (storage, _temp) = create_test_storage();
        storage.write_snapshot("a", &owned(&["x"])).unwrap();
        storage.remove("a").unwrap();
        storage.remove("a").unwrap();
        assert!(storage.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_check_writable_creates_directory() {
        let (_, temp) = create_test_storage();
        let storage = RecoveryStorage::with_dir(temp.path().join("nested"));
        storage.check_writable().unwrap();
        assert!(temp.path().join("nested").is_dir());
    }

    #[test]
    fn test_snapshot_name_shape() {
        assert!(is_snapshot_name(".trust-recover-0123456789abcdef"));
        assert!(!is_snapshot_name(".trust-recover-0123"));
        assert!(!is_snapshot_name("trust-recover-0123456789abcdef"));
    }
}
