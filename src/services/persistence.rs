//! Loading and saving buffer contents.
//!
//! Saves are atomic: lines are written into a temporary file next to the
//! target, flushed to disk and then renamed over it. The rename is the commit
//! point, so a failure anywhere earlier leaves the original file as it was.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{EditorError, Result};

/// Options for [`save_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Copy an existing target to `<path>~` before replacing it.
    pub backup: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { backup: true }
    }
}

/// Read `path` as a list of lines. Both `\n` and `\r\n` terminate a line; a
/// missing final terminator is accepted.
pub fn load_lines(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(split_lines(&text))
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}

/// The backup location for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("~");
    PathBuf::from(name)
}

/// Write `lines` to `path`, each followed by `\n`.
pub fn save_lines(path: &Path, lines: &[String], options: &SaveOptions) -> Result<()> {
    let existing = fs::metadata(path).ok().filter(|m| m.is_file());

    if options.backup && existing.is_some() {
        fs::copy(path, backup_path(path)).map_err(|e| EditorError::io(backup_path(path), e))?;
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let temp = NamedTempFile::new_in(&dir).map_err(|e| EditorError::io(path, e))?;

    write_all_lines(temp.as_file(), lines).map_err(|e| EditorError::io(path, e))?;

    if let Some(meta) = &existing {
        fs::set_permissions(temp.path(), meta.permissions()).map_err(|e| EditorError::io(path, e))?;
    }
    temp.as_file().sync_all().map_err(|e| EditorError::io(path, e))?;

    temp.persist(path)
        .map_err(|e| EditorError::io(path, e.error))?;

    tracing::debug!("saved {} line(s) to {:?}", lines.len(), path);
    Ok(())
}

fn write_all_lines(file: &fs::File, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        let lines = owned(&["first", "", "ünïcode", "last"]);

        save_lines(&path, &lines, &SaveOptions::default()).unwrap();
        assert_eq!(load_lines(&path).unwrap(), lines);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "first\n\nünïcode\nlast\n"
        );
    }

    #[test]
    fn test_load_handles_crlf_and_missing_final_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.txt");
        fs::write(&path, "a\r\nb\r\nc").unwrap();
        assert_eq!(load_lines(&path).unwrap(), owned(&["a", "b", "c"]));
    }

    #[test]
    fn test_backup_keeps_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old\n").unwrap();

        save_lines(&path, &owned(&["new"]), &SaveOptions { backup: true }).unwrap();
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "old\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_no_backup_when_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old\n").unwrap();

        save_lines(&path, &owned(&["new"]), &SaveOptions { backup: false }).unwrap();
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/file.txt");
        let err = save_lines(&path, &owned(&["x"]), &SaveOptions::default()).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, "echo hi\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o754)).unwrap();

        save_lines(&path, &owned(&["echo bye"]), &SaveOptions::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o754);
    }
}
