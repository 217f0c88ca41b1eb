//! Working-directory commands: `pwd`, `cd`, `ls`.

use std::fs::{self, Metadata};
use std::path::Path;

use super::{Editor, Response};
use crate::error::{EditorError, Result};
use crate::input::parser::ParsedCommand;

/// Flags accepted by `ls`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LsFlags {
    all: bool,
    long: bool,
}

impl Editor {
    pub(super) fn pwd(&self) -> Result<Response> {
        let cwd = std::env::current_dir().map_err(|e| EditorError::io(".", e))?;
        Ok(Response::Text(vec![cwd.display().to_string()]))
    }

    /// `cd [dir]`; no argument goes home.
    pub(super) fn cd_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        let target = match cmd.args.as_slice() {
            [] => self
                .dir_context
                .home_dir
                .clone()
                .ok_or_else(|| EditorError::usage("cd <dir> (no home directory)"))?,
            [dir] => self.expand(dir),
            _ => return Err(EditorError::usage("cd [dir]")),
        };
        std::env::set_current_dir(&target).map_err(|e| EditorError::io(&target, e))?;
        let cwd = std::env::current_dir().unwrap_or(target);
        tracing::debug!("cd {}", cwd.display());
        Ok(Response::Message(format!("cd: {}", cwd.display())))
    }

    pub(super) fn ls_command(&self, cmd: &ParsedCommand) -> Result<Response> {
        let mut flags = LsFlags::default();
        let mut target = None;
        for arg in &cmd.args {
            match arg.as_str() {
                "-a" => flags.all = true,
                "-l" => flags.long = true,
                "-la" | "-al" => {
                    flags.all = true;
                    flags.long = true;
                }
                _ if target.is_none() => target = Some(arg.as_str()),
                _ => return Err(EditorError::usage("ls [-l] [-a] [path]")),
            }
        }

        let path = self.expand(target.unwrap_or("."));
        let meta = fs::metadata(&path).map_err(|e| EditorError::io(&path, e))?;
        if !meta.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            return Ok(Response::Text(vec![format_entry(&name, Some(&meta), flags)]));
        }
        Ok(Response::Text(list_dir(&path, flags)?))
    }
}

fn list_dir(path: &Path, flags: LsFlags) -> Result<Vec<String>> {
    let mut entries: Vec<_> = fs::read_dir(path)
        .map_err(|e| EditorError::io(path, e))?
        .flatten()
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let rows = entries
        .into_iter()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !flags.all && name.starts_with('.') {
                return None;
            }
            // Follows symlinks so a link to a directory lists like one
            let meta = fs::metadata(entry.path()).ok();
            let shown = if meta.as_ref().is_some_and(Metadata::is_dir) {
                format!("{name}/")
            } else {
                name
            };
            Some(format_entry(&shown, meta.as_ref(), flags))
        })
        .collect();
    Ok(rows)
}

fn format_entry(name: &str, meta: Option<&Metadata>, flags: LsFlags) -> String {
    if !flags.long {
        return name.to_string();
    }
    match meta {
        Some(meta) => format!("{:10} {:8}  {}", perm_string(meta), meta.len(), name),
        None => format!("{:10} {:>8}  {}", "??????????", "?", name),
    }
}

/// `drwxr-xr-x` style rendering of a file mode.
#[cfg(unix)]
fn perm_string(meta: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(if meta.is_dir() { 'd' } else { '-' });
    for (i, ch) in "rwxrwxrwx".chars().enumerate() {
        let bit = 1 << (8 - i);
        out.push(if mode & bit != 0 { ch } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn perm_string(meta: &Metadata) -> String {
    let kind = if meta.is_dir() { 'd' } else { '-' };
    let write = if meta.permissions().readonly() { '-' } else { 'w' };
    format!("{kind}r{write}-------")
}
