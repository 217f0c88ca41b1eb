//! Tab completion for the command prompt.
//!
//! The first word completes against command and alias names. Later words
//! complete against filesystem entries, directories only after `cd`.

use std::fs;
use std::path::{Path, PathBuf};

/// What completion can see besides the typed text.
#[derive(Debug, Clone)]
pub struct CompletionContext {
    /// Command names and alias names
    pub names: Vec<String>,
    /// Directory relative paths resolve against
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
}

/// Outcome of pressing Tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matches; leave the line alone.
    None,
    /// Replace the text from byte `start` up to the cursor with `text`.
    Replace { start: usize, text: String },
    /// Several candidates share no longer prefix than what was typed.
    Candidates(Vec<String>),
}

/// Complete the word that ends at the cursor. `before_cursor` is the line
/// text up to the cursor.
pub fn complete(before_cursor: &str, ctx: &CompletionContext) -> Completion {
    let start = before_cursor
        .rfind(char::is_whitespace)
        .map(|i| i + before_cursor[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    let word = &before_cursor[start..];
    let preceding = before_cursor[..start].trim();

    let candidates = if preceding.is_empty() {
        complete_name(word, &ctx.names)
    } else {
        let dirs_only = preceding
            .split_whitespace()
            .next()
            .is_some_and(|first| first.eq_ignore_ascii_case("cd"));
        complete_path(word, ctx, dirs_only)
    };

    match candidates.len() {
        0 => Completion::None,
        1 => Completion::Replace {
            start,
            text: candidates[0].clone(),
        },
        _ => {
            let common = longest_common_prefix(&candidates);
            if common.len() > word.len() {
                Completion::Replace {
                    start,
                    text: common,
                }
            } else {
                Completion::Candidates(candidates)
            }
        }
    }
}

fn complete_name(word: &str, names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = names
        .iter()
        .filter(|n| n.starts_with(word))
        .cloned()
        .collect();
    out.sort();
    out.dedup();
    out
}

fn complete_path(word: &str, ctx: &CompletionContext, dirs_only: bool) -> Vec<String> {
    let (dir_part, base) = match word.rfind('/') {
        Some(i) => (&word[..=i], &word[i + 1..]),
        None => ("", word),
    };
    let lookup = if dir_part.is_empty() {
        ctx.cwd.clone()
    } else {
        let expanded = expand_home(dir_part, ctx.home.as_deref());
        if expanded.is_absolute() {
            expanded
        } else {
            ctx.cwd.join(expanded)
        }
    };

    let Ok(entries) = fs::read_dir(&lookup) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(base) || (name.starts_with('.') && !base.starts_with('.')) {
            continue;
        }
        // Follows symlinks so a link to a directory completes like one
        let is_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
        if dirs_only && !is_dir {
            continue;
        }
        let suffix = if is_dir { "/" } else { "" };
        out.push(format!("{dir_part}{name}{suffix}"));
    }
    out.sort();
    out
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(text: &str, home: Option<&Path>) -> PathBuf {
    match (text, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (t, Some(home)) if t.starts_with("~/") => home.join(&t[2..]),
        (t, _) => PathBuf::from(t),
    }
}

fn longest_common_prefix(items: &[String]) -> String {
    let Some(first) = items.first() else {
        return String::new();
    };
    let mut len = first.len();
    for item in &items[1..] {
        len = first
            .char_indices()
            .zip(item.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((i, c), _)| i + c.len_utf8())
            .min(len);
    }
    first[..len].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx(cwd: &Path) -> CompletionContext {
        CompletionContext {
            names: ["print", "p", "pwd", "open", "cd", "quit"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cwd: cwd.to_path_buf(),
            home: Some(cwd.join("home")),
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("home")).unwrap();
        fs::write(dir.path().join("home").join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::write(dir.path().join("release.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        dir
    }

    #[test]
    fn test_single_command_match_replaces_word() {
        let dir = fixture();
        assert_eq!(
            complete("op", &ctx(dir.path())),
            Completion::Replace {
                start: 0,
                text: "open".into()
            }
        );
    }

    #[test]
    fn test_ambiguous_commands_are_listed() {
        let dir = fixture();
        assert_eq!(
            complete("p", &ctx(dir.path())),
            Completion::Candidates(vec!["p".into(), "print".into(), "pwd".into()])
        );
    }

    #[test]
    fn test_paths_extend_to_common_prefix() {
        let dir = fixture();
        fs::write(dir.path().join("release-notes.txt"), "").unwrap();
        assert_eq!(
            complete("open rel", &ctx(dir.path())),
            Completion::Replace {
                start: 5,
                text: "release".into()
            }
        );
        assert_eq!(
            complete("open re", &ctx(dir.path())),
            Completion::Candidates(vec![
                "readme.md".into(),
                "release-notes.txt".into(),
                "release.txt".into()
            ])
        );
    }

    #[test]
    fn test_directories_get_trailing_slash() {
        let dir = fixture();
        assert_eq!(
            complete("open sr", &ctx(dir.path())),
            Completion::Replace {
                start: 5,
                text: "src/".into()
            }
        );
    }

    #[test]
    fn test_cd_completes_directories_only() {
        let dir = fixture();
        assert_eq!(
            complete("cd ", &ctx(dir.path())),
            Completion::Candidates(vec!["home/".into(), "src/".into()])
        );
    }

    #[test]
    fn test_tilde_is_expanded_for_lookup() {
        let dir = fixture();
        assert_eq!(
            complete("open ~/no", &ctx(dir.path())),
            Completion::Replace {
                start: 5,
                text: "~/notes.txt".into()
            }
        );
    }

    #[test]
    fn test_no_match() {
        let dir = fixture();
        assert_eq!(complete("open zzz", &ctx(dir.path())), Completion::None);
        assert_eq!(complete("xyz", &ctx(dir.path())), Completion::None);
    }

    #[test]
    fn test_longest_common_prefix() {
        let items = vec!["release".to_string(), "relax".to_string()];
        assert_eq!(longest_common_prefix(&items), "rel");
        let items = vec!["é1".to_string(), "é2".to_string()];
        assert_eq!(longest_common_prefix(&items), "é");
    }
}
