//! Turning a typed line into a [`ParsedCommand`].

use std::collections::BTreeMap;

use super::commands::{find_by_name, Verb};
use crate::error::{EditorError, Result};
use crate::model::line_store::LineRange;

/// A command line after alias expansion and verb lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub verb: Verb,
    pub args: Vec<String>,
    /// The verb carried a trailing `!`
    pub force: bool,
    /// Everything after the verb (after alias expansion), trimmed but
    /// otherwise as typed
    pub text: String,
}

/// User-defined command aliases. Names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    table: BTreeMap<String, String>,
}

impl Aliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite an alias.
    pub fn insert(&mut self, name: &str, expansion: &str) {
        self.table
            .insert(name.to_lowercase(), expansion.trim().to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.table.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Aliases in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Aliases {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut aliases = Self::new();
        for (name, expansion) in iter {
            aliases.insert(name.as_ref(), expansion.as_ref());
        }
        aliases
    }
}

/// Split on whitespace outside quotes. Single or double quotes group words
/// and are removed.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(EditorError::usage(format!("unterminated {q} quote")));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one input line. Blank input yields `Ok(None)`.
///
/// Arguments are tokenised, except for verbs that take free text: those get
/// the remainder verbatim in [`ParsedCommand::text`] and `args` split on
/// whitespace only, so quotes and apostrophes are searched for literally.
pub fn parse_command(input: &str, aliases: &Aliases) -> Result<Option<ParsedCommand>> {
    let raw = input.trim();
    let line = raw.strip_prefix(':').unwrap_or(raw);

    let (first, tail) = split_verb(line);
    if first.is_empty() {
        return Ok(None);
    }

    // One level of alias expansion, never recursive
    let expanded;
    let (word, tail) = match aliases.get(first) {
        Some(expansion) => {
            expanded = if tail.is_empty() {
                expansion.to_string()
            } else {
                format!("{expansion} {tail}")
            };
            split_verb(&expanded)
        }
        None => (first, tail),
    };
    if word.is_empty() {
        return Err(EditorError::UnknownCommand(raw.to_string()));
    }

    let (name, force) = match word.strip_suffix('!') {
        Some(name) if !name.is_empty() => (name, true),
        _ => (word, false),
    };
    let command =
        find_by_name(name).ok_or_else(|| EditorError::UnknownCommand(raw.to_string()))?;

    let args = if command.verb.takes_free_text() {
        tail.split_whitespace().map(str::to_string).collect()
    } else {
        tokenize(tail)?
    };

    Ok(Some(ParsedCommand {
        verb: command.verb,
        args,
        force,
        text: tail.to_string(),
    }))
}

/// The first whitespace-delimited word and the trimmed remainder.
fn split_verb(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

/// Parse a positive line number.
pub fn parse_line_number(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(0) => Err(EditorError::address("line numbers start at 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(EditorError::address(format!("'{text}' is not a line number"))),
    }
}

/// Parse `N` or `N-M`. Bounds against a buffer are checked by the store.
pub fn parse_range(text: &str) -> Result<LineRange> {
    let text = text.trim();
    match text.split_once('-') {
        Some((start, end)) => LineRange::new(parse_line_number(start)?, parse_line_number(end)?),
        None => LineRange::single(parse_line_number(text)?),
    }
}
