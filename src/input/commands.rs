//! The built-in command table.
//!
//! Every verb the interpreter understands is listed here once, with the names
//! it answers to and the line shown for it by `help`. Completion reads the
//! same table.

/// A command the interpreter can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Open,
    Info,
    Write,
    WriteQuit,
    Quit,
    Print,
    ReadLine,
    Goto,
    Append,
    Insert,
    Change,
    Delete,
    Find,
    FindIgnoreCase,
    Undo,
    Redo,
    Number,
    Theme,
    Alias,
    New,
    BufferNext,
    BufferPrev,
    ListBuffers,
    Recover,
    Pwd,
    Cd,
    Ls,
    Clear,
    Version,
    Help,
}

impl Verb {
    /// The argument is free text taken verbatim, not split into words.
    pub fn takes_free_text(self) -> bool {
        matches!(self, Verb::Find | Verb::FindIgnoreCase)
    }
}

/// Static description of one command.
#[derive(Debug, Clone, Copy)]
pub struct Command {
    pub verb: Verb,
    /// First entry is the canonical name
    pub names: &'static [&'static str],
    /// Synopsis shown in `help`
    pub synopsis: &'static str,
    pub description: &'static str,
}

impl Command {
    pub fn name(&self) -> &'static str {
        self.names[0]
    }
}

pub const COMMANDS: &[Command] = &[
    Command {
        verb: Verb::Open,
        names: &["open"],
        synopsis: "open <path>",
        description: "open file",
    },
    Command {
        verb: Verb::Info,
        names: &["info"],
        synopsis: "info",
        description: "buffer info",
    },
    Command {
        verb: Verb::Write,
        names: &["write", "w"],
        synopsis: "w|write [path]",
        description: "save",
    },
    Command {
        verb: Verb::WriteQuit,
        names: &["wq"],
        synopsis: "wq",
        description: "save & quit",
    },
    Command {
        verb: Verb::Quit,
        names: &["quit", "q"],
        synopsis: "q|quit[!]",
        description: "quit (! skips the unsaved check)",
    },
    Command {
        verb: Verb::Print,
        names: &["print", "p"],
        synopsis: "p|print [range]",
        description: "print lines",
    },
    Command {
        verb: Verb::ReadLine,
        names: &["r"],
        synopsis: "r <n>",
        description: "print line",
    },
    Command {
        verb: Verb::Goto,
        names: &["goto"],
        synopsis: "goto <n>",
        description: "jump to line",
    },
    Command {
        verb: Verb::Append,
        names: &["append", "a"],
        synopsis: "a|append",
        description: "append lines ('.' ends)",
    },
    Command {
        verb: Verb::Insert,
        names: &["insert", "i"],
        synopsis: "i|insert <n>",
        description: "insert before n ('.' ends)",
    },
    Command {
        verb: Verb::Change,
        names: &["change", "c"],
        synopsis: "c|change <range>",
        description: "replace lines ('.' ends)",
    },
    Command {
        verb: Verb::Delete,
        names: &["delete", "d"],
        synopsis: "d|delete <range>",
        description: "delete lines",
    },
    Command {
        verb: Verb::Find,
        names: &["find"],
        synopsis: "find <text>",
        description: "search",
    },
    Command {
        verb: Verb::FindIgnoreCase,
        names: &["findi"],
        synopsis: "findi <text>",
        description: "search (icase)",
    },
    Command {
        verb: Verb::Undo,
        names: &["undo", "u"],
        synopsis: "u|undo",
        description: "undo last edit",
    },
    Command {
        verb: Verb::Redo,
        names: &["redo"],
        synopsis: "redo",
        description: "redo last undone edit",
    },
    Command {
        verb: Verb::Number,
        names: &["number"],
        synopsis: "number",
        description: "toggle line nums",
    },
    Command {
        verb: Verb::Theme,
        names: &["theme"],
        synopsis: "theme [name]",
        description: "set or list themes",
    },
    Command {
        verb: Verb::Alias,
        names: &["alias"],
        synopsis: "alias [<from> <to...>]",
        description: "make or list aliases",
    },
    Command {
        verb: Verb::New,
        names: &["new"],
        synopsis: "new",
        description: "new buffer",
    },
    Command {
        verb: Verb::BufferNext,
        names: &["bnext"],
        synopsis: "bnext",
        description: "next buffer",
    },
    Command {
        verb: Verb::BufferPrev,
        names: &["bprev"],
        synopsis: "bprev",
        description: "previous buffer",
    },
    Command {
        verb: Verb::ListBuffers,
        names: &["lsb"],
        synopsis: "lsb",
        description: "list buffers",
    },
    Command {
        verb: Verb::Recover,
        names: &["recover"],
        synopsis: "recover [n]",
        description: "list or load recovery snapshots",
    },
    Command {
        verb: Verb::Pwd,
        names: &["pwd"],
        synopsis: "pwd",
        description: "print working dir",
    },
    Command {
        verb: Verb::Cd,
        names: &["cd"],
        synopsis: "cd [dir]",
        description: "change dir (home if omitted)",
    },
    Command {
        verb: Verb::Ls,
        names: &["ls"],
        synopsis: "ls [-l] [-a] [path]",
        description: "list dir",
    },
    Command {
        verb: Verb::Clear,
        names: &["clear"],
        synopsis: "clear",
        description: "clear screen",
    },
    Command {
        verb: Verb::Version,
        names: &["version", "ver"],
        synopsis: "version",
        description: "show version",
    },
    Command {
        verb: Verb::Help,
        names: &["help", "h", "?"],
        synopsis: "help",
        description: "this list",
    },
];

/// Look up a command by any of its names, case-insensitively.
pub fn find_by_name(name: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|c| c.names.iter().any(|n| n.eq_ignore_ascii_case(name)))
}

/// The table entry for `verb`.
pub fn command_for(verb: Verb) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.verb == verb)
}

/// Every name (canonical and short) a command answers to.
pub fn all_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().flat_map(|c| c.names.iter().copied())
}
