//! Input handling: command parsing, the command table, history and completion

pub mod commands;
pub mod completion;
pub mod history;
pub mod parser;
