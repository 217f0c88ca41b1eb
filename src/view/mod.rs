//! Everything the user sees: prompt, line reading, themes and output.

pub mod line_editor;
pub mod prompt;
pub mod reader;
pub mod render;
pub mod theme;
