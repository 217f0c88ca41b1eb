//! The prompt shown before each line is read.

use super::theme::Painter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Waiting for a command. `dirty` marks unsaved changes in the current
    /// buffer.
    Command { dirty: bool },
    /// Collecting lines for append/insert/change
    Collect,
    /// Waiting for a yes/no answer
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
}

impl Prompt {
    pub fn command(dirty: bool) -> Self {
        Self {
            kind: PromptKind::Command { dirty },
        }
    }

    pub fn collect() -> Self {
        Self {
            kind: PromptKind::Collect,
        }
    }

    pub fn confirm() -> Self {
        Self {
            kind: PromptKind::Confirm,
        }
    }

    /// Prompt text without styling.
    pub fn text(&self) -> &'static str {
        match self.kind {
            PromptKind::Command { dirty: false } => "trust> ",
            PromptKind::Command { dirty: true } => "*trust> ",
            PromptKind::Collect => "> ",
            PromptKind::Confirm => "[y/N] ",
        }
    }

    pub fn render(&self, painter: &Painter) -> String {
        match self.kind {
            PromptKind::Confirm => painter.paint(|p| p.warn, self.text()),
            _ => painter.paint(|p| p.prompt, self.text()),
        }
    }

    /// Display width of the prompt, all ASCII.
    pub fn width(&self) -> usize {
        self.text().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::theme::Theme;

    #[test]
    fn test_prompt_texts() {
        assert_eq!(Prompt::command(false).text(), "trust> ");
        assert_eq!(Prompt::command(true).text(), "*trust> ");
        assert_eq!(Prompt::collect().text(), "> ");
        assert_eq!(Prompt::confirm().text(), "[y/N] ");
    }

    #[test]
    fn test_uncoloured_render_is_plain_text() {
        let painter = Painter::new(Theme::Matrix, false);
        assert_eq!(Prompt::command(true).render(&painter), "*trust> ");
    }
}
