//! Display settings and session commands: line numbers, themes, aliases.

use super::{Editor, Response};
use crate::error::{EditorError, Result};
use crate::input::parser::ParsedCommand;
use crate::view::theme::Theme;

impl Editor {
    pub(super) fn toggle_numbers(&mut self) -> Response {
        self.show_line_numbers = !self.show_line_numbers;
        Response::Message(format!(
            "number: {}",
            if self.show_line_numbers { "on" } else { "off" }
        ))
    }

    pub(super) fn theme_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        match cmd.args.as_slice() {
            [] => Ok(Response::Text(
                Theme::ALL
                    .iter()
                    .map(|t| {
                        let marker = if *t == self.theme { '*' } else { ' ' };
                        format!("{marker} {t}")
                    })
                    .collect(),
            )),
            [name] => {
                let theme =
                    Theme::from_name(name).ok_or_else(|| EditorError::UnknownTheme(name.clone()))?;
                self.theme = theme;
                tracing::info!("theme set to {}", theme);
                Ok(Response::Message(format!("theme set: {theme}")))
            }
            _ => Err(EditorError::usage("theme [name]")),
        }
    }

    pub(super) fn alias_command(&mut self, cmd: &ParsedCommand) -> Result<Response> {
        match cmd.args.as_slice() {
            [] => {
                if self.aliases.is_empty() {
                    return Ok(Response::Text(vec!["(no aliases)".to_string()]));
                }
                Ok(Response::Text(
                    self.aliases
                        .iter()
                        .map(|(from, to)| format!("{from} -> {to}"))
                        .collect(),
                ))
            }
            [_] => Err(EditorError::usage("alias <from> <to...>")),
            [from, to @ ..] => {
                let expansion = to.join(" ");
                self.aliases.insert(from, &expansion);
                Ok(Response::Message(format!(
                    "alias: {} -> {}",
                    from.to_lowercase(),
                    expansion
                )))
            }
        }
    }
}
