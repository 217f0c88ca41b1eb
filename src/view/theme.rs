use crossterm::style::{Attribute, Color, ContentStyle};

/// Named colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Neon,
    Matrix,
    Paper,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Default,
        Theme::Dark,
        Theme::Neon,
        Theme::Matrix,
        Theme::Paper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Neon => "neon",
            Theme::Matrix => "matrix",
            Theme::Paper => "paper",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Default => Palette {
                accent: fg(Color::DarkCyan),
                ok: fg(Color::DarkGreen),
                warn: fg(Color::DarkYellow),
                err: fg(Color::DarkRed),
                dim: dimmed(),
                prompt: fg(Color::DarkCyan),
                input: fg(Color::White),
                gutter: fg(Color::DarkGrey),
                title: bold(Color::DarkCyan),
                help_cmd: fg(Color::DarkCyan),
                help_text: dimmed(),
            },
            Theme::Dark => Palette {
                accent: fg(Color::DarkCyan),
                ok: fg(Color::DarkGreen),
                warn: fg(Color::DarkYellow),
                err: fg(Color::DarkRed),
                dim: fg(Color::DarkGrey),
                prompt: fg(Color::Cyan),
                input: fg(Color::DarkGrey),
                gutter: fg(Color::DarkGrey),
                title: bold(Color::DarkCyan),
                help_cmd: fg(Color::Cyan),
                help_text: fg(Color::DarkGrey),
            },
            Theme::Neon => Palette {
                accent: fg(Color::Magenta),
                ok: fg(Color::Green),
                warn: fg(Color::Yellow),
                err: fg(Color::Red),
                dim: fg(Color::DarkGrey),
                prompt: fg(Color::Magenta),
                input: fg(Color::Cyan),
                gutter: fg(Color::DarkGrey),
                title: bold(Color::Magenta),
                help_cmd: fg(Color::Magenta),
                help_text: fg(Color::DarkGrey),
            },
            Theme::Matrix => Palette {
                accent: fg(Color::DarkGreen),
                ok: fg(Color::Green),
                warn: fg(Color::DarkYellow),
                err: fg(Color::DarkRed),
                dim: fg(Color::DarkGrey),
                prompt: fg(Color::Green),
                input: fg(Color::Green),
                gutter: fg(Color::DarkGrey),
                title: bold(Color::DarkGreen),
                help_cmd: fg(Color::Green),
                help_text: fg(Color::DarkGrey),
            },
            Theme::Paper => Palette {
                accent: fg(Color::DarkGrey),
                ok: fg(Color::DarkGreen),
                warn: fg(Color::DarkYellow),
                err: fg(Color::DarkRed),
                dim: fg(Color::DarkGrey),
                prompt: fg(Color::DarkGrey),
                input: fg(Color::DarkGrey),
                gutter: fg(Color::DarkGrey),
                title: bold(Color::DarkGrey),
                help_cmd: fg(Color::DarkGrey),
                help_text: fg(Color::DarkGrey),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        ..ContentStyle::default()
    }
}

fn bold(color: Color) -> ContentStyle {
    let mut style = fg(color);
    style.attributes.set(Attribute::Bold);
    style
}

fn dimmed() -> ContentStyle {
    let mut style = ContentStyle::default();
    style.attributes.set(Attribute::Dim);
    style
}

/// Styles for each role in the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: ContentStyle,
    pub ok: ContentStyle,
    pub warn: ContentStyle,
    pub err: ContentStyle,
    pub dim: ContentStyle,
    /// The `trust>` prompt
    pub prompt: ContentStyle,
    /// Text being typed at the prompt
    pub input: ContentStyle,
    /// Line-number column
    pub gutter: ContentStyle,
    pub title: ContentStyle,
    pub help_cmd: ContentStyle,
    pub help_text: ContentStyle,
}

/// Picks a role's style and applies it, or passes text through untouched
/// when colour is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    palette: Palette,
    color: bool,
}

impl Painter {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self {
            palette: theme.palette(),
            color,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.palette = theme.palette();
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render `text` in the style chosen by `role`.
    pub fn paint(&self, role: impl Fn(&Palette) -> ContentStyle, text: &str) -> String {
        if self.color {
            role(&self.palette).apply(text).to_string()
        } else {
            text.to_string()
        }
    }
}
