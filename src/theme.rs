use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown values fall back to light
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// The checkbox is checked exactly when the theme is dark
    pub fn from_checked(checked: bool) -> Self {
        if checked { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                base: Style::default().bg(Color::White).fg(Color::Black),
                header: Style::default().bg(Color::Gray).fg(Color::Black),
                accent: Color::Blue,
                muted: Color::DarkGray,
                border: Color::Gray,
                you: Color::Blue,
                robot: Color::Magenta,
                error: Color::Red,
                ok: Color::Green,
                button: Style::default().bg(Color::Gray).fg(Color::Black),
                active: Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            },
            Theme::Dark => Palette {
                base: Style::default().bg(Color::Black).fg(Color::White),
                header: Style::default().bg(Color::DarkGray).fg(Color::White),
                accent: Color::Cyan,
                muted: Color::Gray,
                border: Color::DarkGray,
                you: Color::Cyan,
                robot: Color::Yellow,
                error: Color::LightRed,
                ok: Color::LightGreen,
                button: Style::default().bg(Color::DarkGray).fg(Color::White),
                active: Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            },
        }
    }
}

/// Styles the renderer pulls from for the active theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub base: Style,
    pub header: Style,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub you: Color,
    pub robot: Color,
    pub error: Color,
    pub ok: Color,
    pub button: Style,
    pub active: Style,
}
