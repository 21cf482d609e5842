//! Static palette for the terminal UI.
//!
//! The core never sees any of this; components pull colors from [`THEME`].

use ratatui::style::{Color, Modifier, Style};

use crate::inference::Role;

pub struct Theme {
    /// Brand green used for the title, the cursor row and focused borders.
    pub accent: Color,
    /// Bubble background for assistant turns.
    pub surface: Color,
    /// Borders and secondary text.
    pub muted: Color,
    pub user_fg: Color,
    pub assistant_fg: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    pub link: Color,
}

pub const THEME: Theme = Theme {
    accent: Color::Rgb(0x49, 0xE8, 0x83),
    surface: Color::Rgb(0x1E, 0x1E, 0x1E),
    muted: Color::Rgb(0x43, 0x42, 0x42),
    user_fg: Color::Rgb(0xE6, 0xE6, 0xE6),
    assistant_fg: Color::Rgb(0xC8, 0xF5, 0xD6),
    code_fg: Color::White,
    code_bg: Color::Rgb(0x2B, 0x2B, 0x2B),
    link: Color::Cyan,
};

impl Theme {
    /// Text color for a turn's body.
    pub fn role_fg(&self, role: Role) -> Color {
        match role {
            Role::User => self.user_fg,
            Role::Assistant => self.assistant_fg,
        }
    }

    /// Border and label style for a turn's bubble.
    pub fn bubble_border(&self, role: Role) -> Style {
        match role {
            Role::User => Style::default().fg(self.muted),
            Role::Assistant => Style::default().fg(self.accent),
        }
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}
