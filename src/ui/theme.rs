//! Theme definitions for puzzlelab
//!
//! Provides three built-in themes: Gruvbox, Nord, and Transparent.

use crate::config::ThemeName;
use ratatui::style::{Color, Modifier, Style};

/// Colors used across the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub accent: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,

    // Code pane
    pub asset: Color,
    pub gutter: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const GRUVBOX: Theme = Theme {
    bg: rgb(0x282828),
    fg: rgb(0xebdbb2),
    fg_dim: rgb(0x928374),
    accent: rgb(0xfe8019),
    success: rgb(0xb8bb26),
    warning: rgb(0xfabd2f),
    error: rgb(0xfb4934),
    border: rgb(0x504945),
    border_focused: rgb(0xa89984),
    selection: rgb(0x504945),
    asset: rgb(0x83a598),
    gutter: rgb(0x665c54),
};

const NORD: Theme = Theme {
    bg: rgb(0x2e3440),
    fg: rgb(0xeceff4),
    fg_dim: rgb(0x4c566a),
    accent: rgb(0x88c0d0),
    success: rgb(0xa3be8c),
    warning: rgb(0xebcb8b),
    error: rgb(0xbf616a),
    border: rgb(0x3b4252),
    border_focused: rgb(0x88c0d0),
    selection: rgb(0x4c566a),
    asset: rgb(0xb48ead),
    gutter: rgb(0x434c5e),
};

// Terminal palette; `Reset` keeps the user's own background
const TRANSPARENT: Theme = Theme {
    bg: Color::Reset,
    fg: Color::Reset,
    fg_dim: Color::DarkGray,
    accent: Color::Cyan,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    border: Color::DarkGray,
    border_focused: Color::Cyan,
    selection: Color::DarkGray,
    asset: Color::Magenta,
    gutter: Color::DarkGray,
};

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Gruvbox => GRUVBOX,
            ThemeName::Nord => NORD,
            ThemeName::Transparent => TRANSPARENT,
        }
    }

    // Style helpers for common UI patterns

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Dimmed text style
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Open menu or highlighted row
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style (unfocused)
    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    /// Border style (focused)
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused).bg(self.bg)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning).bg(self.bg)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    /// Folded asset literal in the code pane
    pub fn asset(&self) -> Style {
        Style::default()
            .fg(self.asset)
            .bg(self.bg)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Line numbers
    pub fn gutter(&self) -> Style {
        Style::default().fg(self.gutter).bg(self.bg)
    }

    /// Style for a menu bar item, keyed by its classes
    pub fn menu_item(&self, classes: &[String], open: bool) -> Style {
        let has = |name: &str| classes.iter().any(|c| c == name);

        if open {
            self.selected()
        } else if has("stale-run") {
            self.warning().add_modifier(Modifier::BOLD)
        } else if has("run") {
            self.success()
        } else if has("menu-name") {
            self.title()
        } else {
            self.text()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(rgb(0x282828), Color::Rgb(40, 40, 40));
        assert_eq!(rgb(0xfe8019), Color::Rgb(254, 128, 25));
    }

    #[test]
    fn test_every_theme_name_resolves() {
        let mut name = ThemeName::Gruvbox;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(Theme::from_name(name));
            name = name.next();
        }
        assert_eq!(seen[0].bg, Color::Rgb(40, 40, 40));
        assert_eq!(seen[1].bg, Color::Rgb(46, 52, 64));
        assert_eq!(seen[2].bg, Color::Reset);
        assert_eq!(name, ThemeName::Gruvbox);
    }

    #[test]
    fn test_stale_run_item_stands_out() {
        let theme = Theme::from_name(ThemeName::Gruvbox);
        let stale = vec!["menu-item".to_string(), "run".into(), "stale-run".into()];
        let fresh = vec!["menu-item".to_string(), "run".into()];
        assert_eq!(theme.menu_item(&stale, false).fg, Some(theme.warning));
        assert_eq!(theme.menu_item(&fresh, false).fg, Some(theme.success));
        assert_eq!(theme.menu_item(&fresh, true), theme.selected());
    }
}
