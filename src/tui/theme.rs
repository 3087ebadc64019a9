//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;
use serde::{Deserialize, Serialize};

/// Theme selection from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Traffic light pattern for how favourable a value is
    pub good: Color,
    pub fair: Color,
    pub poor: Color,
    pub bar_empty: Color,

    // Panels
    pub human_accent: Color,
    pub ai_accent: Color,
    pub selector_active: Style,
    pub option_selected: Style,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            good: Color::Green,
            fair: Color::Yellow,
            poor: Color::Red,
            bar_empty: Color::DarkGray,
            human_accent: Color::Cyan,
            ai_accent: Color::Magenta,
            selector_active: Style::new().fg(Color::Cyan).bold(),
            option_selected: Style::new().reversed(),
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            good: Color::Indexed(28),
            fair: Color::Indexed(130),
            poor: Color::Indexed(124),
            bar_empty: Color::Indexed(250),
            human_accent: Color::Blue,
            ai_accent: Color::Indexed(90),
            selector_active: Style::new().fg(Color::Blue).bold(),
            option_selected: Style::new().reversed(),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(246)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Indexed(124),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a 0-100 "how favourable" value
    pub fn goodness_color(&self, goodness: f64) -> Color {
        if goodness >= 70.0 {
            self.good
        } else if goodness >= 40.0 {
            self.fair
        } else {
            self.poor
        }
    }
}

/// Pick the palette for a theme setting. `Auto` asks the terminal for its
/// background luminance and falls back to dark when it can't tell.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
