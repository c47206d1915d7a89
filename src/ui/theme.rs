//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── strip ──────────────────────────────────────────────────
    pub fn slide_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn active_slide_border_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn placeholder_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn button_style() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    // ── scrubber ───────────────────────────────────────────────
    pub fn track_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn fill_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn dragging_fill_style() -> Style {
        Style::default().fg(Color::LightYellow)
    }

    pub fn count_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn focused_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn spinner_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style() -> Style {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    }

    pub fn close_button_style() -> Style {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    }

    pub fn lightbox_border_style() -> Style {
        Style::default().fg(Color::LightBlue)
    }
}
