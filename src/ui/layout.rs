//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const PREV_LABEL: &str = "[◀ Prev]";
pub const NEXT_LABEL: &str = "[Next ▶]";

/// Primary screen layout: strip on top, a control row, and a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub strip_area: Rect,
    pub prev_button: Rect,
    pub scrubber_area: Rect,
    pub next_button: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // strip (takes all remaining space)
                Constraint::Length(1), // spacer
                Constraint::Length(1), // prev / scrubber / next
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let button_width = PREV_LABEL.chars().count() as u16;
        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(button_width),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(button_width),
            ])
            .split(rows[2]);

        Self {
            strip_area: rows[0],
            prev_button: controls[0],
            scrubber_area: controls[2],
            next_button: controls[4],
            status_area: rows[3],
        }
    }
}
