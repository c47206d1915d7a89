//! Loading indicator: a braille spinner and a label, centred in its area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

/// Shown while the image list is being fetched.
pub struct LoadingIndicator<'a> {
    pub label: &'a str,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
}

impl Widget for LoadingIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text = format!("{} {}", spinner_frame(self.tick), self.label);
        let text_width = text.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(text_width) / 2;
        let y = area.y + area.height / 2;

        let line = Line::from(Span::styled(text, Theme::spinner_style()));
        buf.set_line(x, y, &line, area.width.min(text_width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_centred_with_a_spinner_frame() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 3));
        LoadingIndicator {
            label: "Loading images…",
            tick: 1,
        }
        .render(buf.area, &mut buf);

        let row: String = (0..30).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        // 17 columns of text in 30 → 6 columns of left padding.
        assert!(row.starts_with("      ⠙ Loading images…"));
    }
}
