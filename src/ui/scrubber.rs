//! Progress scrubber widget: a one-row track with a fill and an `i / N`
//! count to its right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
};

use super::theme::Theme;
use crate::core::scrubber::Scrubber;

const TRACK_EMPTY: &str = "─";
const TRACK_FILLED: &str = "━";
const KNOB: &str = "●";

pub struct ScrubberWidget<'a> {
    pub scrubber: &'a Scrubber,
    pub focused: bool,
}

impl ScrubberWidget<'_> {
    /// Draw and return the track rect (the pointer hit zone).
    pub fn render_and_hit(self, area: Rect, buf: &mut Buffer) -> Rect {
        if area.width == 0 || area.height == 0 {
            return Rect::default();
        }

        // The slot fits the widest count so the track never moves mid-drag.
        let count = self.scrubber.image_count();
        let widest = format!(" {count} / {count}").chars().count();
        let label = format!("{:>widest$}", format!(" {}", self.scrubber.displayed_count()));
        let label_width = (widest as u16).min(area.width);
        let track = Rect::new(area.x, area.y, area.width - label_width, 1);

        let label_style = if self.focused {
            Theme::focused_style()
        } else {
            Theme::count_style()
        };
        buf.set_line(
            track.x + track.width,
            area.y,
            &Line::from(Span::styled(label, label_style)),
            label_width,
        );

        if track.width == 0 {
            return track;
        }

        let dragging = self.scrubber.is_dragging();
        let fill_style = if dragging {
            Theme::dragging_fill_style()
        } else {
            Theme::fill_style()
        };
        let filled = fill_columns(self.scrubber.displayed_percentage(), track.width);
        for col in 0..track.width {
            let (symbol, style) = if col < filled {
                (TRACK_FILLED, fill_style)
            } else {
                (TRACK_EMPTY, Theme::track_style())
            };
            buf[(track.x + col, track.y)].set_symbol(symbol).set_style(style);
        }
        if (dragging || self.focused) && filled > 0 {
            buf[(track.x + filled - 1, track.y)]
                .set_symbol(KNOB)
                .set_style(fill_style);
        }

        track
    }
}

/// Columns covered by the fill for a percentage in `[0, 100]`.
fn fill_columns(percentage: f64, width: u16) -> u16 {
    let columns = (percentage.clamp(0.0, 100.0) / 100.0 * f64::from(width)).round();
    (columns as u16).min(width)
}
