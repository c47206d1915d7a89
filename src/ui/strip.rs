//! Carousel strip: slides laid out left to right, scrolled so the selected
//! one sits in the middle.
//!
//! Geometry comes from the engine; this widget only shifts it by the
//! animated scroll offset, clips it to the viewport and paints.  The bottom
//! row of every slide is a marker line, bright under the selected slide.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
};

use super::halfblocks::{render_image_clipped, VirtualRect};
use super::theme::Theme;
use crate::core::strip::StripEngine;

/// Terminal columns between neighbouring slides.
pub const SLIDE_GAP: u16 = 2;
/// Aspect ratio assumed before an image has been decoded.
pub const DEFAULT_ASPECT: f64 = 4.0 / 3.0;
/// Narrowest slide, in columns.
pub const MIN_SLIDE_WIDTH: u16 = 8;

/// A slide's visible rectangle, for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideHit {
    pub index: usize,
    pub rect: Rect,
}

pub struct StripWidget<'a> {
    pub engine: &'a StripEngine,
    pub thumbnails: &'a HashMap<usize, Arc<RgbaImage>>,
    pub failed: &'a HashSet<usize>,
    /// Displayed scroll offset in columns (animated).
    pub scroll_offset: i32,
    pub selected: usize,
    pub focused: bool,
}

impl StripWidget<'_> {
    pub fn render_and_hit(self, area: Rect, buf: &mut Buffer) -> Vec<SlideHit> {
        let mut hits = Vec::new();
        if area.width == 0 || area.height < 2 {
            return hits;
        }
        let image_rows = area.height - 1;
        let marker_y = area.y + image_rows;

        for index in 0..self.engine.slide_count() {
            let (Some(left), Some(width)) =
                (self.engine.slide_left(index), self.engine.slide_width(index))
            else {
                continue;
            };
            let x = i32::from(area.x) + left.round() as i32 - self.scroll_offset;
            let Some(visible) = clip_span(x, width, area) else {
                continue;
            };

            let target = VirtualRect {
                x,
                y: area.y,
                width,
                height: image_rows,
            };
            match self.thumbnails.get(&index) {
                Some(image) => render_image_clipped(image, target, area, buf),
                None => {
                    let message = if self.failed.contains(&index) {
                        "✕"
                    } else {
                        "…"
                    };
                    let centre_x = x + i32::from(width / 2);
                    put_clipped(buf, area, centre_x, area.y + image_rows / 2, message, Theme::placeholder_style());
                }
            }

            let marker_style = if index == self.selected {
                if self.focused {
                    Theme::focused_style()
                } else {
                    Theme::active_slide_border_style()
                }
            } else {
                Theme::slide_border_style()
            };
            let marker = if index == self.selected { "━" } else { "─" };
            for col in visible.x..visible.x + visible.width {
                buf[(col, marker_y)].set_symbol(marker).set_style(marker_style);
            }

            hits.push(SlideHit {
                index,
                rect: Rect::new(visible.x, area.y, visible.width, area.height),
            });
        }

        hits
    }
}

/// Slide width in columns for an image of `aspect` (width / height) drawn
/// `image_rows` tall with half-blocks, bounded to the viewport.
pub fn slide_width(aspect: f64, image_rows: u16, viewport_width: u16) -> u16 {
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        DEFAULT_ASPECT
    };
    let max = (f64::from(viewport_width) * 0.8).floor().max(f64::from(MIN_SLIDE_WIDTH));
    let width = (aspect * 2.0 * f64::from(image_rows)).round();
    width.clamp(f64::from(MIN_SLIDE_WIDTH), max) as u16
}

/// Horizontal part of `[x, x + width)` inside `area`, as a one-row rect.
fn clip_span(x: i32, width: u16, area: Rect) -> Option<Rect> {
    let start = x.max(i32::from(area.x));
    let end = (x + i32::from(width)).min(i32::from(area.right()));
    (start < end).then(|| Rect::new(start as u16, area.y, (end - start) as u16, 1))
}

fn put_clipped(buf: &mut Buffer, area: Rect, x: i32, y: u16, text: &str, style: Style) {
    if x < i32::from(area.x) || x >= i32::from(area.right()) {
        return;
    }
    let x = x as u16;
    buf.set_line(x, y, &Line::from(Span::styled(text, style)), area.right() - x);
}
