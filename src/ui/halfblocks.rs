//! Image rendering with Unicode `▀` half-blocks (2 pixels per cell).
//!
//! Terminal cells are ~2× taller than wide, so each cell represents 1 pixel
//! wide × 2 pixels tall.  Images are fitted inside the target box with their
//! aspect ratio preserved and centred.

use image::imageops::FilterType;
use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
};

/// A box that may hang off the left edge of the screen (slides scrolled
/// partly out of view), hence the signed `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualRect {
    pub x: i32,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl From<Rect> for VirtualRect {
    fn from(r: Rect) -> Self {
        Self {
            x: i32::from(r.x),
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

/// Fit `image` into `area` and draw it.
pub fn render_image(image: &RgbaImage, area: Rect, buf: &mut Buffer) {
    render_image_clipped(image, area.into(), area, buf);
}

/// Fit `image` into `target`, drawing only the cells inside `clip`.
pub fn render_image_clipped(image: &RgbaImage, target: VirtualRect, clip: Rect, buf: &mut Buffer) {
    if target.width == 0 || target.height == 0 || image.width() == 0 || image.height() == 0 {
        return;
    }

    // Available pixel budget: each column = 1 px wide, each row = 2 px tall.
    let max_px_w = f64::from(target.width);
    let max_px_h = f64::from(target.height) * 2.0;
    let src_w = f64::from(image.width());
    let src_h = f64::from(image.height());

    let scale = (max_px_w / src_w).min(max_px_h / src_h);
    let fit_w = (src_w * scale).round().max(1.0) as u32;
    let fit_h = (src_h * scale).round().max(1.0) as u32;
    let rgba = image::imageops::resize(image, fit_w, fit_h, FilterType::Triangle);
    let (iw, ih) = (rgba.width(), rgba.height());

    let col_offset = i32::from(target.width.saturating_sub(iw as u16) / 2);
    let rows_used = ih.div_ceil(2) as u16;
    let row_offset = target.height.saturating_sub(rows_used) / 2;

    let clip_left = i32::from(clip.x);
    let clip_right = i32::from(clip.x.saturating_add(clip.width));

    for row in 0..target.height {
        let yt = u32::from(row) * 2;
        let yb = yt + 1;
        if yt >= ih {
            break;
        }
        let y = target.y.saturating_add(row_offset).saturating_add(row);
        if y < clip.y || y >= clip.y.saturating_add(clip.height) {
            continue;
        }
        for col in 0..iw.min(u32::from(target.width)) {
            let x = target.x + col_offset + col as i32;
            if x < clip_left || x >= clip_right {
                continue;
            }
            let t = rgba.get_pixel(col, yt);
            let fg = Color::Rgb(t[0], t[1], t[2]);
            let bg = if yb < ih {
                let b = rgba.get_pixel(col, yb);
                Color::Rgb(b[0], b[1], b[2])
            } else {
                Color::Reset
            };
            if let Some(cell) = buf.cell_mut(Position::new(x as u16, y)) {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn clipped_render_stays_inside_clip() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 4));
        let clip = Rect::new(0, 0, 10, 4);
        let target = VirtualRect {
            x: -4,
            y: 0,
            width: 8,
            height: 4,
        };
        render_image_clipped(&image, target, clip, &mut buf);

        // Columns 0..4 carry the visible half of the image.
        assert_eq!(buf[(0, 0)].symbol(), "▀");
        assert_eq!(buf[(3, 0)].symbol(), "▀");
        assert_eq!(buf[(4, 0)].symbol(), " ");
        assert_eq!(buf[(12, 0)].symbol(), " ");
    }

    #[test]
    fn empty_area_draws_nothing() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        render_image(&image, Rect::new(0, 0, 0, 4), &mut buf);
        assert!(buf.content.iter().all(|cell| cell.symbol() == " "));
    }
}
