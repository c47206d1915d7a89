//! Full-screen image lightbox overlay.
//!
//! Renders one image large, centred on the terminal, with a close button in
//! the top-right corner of the frame.  Clicks outside the frame close it.

use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::halfblocks::render_image;
use super::theme::Theme;

/// The lightbox overlay widget.
pub struct LightboxWidget<'a> {
    /// Image location, shown in the title.
    pub location: &'a str,
    /// 1-based position and total, for the title.
    pub position: usize,
    pub total: usize,
    /// Decoded image, if it has arrived.
    pub image: Option<&'a RgbaImage>,
    /// The image failed to load.
    pub failed: bool,
}

/// Clickable regions returned after rendering, for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxHitZones {
    pub close_rect: Rect,
    /// The framed overlay; a click outside it dismisses the lightbox.
    pub frame_rect: Rect,
}

impl LightboxWidget<'_> {
    /// Compute the overlay area (centred, 80% of terminal).
    pub fn overlay_area(terminal: Rect) -> Rect {
        let margin_x = (terminal.width as f32 * 0.1).round() as u16;
        let margin_y = (terminal.height as f32 * 0.1).round() as u16;
        Rect::new(
            terminal.x + margin_x,
            terminal.y + margin_y,
            terminal.width.saturating_sub(margin_x * 2).max(20),
            terminal.height.saturating_sub(margin_y * 2).max(8),
        )
        .intersection(terminal)
    }

    /// Render and return hit zones for mouse interaction.
    pub fn render_and_hit(self, terminal_area: Rect, buf: &mut Buffer) -> LightboxHitZones {
        let area = Self::overlay_area(terminal_area);

        Clear.render(area, buf);

        let title = format!(" {} — {}/{} ", file_name(self.location), self.position, self.total);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::lightbox_border_style())
            .title(Span::styled(title, Theme::title_style().add_modifier(Modifier::BOLD)));

        let inner = block.inner(area);
        block.render(area, buf);

        // Close button [X] on the top-right corner of the border.
        let close_rect = Rect::new(area.x + area.width.saturating_sub(5), area.y, 3, 1)
            .intersection(area);
        Paragraph::new(Line::from(Span::styled("[X]", Theme::close_button_style())))
            .render(close_rect, buf);

        let img_area = Rect::new(
            inner.x.saturating_add(1),
            inner.y,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(1), // leave 1 row for footer
        );
        match self.image {
            Some(image) if img_area.width > 2 && img_area.height > 1 => {
                render_image(image, img_area, buf);
            }
            Some(_) => {}
            None => {
                let message = if self.failed {
                    "Image unavailable"
                } else {
                    "Loading…"
                };
                let width = message.chars().count() as u16;
                let x = inner.x + inner.width.saturating_sub(width) / 2;
                let y = inner.y + inner.height / 2;
                buf.set_line(
                    x,
                    y,
                    &Line::from(Span::styled(message, Theme::placeholder_style())),
                    inner.width,
                );
            }
        }

        let footer = Line::from(Span::styled(" Esc / x / click outside: close ", Theme::placeholder_style()));
        let footer_y = inner.y + inner.height.saturating_sub(1);
        Paragraph::new(footer).render(Rect::new(inner.x, footer_y, inner.width, 1), buf);

        LightboxHitZones {
            close_rect,
            frame_rect: area,
        }
    }
}

/// Last path segment of a URL or path.
pub fn file_name(location: &str) -> &str {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_takes_the_middle_eighty_percent() {
        let area = LightboxWidget::overlay_area(Rect::new(0, 0, 100, 50));
        assert_eq!(area, Rect::new(10, 5, 80, 40));
    }

    #[test]
    fn renders_title_and_close_button() {
        let terminal = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(terminal);
        let zones = LightboxWidget {
            location: "https://images.dog.ceo/breeds/whippet/n02091134_1.jpg",
            position: 2,
            total: 9,
            image: None,
            failed: false,
        }
        .render_and_hit(terminal, &mut buf);

        let top: String = (0..60).map(|x| buf[(x, zones.frame_rect.y)].symbol().to_string()).collect();
        assert!(top.contains("n02091134_1.jpg — 2/9"));
        assert!(top.contains("[X]"));
        assert_eq!(zones.close_rect.width, 3);
        assert!(zones.frame_rect.contains(zones.close_rect.as_position()));
    }

    #[test]
    fn file_name_takes_last_segment() {
        assert_eq!(file_name("https://a/b/c.jpg"), "c.jpg");
        assert_eq!(file_name("plain.png"), "plain.png");
    }
}
