//! Frame composition: draws every widget for the current state and records
//! the hit zones the mouse handler tests against.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::state::{ActiveView, AppState, FeedStatus, Focus, HitZones};
use crate::ui::layout::{AppLayout, NEXT_LABEL, PREV_LABEL};
use crate::ui::lightbox::LightboxWidget;
use crate::ui::scrubber::ScrubberWidget;
use crate::ui::spinner::LoadingIndicator;
use crate::ui::strip::StripWidget;
use crate::ui::theme::Theme;

const LOADING_TEXT: &str = "Loading images…";
const ERROR_TEXT: &str = "Error: Something went wrong";
const EMPTY_TEXT: &str = "No images available";

pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    let layout = AppLayout::from_area(area);
    let mut zones = HitZones {
        layout: Some(layout),
        ..HitZones::default()
    };

    match &state.feed_status {
        FeedStatus::Loading => {
            frame.render_widget(
                LoadingIndicator {
                    label: LOADING_TEXT,
                    tick: state.tick,
                },
                layout.strip_area,
            );
        }
        FeedStatus::Failed(_) => {
            centred_message(frame, layout.strip_area, ERROR_TEXT, true);
        }
        FeedStatus::Ready => {
            if state.images.is_empty() {
                centred_message(frame, layout.strip_area, EMPTY_TEXT, false);
            } else {
                zones.slides = StripWidget {
                    engine: &state.engine,
                    thumbnails: &state.thumbnails,
                    failed: &state.failed_images,
                    scroll_offset: state.strip_scroll.offset(),
                    selected: state.scrubber.selected_index(),
                    focused: state.focus == Focus::Strip,
                }
                .render_and_hit(layout.strip_area, frame.buffer_mut());

                frame.render_widget(
                    Paragraph::new(Span::styled(PREV_LABEL, Theme::button_style())),
                    layout.prev_button,
                );
                frame.render_widget(
                    Paragraph::new(Span::styled(NEXT_LABEL, Theme::button_style())),
                    layout.next_button,
                );
            }

            zones.track = ScrubberWidget {
                scrubber: &state.scrubber,
                focused: state.focus == Focus::Scrubber,
            }
            .render_and_hit(layout.scrubber_area, frame.buffer_mut());
        }
    }

    let status = Paragraph::new(status_text(state)).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    if state.active_view == ActiveView::Lightbox {
        if let Some(location) = state.images.get(state.lightbox_index) {
            let index = state.lightbox_index;
            zones.lightbox = Some(
                LightboxWidget {
                    location,
                    position: index + 1,
                    total: state.images.len(),
                    image: state.thumbnails.get(&index).map(|image| &**image),
                    failed: state.failed_images.contains(&index),
                }
                .render_and_hit(area, frame.buffer_mut()),
            );
        }
    }

    state.hit_zones = zones;
}

fn status_text(state: &AppState) -> String {
    if state.active_view == ActiveView::Lightbox {
        return "Esc: close".to_string();
    }
    if let FeedStatus::Failed(reason) = &state.feed_status {
        return format!("{reason} | r: retry");
    }
    match state.focus {
        Focus::Scrubber => format!(
            "{} | ←/→/Space/Home/End: seek | Tab: focus strip",
            state.scrubber.semantics().label
        ),
        Focus::Strip => state.config.status_bar_hint(),
    }
}

fn centred_message(frame: &mut Frame, area: Rect, text: &str, error: bool) {
    if area.height == 0 {
        return;
    }
    let style = if error {
        Theme::error_style()
    } else {
        Theme::placeholder_style()
    };
    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style))).centered(),
        row,
    );
}
