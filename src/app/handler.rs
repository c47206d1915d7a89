//! Input handling: maps key/mouse/window events to state mutations.
//!
//! Pointer moves and releases are forwarded to the scrubber only while it
//! holds the matching window routes; that is what lets a drag keep tracking
//! after the pointer leaves the track.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::config::Action;
use crate::core::engine::CarouselEngine;
use crate::core::position::TrackBounds;
use crate::core::scrubber::{KeyOutcome, ScrubKey};
use crate::core::window::{WindowEvent, WindowEventKind};
use crate::ui::layout::AppLayout;
use crate::ui::strip::{slide_width, DEFAULT_ASPECT, SLIDE_GAP};

use super::state::{ActiveView, AppState, FeedStatus, Focus};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Carousel => handle_carousel_key(state, key),
        ActiveView::Lightbox => handle_lightbox_key(state, key),
    }
}

// ── Carousel view ───────────────────────────────────────────────

fn handle_carousel_key(state: &mut AppState, key: KeyEvent) {
    // Esc while dragging behaves like a cancelled pointer.
    if key.code == KeyCode::Esc && state.window.is_listening(WindowEventKind::PointerCancel) {
        dispatch_window_event(state, WindowEvent::PointerCancel);
        return;
    }

    if state.focus == Focus::Scrubber && key.modifiers.is_empty() {
        if let Some(scrub_key) = scrub_key(key.code) {
            if let KeyOutcome::Navigated(_) = state.scrubber.key(scrub_key, &mut state.engine) {
                return;
            }
        }
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::Prev => state.engine.scroll_prev(),
        Action::Next => state.engine.scroll_next(),
        Action::CycleFocus => state.focus = state.focus.cycle(),
        Action::OpenLightbox => {
            if state.focus == Focus::Strip && !state.images.is_empty() {
                let index = state.scrubber.selected_index();
                open_lightbox(state, index);
            }
        }
        Action::Reload => state.request_reload(),
    }
}

fn scrub_key(code: KeyCode) -> Option<ScrubKey> {
    match code {
        KeyCode::Left => Some(ScrubKey::Left),
        KeyCode::Right => Some(ScrubKey::Right),
        KeyCode::Char(' ') => Some(ScrubKey::Space),
        KeyCode::Home => Some(ScrubKey::Home),
        KeyCode::End => Some(ScrubKey::End),
        _ => None,
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view == ActiveView::Lightbox {
        handle_lightbox_mouse(state, mouse);
        return;
    }

    let x = pointer_x(mouse.column);
    match mouse.kind {
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            if state.window.is_listening(WindowEventKind::PointerMove) {
                dispatch_window_event(state, WindowEvent::PointerMove { x });
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if state.window.is_listening(WindowEventKind::PointerUp) {
                dispatch_window_event(state, WindowEvent::PointerUp { x });
            }
        }
        MouseEventKind::Down(MouseButton::Left) => handle_left_down(state, mouse),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
            if on_strip(state, mouse) {
                state.engine.scroll_prev();
            }
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
            if on_strip(state, mouse) {
                state.engine.scroll_next();
            }
        }
        _ => {}
    }
}

fn handle_left_down(state: &mut AppState, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);

    if point_in_rect(state.hit_zones.track, col, row) {
        state.focus = Focus::Scrubber;
        let bounds = track_bounds(state.hit_zones.track);
        let x = pointer_x(col);
        if state.config.scrub_on_drag {
            state.scrubber.pointer_down(x, bounds, &state.engine);
        } else {
            state.scrubber.click(x, bounds, &mut state.engine);
        }
        return;
    }

    if let Some(layout) = state.hit_zones.layout {
        if !state.images.is_empty() {
            if point_in_rect(layout.prev_button, col, row) {
                state.engine.scroll_prev();
                return;
            }
            if point_in_rect(layout.next_button, col, row) {
                state.engine.scroll_next();
                return;
            }
        }
    }

    let clicked = state
        .hit_zones
        .slides
        .iter()
        .find(|hit| point_in_rect(hit.rect, col, row))
        .map(|hit| hit.index);
    if let Some(index) = clicked {
        state.focus = Focus::Strip;
        state.engine.scroll_to(index);
        open_lightbox(state, index);
    }
}

fn on_strip(state: &AppState, mouse: MouseEvent) -> bool {
    state
        .hit_zones
        .layout
        .is_some_and(|layout| point_in_rect(layout.strip_area, mouse.column, mouse.row))
}

// ── Window-level events ─────────────────────────────────────────

/// The terminal lost focus.
pub fn handle_focus_lost(state: &mut AppState) {
    dispatch_window_event(state, WindowEvent::Blur);
}

/// A zero-sized terminal counts as hidden.
pub fn handle_resize(state: &mut AppState, width: u16, height: u16) {
    state.terminal_area = Rect::new(0, 0, width, height);
    let hidden = width == 0 || height == 0;
    dispatch_window_event(state, WindowEvent::VisibilityChange { hidden });
}

fn dispatch_window_event(state: &mut AppState, event: WindowEvent) {
    let bounds = track_bounds(state.hit_zones.track);
    state.scrubber.window_event(event, bounds, &mut state.engine);
}

// ── Lightbox ────────────────────────────────────────────────────

/// The overlay takes every mouse event, so a live drag would never see its
/// release; abort it first.
fn open_lightbox(state: &mut AppState, index: usize) {
    if state.window.is_listening(WindowEventKind::PointerCancel) {
        dispatch_window_event(state, WindowEvent::PointerCancel);
    }
    state.lightbox_index = index;
    state.lightbox_return_focus = state.focus;
    state.active_view = ActiveView::Lightbox;
}

fn close_lightbox(state: &mut AppState) {
    state.active_view = ActiveView::Carousel;
    state.focus = state.lightbox_return_focus;
}

/// Every key is swallowed while the lightbox is open.
fn handle_lightbox_key(state: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x')) {
        close_lightbox(state);
    }
}

fn handle_lightbox_mouse(state: &mut AppState, mouse: MouseEvent) {
    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
        return;
    };
    let Some(zones) = state.hit_zones.lightbox else {
        close_lightbox(state);
        return;
    };
    if point_in_rect(zones.close_rect, mouse.column, mouse.row)
        || !point_in_rect(zones.frame_rect, mouse.column, mouse.row)
    {
        close_lightbox(state);
    }
}

// ── Layout ──────────────────────────────────────────────────────

/// Lay the strip out for the current terminal size and image set, then aim
/// the smooth scroll at the selected slide.  Call before every draw.
pub fn sync_layout(state: &mut AppState) {
    if state.feed_status != FeedStatus::Ready || state.images.is_empty() {
        return;
    }
    let layout = AppLayout::from_area(state.terminal_area);
    let strip = layout.strip_area;
    if strip.width == 0 || strip.height < 2 {
        return;
    }

    let image_rows = strip.height - 1;
    let widths: Vec<u16> = (0..state.images.len())
        .map(|index| {
            let aspect = state
                .thumbnails
                .get(&index)
                .map(|image| f64::from(image.width()) / f64::from(image.height().max(1)))
                .unwrap_or(DEFAULT_ASPECT);
            slide_width(aspect, image_rows, strip.width)
        })
        .collect();
    state.engine.reinit(&widths, SLIDE_GAP, strip.width);

    let target = state.engine.scroll_offset(state.scrubber.selected_index());
    state.strip_scroll.set_target(target);
}

// ── helpers ─────────────────────────────────────────────────────

fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    area.contains(Position::new(col, row))
}

/// Cell centre, so a press on the last column maps inside the track.
fn pointer_x(column: u16) -> f64 {
    f64::from(column) + 0.5
}

fn track_bounds(track: Rect) -> TrackBounds {
    TrackBounds::new(f64::from(track.x), f64::from(track.width))
}
