//! The progress scrubber: input handlers and the values it renders.
//!
//! Ties together the position mapper, the drag controller and the selection
//! mirror for one carousel.  Rendering reads the drag state while a drag is
//! active and the mirrored selection otherwise.

use super::drag::{DragController, DragOutcome, DragState};
use super::engine::CarouselEngine;
use super::position::TrackBounds;
use super::sync::SelectionSync;
use super::window::{WindowEvent, WindowListeners};

/// Keys the scrubber responds to when focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubKey {
    Left,
    Right,
    Space,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// `scroll_to(target)` was issued and the key is consumed.
    Navigated(usize),
    Ignored,
}

/// Assistive description of the scrubber, slider-style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderSemantics {
    pub role: &'static str,
    pub value_min: u8,
    pub value_max: u8,
    pub value_now: u8,
    pub label: String,
}

#[derive(Debug)]
pub struct Scrubber {
    image_count: usize,
    drag: DragController,
    sync: SelectionSync,
}

impl Scrubber {
    pub fn mount(
        image_count: usize,
        engine: &mut dyn CarouselEngine,
        window: WindowListeners,
    ) -> Self {
        Self {
            image_count,
            drag: DragController::new(window),
            sync: SelectionSync::attach(engine),
        }
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    /// Settled index, kept inside the current image range.
    pub fn selected_index(&self) -> usize {
        self.sync
            .selected_index()
            .min(self.image_count.saturating_sub(1))
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Fill width in percent, `[0, 100]`.
    pub fn displayed_percentage(&self) -> f64 {
        if self.image_count == 0 {
            return 0.0;
        }
        let drag = self.drag.state();
        let percent = if drag.active {
            drag.percentage * 100.0
        } else {
            (self.selected_index() + 1) as f64 / self.image_count as f64 * 100.0
        };
        percent.clamp(0.0, 100.0)
    }

    /// Position label, e.g. `"3 / 12"`.
    pub fn displayed_count(&self) -> String {
        if self.image_count == 0 {
            return "0 / 0".to_string();
        }
        let drag = self.drag.state();
        let position = match drag.index {
            Some(index) if drag.active => index + 1,
            _ => self.selected_index() + 1,
        };
        format!("{position} / {}", self.image_count)
    }

    pub fn semantics(&self) -> SliderSemantics {
        let label = if self.image_count == 0 {
            "Image progress: 0 of 0".to_string()
        } else {
            format!(
                "Image progress: {} of {}",
                self.selected_index() + 1,
                self.image_count
            )
        };
        SliderSemantics {
            role: "slider",
            value_min: 0,
            value_max: 100,
            value_now: self.displayed_percentage().round() as u8,
            label,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn pointer_down(
        &mut self,
        pointer_x: f64,
        bounds: TrackBounds,
        engine: &dyn CarouselEngine,
    ) -> DragOutcome {
        self.drag
            .pointer_down(pointer_x, bounds, self.image_count, engine)
    }

    pub fn window_event(
        &mut self,
        event: WindowEvent,
        bounds: TrackBounds,
        engine: &mut dyn CarouselEngine,
    ) -> DragOutcome {
        self.drag.handle(event, bounds, self.image_count, engine)
    }

    pub fn click(
        &mut self,
        pointer_x: f64,
        bounds: TrackBounds,
        engine: &mut dyn CarouselEngine,
    ) -> Option<usize> {
        self.drag.click(pointer_x, bounds, self.image_count, engine)
    }

    /// Keyboard stepping.  Each handled key issues exactly one `scroll_to`.
    pub fn key(&mut self, key: ScrubKey, engine: &mut dyn CarouselEngine) -> KeyOutcome {
        if self.image_count == 0 {
            return KeyOutcome::Ignored;
        }
        let last = self.image_count - 1;
        let current = self.selected_index();
        let target = match key {
            ScrubKey::Left => current.saturating_sub(1),
            ScrubKey::Right | ScrubKey::Space => (current + 1).min(last),
            ScrubKey::Home => 0,
            ScrubKey::End => last,
        };
        engine.scroll_to(target);
        KeyOutcome::Navigated(target)
    }

    /// Abort any drag and release everything held for this carousel.
    pub fn unmount(mut self) {
        self.drag.teardown();
    }
}
