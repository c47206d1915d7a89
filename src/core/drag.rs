//! Pointer-drag lifecycle for the scrubber track.
//!
//! ```text
//! Idle ──pointer_down──▶ Dragging ──pointer_up──────────▶ Idle (scroll_to once)
//!                          │  ▲
//!                          │  └─pointer_move (indicator only)
//!                          └──cancel / blur / hidden / unmount──▶ Idle (no scroll)
//! ```
//!
//! A drag owns a [`ListenerBundle`] of window-level routes for its whole
//! lifetime.  The bundle lives inside the `Dragging` phase, so leaving that
//! phase by any path releases every route exactly once.

use super::engine::CarouselEngine;
use super::position::{percentage_to_index, position_to_percentage, TrackBounds};
use super::window::{ListenerBundle, WindowEvent, WindowEventKind, WindowListeners};

/// Routes a drag listens to while active.
const DRAG_ROUTES: &[WindowEventKind] = &[
    WindowEventKind::PointerMove,
    WindowEventKind::PointerUp,
    WindowEventKind::PointerCancel,
    WindowEventKind::Blur,
    WindowEventKind::VisibilityChange,
];

/// Live drag state consumed by rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub active: bool,
    /// Pointer position along the track, `[0, 1]`.
    pub percentage: f64,
    /// Slide the pointer currently resolves to.
    pub index: Option<usize>,
}

/// Why a drag ended without navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    PointerCancel,
    Blur,
    Hidden,
    /// A new pointer-down arrived while a drag was still open.
    Replaced,
    Unmount,
}

/// What a single input did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Started { index: usize },
    Moved { index: usize },
    Committed { index: usize },
    Aborted(AbortReason),
    Ignored,
}

#[derive(Debug)]
struct DragSession {
    percentage: f64,
    index: usize,
    routes: ListenerBundle,
}

#[derive(Debug)]
enum DragPhase {
    Idle,
    Dragging(DragSession),
}

#[derive(Debug)]
pub struct DragController {
    window: WindowListeners,
    phase: DragPhase,
}

impl DragController {
    pub fn new(window: WindowListeners) -> Self {
        Self {
            window,
            phase: DragPhase::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn state(&self) -> DragState {
        match &self.phase {
            DragPhase::Idle => DragState::default(),
            DragPhase::Dragging(session) => DragState {
                active: true,
                percentage: session.percentage,
                index: Some(session.index),
            },
        }
    }

    /// Start a drag at `pointer_x`.  Inert when there are no images.
    pub fn pointer_down(
        &mut self,
        pointer_x: f64,
        bounds: TrackBounds,
        image_count: usize,
        engine: &dyn CarouselEngine,
    ) -> DragOutcome {
        if image_count == 0 {
            return DragOutcome::Ignored;
        }
        if self.is_dragging() {
            // Release the stale drag's routes before acquiring new ones.
            self.abort(AbortReason::Replaced);
        }

        let (percentage, index) = resolve(pointer_x, bounds, image_count, engine);
        let routes = self.window.acquire(DRAG_ROUTES);
        self.phase = DragPhase::Dragging(DragSession {
            percentage,
            index,
            routes,
        });
        tracing::debug!(index, percentage, "scrub started");
        DragOutcome::Started { index }
    }

    /// Feed a window-level event.  Anything arriving without a live route is
    /// ignored.
    pub fn handle(
        &mut self,
        event: WindowEvent,
        bounds: TrackBounds,
        image_count: usize,
        engine: &mut dyn CarouselEngine,
    ) -> DragOutcome {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return DragOutcome::Ignored;
        };
        if !session.routes.holds(event.kind()) {
            return DragOutcome::Ignored;
        }

        match event {
            WindowEvent::PointerMove { x } => {
                let (percentage, index) = resolve(x, bounds, image_count, engine);
                session.percentage = percentage;
                session.index = index;
                DragOutcome::Moved { index }
            }
            WindowEvent::PointerUp { x } => {
                let (_, index) = resolve(x, bounds, image_count, engine);
                self.phase = DragPhase::Idle;
                engine.scroll_to(index);
                tracing::debug!(index, "scrub committed");
                DragOutcome::Committed { index }
            }
            WindowEvent::PointerCancel => self.abort(AbortReason::PointerCancel),
            WindowEvent::Blur => self.abort(AbortReason::Blur),
            WindowEvent::VisibilityChange { hidden: true } => self.abort(AbortReason::Hidden),
            WindowEvent::VisibilityChange { hidden: false } => DragOutcome::Ignored,
        }
    }

    /// One-shot seek from a click on the track, without entering a drag.
    pub fn click(
        &mut self,
        pointer_x: f64,
        bounds: TrackBounds,
        image_count: usize,
        engine: &mut dyn CarouselEngine,
    ) -> Option<usize> {
        if image_count == 0 || self.is_dragging() {
            return None;
        }
        let (_, index) = resolve(pointer_x, bounds, image_count, engine);
        engine.scroll_to(index);
        tracing::debug!(index, "scrub click");
        Some(index)
    }

    /// Drop any drag in progress without navigating.
    pub fn teardown(&mut self) {
        if self.is_dragging() {
            self.abort(AbortReason::Unmount);
        }
    }

    fn abort(&mut self, reason: AbortReason) -> DragOutcome {
        self.phase = DragPhase::Idle;
        tracing::debug!(?reason, "scrub aborted");
        DragOutcome::Aborted(reason)
    }
}

fn resolve(
    pointer_x: f64,
    bounds: TrackBounds,
    image_count: usize,
    engine: &dyn CarouselEngine,
) -> (f64, usize) {
    let percentage = position_to_percentage(pointer_x, bounds);
    let index = percentage_to_index(percentage, engine.snap_positions(), image_count);
    (percentage, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::testing::RecordingEngine;

    const TRACK: TrackBounds = TrackBounds {
        left: 0.0,
        width: 100.0,
    };

    fn controller() -> (DragController, WindowListeners) {
        let window = WindowListeners::new();
        (DragController::new(window.clone()), window)
    }

    #[test]
    fn cancel_leaves_carousel_where_it_was() {
        let (mut drag, window) = controller();
        let mut engine = RecordingEngine::default();
        engine.selected = 2;

        drag.pointer_down(50.0, TRACK, 5, &engine);
        let moved = drag.handle(WindowEvent::PointerMove { x: 90.0 }, TRACK, 5, &mut engine);
        assert_eq!(moved, DragOutcome::Moved { index: 4 });
        assert_eq!(drag.state().index, Some(4));

        let outcome = drag.handle(WindowEvent::PointerCancel, TRACK, 5, &mut engine);
        assert_eq!(outcome, DragOutcome::Aborted(AbortReason::PointerCancel));
        assert!(engine.scroll_calls.is_empty());
        assert_eq!(engine.selected, 2);
        assert!(!drag.state().active);
        assert!(window.is_empty());
    }

    #[test]
    fn commit_scrolls_once_to_release_position() {
        let (mut drag, window) = controller();
        let mut engine = RecordingEngine::default();

        drag.pointer_down(0.0, TRACK, 5, &engine);
        drag.handle(WindowEvent::PointerMove { x: 30.0 }, TRACK, 5, &mut engine);
        drag.handle(WindowEvent::PointerMove { x: 80.0 }, TRACK, 5, &mut engine);
        assert!(engine.scroll_calls.is_empty());

        let outcome = drag.handle(WindowEvent::PointerUp { x: 55.0 }, TRACK, 5, &mut engine);
        assert_eq!(outcome, DragOutcome::Committed { index: 2 });
        assert_eq!(engine.scroll_calls, vec![2]);
        assert_eq!(drag.state(), DragState::default());
        assert!(window.is_empty());
    }

    #[test]
    fn events_after_commit_change_nothing() {
        let (mut drag, window) = controller();
        let mut engine = RecordingEngine::default();

        drag.pointer_down(10.0, TRACK, 5, &engine);
        drag.handle(WindowEvent::PointerUp { x: 10.0 }, TRACK, 5, &mut engine);
        assert!(!window.is_listening(WindowEventKind::PointerMove));

        let before = drag.state();
        for event in [
            WindowEvent::PointerMove { x: 99.0 },
            WindowEvent::PointerUp { x: 99.0 },
            WindowEvent::Blur,
        ] {
            assert_eq!(drag.handle(event, TRACK, 5, &mut engine), DragOutcome::Ignored);
        }
        assert_eq!(drag.state(), before);
        assert_eq!(engine.scroll_calls.len(), 1);
    }

    #[test]
    fn blur_and_hidden_abort_but_visible_does_not() {
        let (mut drag, window) = controller();
        let mut engine = RecordingEngine::default();

        drag.pointer_down(10.0, TRACK, 3, &engine);
        let visible = WindowEvent::VisibilityChange { hidden: false };
        assert_eq!(drag.handle(visible, TRACK, 3, &mut engine), DragOutcome::Ignored);
        assert!(drag.is_dragging());

        let hidden = WindowEvent::VisibilityChange { hidden: true };
        assert_eq!(
            drag.handle(hidden, TRACK, 3, &mut engine),
            DragOutcome::Aborted(AbortReason::Hidden)
        );
        assert!(window.is_empty());

        drag.pointer_down(10.0, TRACK, 3, &engine);
        assert_eq!(
            drag.handle(WindowEvent::Blur, TRACK, 3, &mut engine),
            DragOutcome::Aborted(AbortReason::Blur)
        );
        assert!(window.is_empty());
        assert!(engine.scroll_calls.is_empty());
    }

    #[test]
    fn second_pointer_down_replaces_routes_instead_of_stacking() {
        let (mut drag, window) = controller();
        let engine = RecordingEngine::default();

        drag.pointer_down(10.0, TRACK, 5, &engine);
        assert_eq!(window.len(), DRAG_ROUTES.len());
        drag.pointer_down(90.0, TRACK, 5, &engine);
        assert_eq!(window.len(), DRAG_ROUTES.len());
        assert_eq!(drag.state().index, Some(4));
    }

    #[test]
    fn teardown_and_drop_release_routes() {
        let (mut drag, window) = controller();
        let engine = RecordingEngine::default();

        drag.pointer_down(10.0, TRACK, 5, &engine);
        drag.teardown();
        assert!(window.is_empty());
        assert!(!drag.is_dragging());

        drag.pointer_down(10.0, TRACK, 5, &engine);
        drop(drag);
        assert!(window.is_empty());
    }

    #[test]
    fn no_images_means_no_drag_and_no_click() {
        let (mut drag, window) = controller();
        let mut engine = RecordingEngine::default();

        assert_eq!(drag.pointer_down(10.0, TRACK, 0, &engine), DragOutcome::Ignored);
        assert!(window.is_empty());
        assert_eq!(drag.click(10.0, TRACK, 0, &mut engine), None);
        assert!(engine.scroll_calls.is_empty());
    }

    #[test]
    fn click_seeks_without_activating() {
        let (mut drag, window) = controller();
        let mut engine = RecordingEngine::with_snaps(vec![0.0, 0.3, 0.6, 1.0]);

        assert_eq!(drag.click(46.0, TRACK, 4, &mut engine), Some(2));
        assert_eq!(engine.scroll_calls, vec![2]);
        assert!(!drag.state().active);
        assert!(window.is_empty());
    }

    #[test]
    fn drag_uses_engine_snaps_when_available() {
        let (mut drag, _window) = controller();
        let mut engine = RecordingEngine::with_snaps(vec![0.0, 0.1, 0.2, 1.0]);

        assert_eq!(
            drag.pointer_down(70.0, TRACK, 4, &engine),
            DragOutcome::Started { index: 3 }
        );
        drag.handle(WindowEvent::PointerUp { x: 12.0 }, TRACK, 4, &mut engine);
        assert_eq!(engine.scroll_calls, vec![1]);
    }
}
