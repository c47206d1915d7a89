//! Mirror of the engine's settled index.
//!
//! The engine's selection notification is the only writer of the mirrored
//! value.  Neither the drag controller nor the view touches it; a committed
//! drag shows up here only once the engine reports it.

use std::cell::Cell;
use std::rc::Rc;

use super::engine::CarouselEngine;
use super::listeners::Subscription;

#[derive(Debug)]
pub struct SelectionSync {
    selected: Rc<Cell<usize>>,
    _subscription: Subscription,
}

impl SelectionSync {
    /// Subscribe to `engine`, then read its current index once so an engine
    /// that was already scrolled is picked up immediately.
    pub fn attach(engine: &mut dyn CarouselEngine) -> Self {
        let selected = Rc::new(Cell::new(0));
        let sink = Rc::clone(&selected);
        let subscription = engine.on_selection_changed(Box::new(move |index| sink.set(index)));
        selected.set(engine.selected_index());
        Self {
            selected,
            _subscription: subscription,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::testing::RecordingEngine;

    #[test]
    fn picks_up_initial_index() {
        let mut engine = RecordingEngine::default();
        engine.selected = 3;
        let sync = SelectionSync::attach(&mut engine);
        assert_eq!(sync.selected_index(), 3);
    }

    #[test]
    fn follows_engine_notifications() {
        let mut engine = RecordingEngine::default();
        let sync = SelectionSync::attach(&mut engine);
        engine.settle(4);
        assert_eq!(sync.selected_index(), 4);
        engine.settle(1);
        assert_eq!(sync.selected_index(), 1);
    }

    #[test]
    fn scroll_request_alone_does_not_move_mirror() {
        let mut engine = RecordingEngine::default();
        let sync = SelectionSync::attach(&mut engine);
        engine.scroll_to(2);
        assert_eq!(sync.selected_index(), 0);
    }

    #[test]
    fn dropping_sync_unsubscribes() {
        let mut engine = RecordingEngine::default();
        let sync = SelectionSync::attach(&mut engine);
        assert_eq!(engine.listener_count(), 1);
        drop(sync);
        assert_eq!(engine.listener_count(), 0);
    }
}
