//! Terminal carousel engine: a horizontal strip of variable-width slides.
//!
//! Slides are laid out left to right with a fixed gap and the selected slide
//! is centred in the viewport.  Each slide's snap position is the normalised
//! scroll offset that centres it, so slides of different widths produce
//! unevenly spaced snaps.
//!
//! Selection changes are not announced inline: `scroll_to` and friends only
//! record the change, and [`StripEngine::flush`] delivers it on the next turn
//! of the event loop.

use super::engine::CarouselEngine;
use super::listeners::{Listeners, Subscription};

/// Behaviour knobs.
#[derive(Debug, Clone, Copy)]
pub struct StripOptions {
    /// Wrap around at either end when stepping with prev/next.
    pub loop_slides: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self { loop_slides: true }
    }
}

#[derive(Debug)]
pub struct StripEngine {
    options: StripOptions,
    slide_widths: Vec<u16>,
    gap: u16,
    viewport_width: u16,
    /// Left edge of each slide, in columns from the start of the track.
    slide_lefts: Vec<f64>,
    /// Scroll offset that centres each slide in the viewport.
    scroll_offsets: Vec<f64>,
    snaps: Vec<f64>,
    selected: usize,
    /// A selection change is waiting to be announced.
    pending: bool,
    listeners: Listeners<usize>,
}

impl StripEngine {
    pub fn new(options: StripOptions) -> Self {
        Self {
            options,
            slide_widths: Vec::new(),
            gap: 0,
            viewport_width: 0,
            slide_lefts: Vec::new(),
            scroll_offsets: Vec::new(),
            snaps: Vec::new(),
            selected: 0,
            pending: false,
            listeners: Listeners::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.slide_widths.is_empty() && self.viewport_width > 0
    }

    pub fn slide_count(&self) -> usize {
        self.slide_widths.len()
    }

    pub fn slide_left(&self, index: usize) -> Option<f64> {
        self.slide_lefts.get(index).copied()
    }

    pub fn slide_width(&self, index: usize) -> Option<u16> {
        self.slide_widths.get(index).copied()
    }

    /// Column offset that centres slide `index`; 0 before initialisation.
    pub fn scroll_offset(&self, index: usize) -> f64 {
        self.scroll_offsets.get(index).copied().unwrap_or(0.0)
    }

    /// Lay the strip out again.  Cheap no-op when nothing changed.
    pub fn reinit(&mut self, slide_widths: &[u16], gap: u16, viewport_width: u16) {
        if self.slide_widths == slide_widths
            && self.gap == gap
            && self.viewport_width == viewport_width
        {
            return;
        }

        self.slide_widths = slide_widths.to_vec();
        self.gap = gap;
        self.viewport_width = viewport_width;

        self.slide_lefts.clear();
        self.scroll_offsets.clear();
        let half_viewport = f64::from(viewport_width) / 2.0;
        let mut left = 0.0;
        for &width in slide_widths {
            self.slide_lefts.push(left);
            self.scroll_offsets
                .push(left + f64::from(width) / 2.0 - half_viewport);
            left += f64::from(width) + f64::from(gap);
        }

        self.snaps = normalised_snaps(&self.scroll_offsets);

        if self.is_initialized() {
            let clamped = self.selected.min(self.slide_widths.len() - 1);
            self.select(clamped);
        }

        tracing::debug!(
            slides = self.slide_widths.len(),
            viewport = viewport_width,
            "strip engine laid out"
        );
    }

    /// Forget every slide; the engine is uninitialised until the next
    /// `reinit`.
    pub fn reset(&mut self) {
        self.slide_widths.clear();
        self.slide_lefts.clear();
        self.scroll_offsets.clear();
        self.snaps.clear();
        self.viewport_width = 0;
        self.select(0);
    }

    /// Announce a pending selection change, if any.
    ///
    /// Returns whether a notification went out.
    pub fn flush(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        let index = self.selected;
        tracing::trace!(index, "selection changed");
        self.listeners.emit(&index);
        true
    }

    fn select(&mut self, index: usize) {
        if index != self.selected {
            self.selected = index;
            self.pending = true;
        }
    }
}

impl Default for StripEngine {
    fn default() -> Self {
        Self::new(StripOptions::default())
    }
}

impl CarouselEngine for StripEngine {
    fn selected_index(&self) -> usize {
        self.selected
    }

    fn snap_positions(&self) -> &[f64] {
        &self.snaps
    }

    fn scroll_to(&mut self, index: usize) {
        if !self.is_initialized() {
            tracing::trace!(index, "scroll_to before layout ignored");
            return;
        }
        let last = self.slide_widths.len() - 1;
        self.select(index.min(last));
    }

    fn scroll_prev(&mut self) {
        if !self.is_initialized() {
            return;
        }
        let last = self.slide_widths.len() - 1;
        let target = match self.selected {
            0 if self.options.loop_slides => last,
            0 => 0,
            n => n - 1,
        };
        self.select(target);
    }

    fn scroll_next(&mut self) {
        if !self.is_initialized() {
            return;
        }
        let last = self.slide_widths.len() - 1;
        let target = if self.selected >= last {
            if self.options.loop_slides {
                0
            } else {
                last
            }
        } else {
            self.selected + 1
        };
        self.select(target);
    }

    fn on_selection_changed(&mut self, mut listener: Box<dyn FnMut(usize)>) -> Subscription {
        self.listeners.subscribe(move |index: &usize| listener(*index))
    }
}

/// Map per-slide scroll offsets onto [0,1].
fn normalised_snaps(offsets: &[f64]) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (offsets.first(), offsets.last()) else {
        return Vec::new();
    };
    let span = last - first;
    if span <= 0.0 {
        return vec![0.0; offsets.len()];
    }
    offsets
        .iter()
        .map(|offset| ((offset - first) / span).clamp(0.0, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn laid_out(widths: &[u16], loop_slides: bool) -> StripEngine {
        let mut engine = StripEngine::new(StripOptions { loop_slides });
        engine.reinit(widths, 2, 40);
        engine.flush();
        engine
    }

    fn record(engine: &mut StripEngine) -> (Rc<RefCell<Vec<usize>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = engine.on_selection_changed(Box::new(move |i| sink.borrow_mut().push(i)));
        (seen, sub)
    }

    #[test]
    fn uninitialised_engine_has_no_snaps_and_ignores_scrolls() {
        let mut engine = StripEngine::default();
        let (seen, _sub) = record(&mut engine);
        assert!(engine.snap_positions().is_empty());
        engine.scroll_to(3);
        engine.scroll_next();
        assert!(!engine.flush());
        assert_eq!(engine.selected_index(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn variable_widths_give_uneven_snaps() {
        let engine = laid_out(&[10, 30, 10, 20], true);
        let snaps = engine.snap_positions();
        assert_eq!(snaps.len(), 4);
        assert_eq!(snaps[0], 0.0);
        assert_eq!(snaps[3], 1.0);
        // Centring offsets: -15, 7, 29, 46 → span 61.
        assert!((snaps[1] - 22.0 / 61.0).abs() < 1e-12);
        assert!((snaps[2] - 44.0 / 61.0).abs() < 1e-12);
        assert!(snaps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn single_slide_snaps_to_start() {
        let engine = laid_out(&[12], true);
        assert_eq!(engine.snap_positions(), &[0.0]);
    }

    #[test]
    fn notifications_wait_for_flush() {
        let mut engine = laid_out(&[10, 10, 10], true);
        let (seen, _sub) = record(&mut engine);

        engine.scroll_to(2);
        assert_eq!(engine.selected_index(), 2);
        assert!(seen.borrow().is_empty());

        assert!(engine.flush());
        assert_eq!(*seen.borrow(), vec![2]);
        assert!(!engine.flush());

        engine.scroll_to(2);
        assert!(!engine.flush());
    }

    #[test]
    fn scroll_to_clamps_to_last_slide() {
        let mut engine = laid_out(&[10, 10, 10], true);
        engine.scroll_to(99);
        assert_eq!(engine.selected_index(), 2);
    }

    #[test]
    fn stepping_wraps_only_when_looping() {
        let mut looping = laid_out(&[10, 10, 10], true);
        looping.scroll_prev();
        assert_eq!(looping.selected_index(), 2);
        looping.scroll_next();
        assert_eq!(looping.selected_index(), 0);

        let mut bounded = laid_out(&[10, 10, 10], false);
        bounded.scroll_prev();
        assert_eq!(bounded.selected_index(), 0);
        assert!(!bounded.flush());
        bounded.scroll_to(2);
        bounded.scroll_next();
        assert_eq!(bounded.selected_index(), 2);
    }

    #[test]
    fn shrinking_layout_clamps_selection_and_notifies() {
        let mut engine = laid_out(&[10, 10, 10, 10], true);
        engine.scroll_to(3);
        engine.flush();
        let (seen, _sub) = record(&mut engine);

        engine.reinit(&[10, 10], 2, 40);
        assert_eq!(engine.selected_index(), 1);
        engine.flush();
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let mut engine = laid_out(&[10, 10], true);
        let (seen, sub) = record(&mut engine);
        drop(sub);
        engine.scroll_to(1);
        engine.flush();
        assert!(seen.borrow().is_empty());
    }
}
