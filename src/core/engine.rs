//! The carousel engine seam.
//!
//! The scrubber never assumes a particular carousel implementation; it only
//! needs snap positions, the settled index, programmatic scrolling and a
//! selection-changed notification.

use super::listeners::Subscription;

/// Capabilities a carousel backend must expose to the scrubber.
pub trait CarouselEngine {
    /// Currently settled slide index.
    fn selected_index(&self) -> usize;

    /// One normalised [0,1] position per slide, non-decreasing.  Empty until
    /// the engine has been laid out.
    fn snap_positions(&self) -> &[f64];

    /// Request navigation to `index`.  Ignored before initialisation.
    fn scroll_to(&mut self, index: usize);

    fn scroll_prev(&mut self);

    fn scroll_next(&mut self);

    /// Register `listener` to receive the new settled index whenever it
    /// changes, for any reason.
    fn on_selection_changed(&mut self, listener: Box<dyn FnMut(usize)>) -> Subscription;
}
