//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No network or filesystem I/O happens here.

pub mod halfblocks;
pub mod layout;
pub mod lightbox;
pub mod scrubber;
pub mod smooth_scroll;
pub mod spinner;
pub mod strip;
pub mod theme;
