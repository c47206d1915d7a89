//! Core carousel logic – position mapping, the drag state machine,
//! selection sync, the strip engine and the image feed model.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The UI
//! state here is single-threaded (`Rc`/`RefCell`) and lives on the event
//! loop task.

pub mod drag;
pub mod engine;
pub mod feed;
pub mod listeners;
pub mod position;
pub mod scrubber;
pub mod strip;
pub mod sync;
pub mod window;
