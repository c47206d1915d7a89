//! Application orchestration: state management, event loop plumbing,
//! background fetches and input handling.

pub mod event;
pub mod fetch_runtime;
pub mod handler;
pub mod render;
pub mod state;
