//! Window-level event routes.
//!
//! A drag needs pointer and focus events from the whole window, not just the
//! scrubber track.  Routes are acquired as one [`ListenerBundle`] and
//! released as one when the bundle drops, so there is no way to register a
//! kind twice or to leave one behind.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Event kinds that can be routed window-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    PointerMove,
    PointerUp,
    PointerCancel,
    Blur,
    VisibilityChange,
}

/// A window-level event, already translated out of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    PointerMove { x: f64 },
    PointerUp { x: f64 },
    PointerCancel,
    Blur,
    VisibilityChange { hidden: bool },
}

impl WindowEvent {
    pub fn kind(&self) -> WindowEventKind {
        match self {
            Self::PointerMove { .. } => WindowEventKind::PointerMove,
            Self::PointerUp { .. } => WindowEventKind::PointerUp,
            Self::PointerCancel => WindowEventKind::PointerCancel,
            Self::Blur => WindowEventKind::Blur,
            Self::VisibilityChange { .. } => WindowEventKind::VisibilityChange,
        }
    }
}

#[derive(Debug, Default)]
struct Routes {
    next_bundle: u64,
    /// (bundle id, kind) pairs currently registered.
    active: Vec<(u64, WindowEventKind)>,
}

/// Shared routing table for window-level events.  Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct WindowListeners {
    routes: Rc<RefCell<Routes>>,
}

impl WindowListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every kind in `kinds` under one bundle.
    pub fn acquire(&self, kinds: &[WindowEventKind]) -> ListenerBundle {
        let mut routes = self.routes.borrow_mut();
        let id = routes.next_bundle;
        routes.next_bundle += 1;
        for &kind in kinds {
            if !routes.active.iter().any(|&(b, k)| b == id && k == kind) {
                routes.active.push((id, kind));
            }
        }
        tracing::trace!(bundle = id, kinds = kinds.len(), "window listeners acquired");
        ListenerBundle {
            id,
            routes: Rc::downgrade(&self.routes),
        }
    }

    /// Whether anything is currently listening for `kind`.
    pub fn is_listening(&self, kind: WindowEventKind) -> bool {
        self.routes.borrow().active.iter().any(|&(_, k)| k == kind)
    }

    /// Total number of registered routes across all bundles.
    pub fn len(&self) -> usize {
        self.routes.borrow().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Routes held for the lifetime of one drag.  Dropping releases them all.
#[derive(Debug)]
#[must_use = "dropping a ListenerBundle releases its routes immediately"]
pub struct ListenerBundle {
    id: u64,
    routes: Weak<RefCell<Routes>>,
}

impl ListenerBundle {
    pub fn holds(&self, kind: WindowEventKind) -> bool {
        self.routes.upgrade().is_some_and(|routes| {
            routes
                .borrow()
                .active
                .iter()
                .any(|&(b, k)| b == self.id && k == kind)
        })
    }
}

impl Drop for ListenerBundle {
    fn drop(&mut self) {
        if let Some(routes) = self.routes.upgrade() {
            let id = self.id;
            routes.borrow_mut().active.retain(|&(b, _)| b != id);
            tracing::trace!(bundle = id, "window listeners released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAG_KINDS: &[WindowEventKind] = &[
        WindowEventKind::PointerMove,
        WindowEventKind::PointerUp,
        WindowEventKind::PointerCancel,
        WindowEventKind::Blur,
        WindowEventKind::VisibilityChange,
    ];

    #[test]
    fn bundle_registers_and_releases_together() {
        let window = WindowListeners::new();
        let bundle = window.acquire(DRAG_KINDS);
        assert_eq!(window.len(), 5);
        assert!(window.is_listening(WindowEventKind::Blur));
        assert!(bundle.holds(WindowEventKind::PointerUp));

        drop(bundle);
        assert!(window.is_empty());
        assert!(!window.is_listening(WindowEventKind::PointerMove));
    }

    #[test]
    fn duplicate_kinds_in_one_request_register_once() {
        let window = WindowListeners::new();
        let _bundle = window.acquire(&[WindowEventKind::Blur, WindowEventKind::Blur]);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn releasing_one_bundle_keeps_another() {
        let window = WindowListeners::new();
        let first = window.acquire(DRAG_KINDS);
        let second = window.acquire(&[WindowEventKind::Blur]);
        drop(first);
        assert_eq!(window.len(), 1);
        assert!(second.holds(WindowEventKind::Blur));
        assert!(!window.is_listening(WindowEventKind::PointerMove));
    }
}
