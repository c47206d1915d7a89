//! Callback registry with scoped subscriptions.
//!
//! `subscribe` hands back a [`Subscription`]; dropping it (or calling
//! [`Subscription::unsubscribe`]) removes the callback.  Removal runs at most
//! once per subscription, whichever happens first.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Registry<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

/// A set of callbacks notified with `&E`.
pub struct Listeners<E> {
    inner: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            let callback: Callback<E> = Rc::new(RefCell::new(callback));
            registry.entries.push((id, callback));
            id
        };

        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().entries.retain(|(eid, _)| *eid != id);
                }
            })),
        }
    }

    /// Call every registered callback.
    ///
    /// Works from a snapshot so callbacks may subscribe or unsubscribe while
    /// being notified; a callback removed mid-emit is not called afterwards.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Callback<E>)> = self.inner.borrow().entries.clone();
        for (id, callback) in snapshot {
            let still_registered = self.inner.borrow().entries.iter().any(|(eid, _)| *eid == id);
            if still_registered {
                let mut callback = callback.borrow_mut();
                (&mut *callback)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.inner.borrow().entries.len())
            .finish()
    }
}

/// Handle that keeps one callback registered.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
