#![forbid(unsafe_code)]

//! Document-level key listener registry with RAII registrations.
//!
//! A [`KeyListener`] is the handle a component holds while it wants global
//! key events. Dropping the handle unregisters it, so a registration cannot
//! outlive its owner on any exit path: explicit release, early return, or
//! the owner being dropped.
//!
//! # Architecture
//!
//! The registry state lives in an `Rc<RefCell<..>>`; handles keep a `Weak`
//! back-reference. Dropping the registry first is fine: the handle's drop
//! then finds nothing to unregister.
//!
//! # Invariants
//!
//! 1. Listener IDs are unique per registry and never reused.
//! 2. A listener is registered from `listen()` until its handle is dropped.
//! 3. `active_count()` equals the number of live handles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identifier of a registered key listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    active: Vec<ListenerId>,
    /// Total registrations ever made.
    acquired: u64,
}

/// Shared table of active document-level key listeners.
///
/// Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct KeyListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl KeyListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the handle is dropped.
    #[must_use = "dropping the handle unregisters the listener immediately"]
    pub fn listen(&self) -> KeyListener {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.acquired += 1;
        inner.active.push(id);
        KeyListener {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.inner.borrow().active.contains(&id)
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    /// Number of registrations made over the registry's lifetime.
    #[must_use]
    pub fn total_acquired(&self) -> u64 {
        self.inner.borrow().acquired
    }

    /// Registered listeners in registration order.
    #[must_use]
    pub fn active(&self) -> Vec<ListenerId> {
        self.inner.borrow().active.clone()
    }
}

/// RAII registration in a [`KeyListenerRegistry`].
#[derive(Debug)]
pub struct KeyListener {
    id: ListenerId,
    registry: Weak<RefCell<RegistryInner>>,
}

impl KeyListener {
    #[inline]
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the registry still exists and holds this listener.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|inner| inner.borrow().active.contains(&self.id))
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().active.retain(|&id| id != self.id);
        }
    }
}
