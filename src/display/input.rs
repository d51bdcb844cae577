//! Raw input routing with removable listener registrations.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Kinds of raw input the display reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    PointerMove,
    PointerDown,
    KeyDown,
}

impl InputKind {
    pub const ALL: [Self; 3] = [Self::PointerMove, Self::PointerDown, Self::KeyDown];
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, InputKind)>,
}

/// Shared listener registry of one mounted display.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    registry: Rc<RefCell<Registry>>,
}

impl InputRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `kind`. Dropping the guard removes the registration.
    #[must_use = "dropping the guard removes the listener"]
    pub fn subscribe(&self, kind: InputKind) -> ListenerGuard {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, kind));
        ListenerGuard {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Whether any live listener accepts `kind`.
    #[must_use]
    pub fn route(&self, kind: InputKind) -> bool {
        self.registry
            .borrow()
            .listeners
            .iter()
            .any(|(_, k)| *k == kind)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Owns one listener registration; removes it on drop.
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
