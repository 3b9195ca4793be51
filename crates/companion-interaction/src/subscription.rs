//! Listener registrations with RAII handles.
//!
//! Each controller that wants a class of host events holds a
//! [`Subscription`]; dropping the handle unregisters it. Reconfiguring
//! therefore means dropping the old handles and subscribing again, which
//! can neither leak nor duplicate a registration.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};

/// Class of host event a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerKind {
    /// Pointer down / over / out delivered by the renderer's hit test.
    ModelPointer,
    /// Pointer movement anywhere in the window.
    PointerMove,
    /// Pointer release or cancel anywhere in the window.
    PointerUp,
    Wheel,
    Touch,
    /// Hover changes on the overlay chrome.
    UiHover,
}

impl ListenerKind {
    /// Kinds whose default host action (scroll, native pinch) must be
    /// suppressed while someone listens to them.
    pub fn suppresses_default(&self) -> bool {
        matches!(self, ListenerKind::Wheel | ListenerKind::Touch)
    }
}

/// Which component owns a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Listener {
    Drag,
    Zoom,
    Proximity,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    entries: BTreeMap<u64, (ListenerKind, Listener)>,
}

/// Table of active listener registrations.
///
/// Cloning yields another handle to the same table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: ListenerKind, listener: Listener) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.insert(id, (kind, listener));
        tracing::trace!(?kind, ?listener, id, "listener registered");
        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn is_subscribed(&self, kind: ListenerKind, listener: Listener) -> bool {
        self.inner
            .borrow()
            .entries
            .values()
            .any(|&(k, l)| k == kind && l == listener)
    }

    pub fn has_listeners(&self, kind: ListenerKind) -> bool {
        self.inner.borrow().entries.values().any(|&(k, _)| k == kind)
    }

    /// Distinct kinds with at least one registration.
    pub fn active_kinds(&self) -> BTreeSet<ListenerKind> {
        self.inner.borrow().entries.values().map(|&(k, _)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for one registration; unregisters on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<RegistryInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if let Some((kind, listener)) = inner.borrow_mut().entries.remove(&self.id) {
                tracing::trace!(?kind, ?listener, id = self.id, "listener removed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_drop() {
        let registry = ListenerRegistry::new();
        let sub = registry.subscribe(ListenerKind::Wheel, Listener::Zoom);
        assert!(registry.is_subscribed(ListenerKind::Wheel, Listener::Zoom));
        assert_eq!(registry.len(), 1);

        drop(sub);
        assert!(!registry.is_subscribed(ListenerKind::Wheel, Listener::Zoom));
        assert!(registry.is_empty());
    }

    #[test]
    fn owners_are_tracked_separately() {
        let registry = ListenerRegistry::new();
        let _drag = registry.subscribe(ListenerKind::PointerMove, Listener::Drag);
        let proximity = registry.subscribe(ListenerKind::PointerMove, Listener::Proximity);

        drop(proximity);
        assert!(registry.is_subscribed(ListenerKind::PointerMove, Listener::Drag));
        assert!(!registry.is_subscribed(ListenerKind::PointerMove, Listener::Proximity));
        assert!(registry.has_listeners(ListenerKind::PointerMove));
    }

    #[test]
    fn replacing_handles_keeps_count_stable() {
        let registry = ListenerRegistry::new();
        let mut handles = vec![
            registry.subscribe(ListenerKind::Wheel, Listener::Zoom),
            registry.subscribe(ListenerKind::Touch, Listener::Zoom),
        ];
        for _ in 0..5 {
            handles.clear();
            handles.push(registry.subscribe(ListenerKind::Wheel, Listener::Zoom));
            handles.push(registry.subscribe(ListenerKind::Touch, Listener::Zoom));
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn handle_outliving_registry_drops_cleanly() {
        let registry = ListenerRegistry::new();
        let sub = registry.subscribe(ListenerKind::Touch, Listener::Zoom);
        drop(registry);
        drop(sub);
    }

    #[test]
    fn active_kinds_and_default_suppression() {
        let registry = ListenerRegistry::new();
        let _a = registry.subscribe(ListenerKind::Wheel, Listener::Zoom);
        let _b = registry.subscribe(ListenerKind::ModelPointer, Listener::Drag);

        let kinds = registry.active_kinds();
        assert_eq!(kinds.len(), 2);
        assert!(ListenerKind::Wheel.suppresses_default());
        assert!(!ListenerKind::ModelPointer.suppresses_default());
    }
}
