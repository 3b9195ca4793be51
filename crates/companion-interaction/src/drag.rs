//! Pointer drag: translate the model while the pointer is held.

use companion_common::Point;
use tracing::debug;

use crate::model::AvatarModel;
use crate::state::InteractionState;
use crate::subscription::{Listener, ListenerKind, ListenerRegistry, Subscription};
use crate::ui::{ElementId, UiSurface};

/// What a pointer move did to an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragUpdate {
    Moved,
    /// A second contact appeared; the drag was aborted in place.
    Cancelled,
    /// No contact is held any more; the drag ended and must settle.
    Released,
    Ignored,
}

/// Drag gesture in progress, if any.
///
/// While a drag is active the window-wide move and release listeners are
/// held here and the chrome controls stop intercepting the pointer.
#[derive(Debug, Default)]
pub struct DragController {
    offset: Option<Point>,
    saved_pointer_events: Vec<(ElementId, Option<String>)>,
    subscriptions: Vec<Subscription>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.offset.is_some()
    }

    /// Start dragging from `pointer`. Refused while locked, during a pinch,
    /// or with more than one contact.
    pub fn begin(
        &mut self,
        state: &mut InteractionState,
        model: &dyn AvatarModel,
        ui: &mut dyn UiSurface,
        registry: &ListenerRegistry,
        pointer: Point,
        contacts: usize,
    ) -> bool {
        if state.is_locked || state.is_touch_zooming || contacts > 1 || self.is_active() {
            return false;
        }

        let origin = model.position();
        self.offset = Some(Point::new(pointer.x - origin.x, pointer.y - origin.y));

        for id in ui.chrome_controls() {
            let previous = ui.pointer_events(&id);
            ui.set_pointer_events(&id, Some("none"));
            self.saved_pointer_events.push((id, previous));
        }

        self.subscriptions = vec![
            registry.subscribe(ListenerKind::PointerMove, Listener::Drag),
            registry.subscribe(ListenerKind::PointerUp, Listener::Drag),
        ];
        state.is_dragging = true;
        debug!(x = pointer.x, y = pointer.y, "drag started");
        true
    }

    pub fn update(
        &mut self,
        state: &mut InteractionState,
        model: &mut dyn AvatarModel,
        ui: &mut dyn UiSurface,
        pointer: Point,
        contacts: usize,
    ) -> DragUpdate {
        let Some(offset) = self.offset else {
            return DragUpdate::Ignored;
        };
        if contacts > 1 {
            self.cancel(state, ui);
            return DragUpdate::Cancelled;
        }
        if contacts == 0 {
            self.release(state, ui);
            debug!("drag ended by a move without contacts");
            return DragUpdate::Released;
        }
        model.set_position(Point::new(pointer.x - offset.x, pointer.y - offset.y));
        DragUpdate::Moved
    }

    /// Finish the drag. Returns `true` if one was active, in which case the
    /// caller runs the settle pipeline.
    pub fn end(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface) -> bool {
        if !self.is_active() {
            return false;
        }
        self.release(state, ui);
        debug!("drag ended");
        true
    }

    /// Abort without settling, keeping the last applied position.
    pub fn cancel(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface) {
        if self.is_active() {
            self.release(state, ui);
            debug!("drag cancelled by additional contact");
        }
    }

    fn release(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface) {
        for (id, previous) in self.saved_pointer_events.drain(..) {
            ui.set_pointer_events(&id, previous.as_deref());
        }
        self.subscriptions.clear();
        self.offset = None;
        state.is_dragging = false;
    }
}
