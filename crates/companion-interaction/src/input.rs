//! Host input events consumed by the controller.

use companion_common::{Point, Size};

use crate::subscription::ListenerKind;
use crate::ui::ElementId;

/// One input event in window coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on the model's hit region.
    ModelPointerDown { position: Point, contacts: usize },
    /// Pointer entered the model's hit region.
    ModelOver,
    /// Pointer left the model's hit region.
    ModelOut,
    /// Pointer moved anywhere in the window.
    PointerMove { position: Point, contacts: usize },
    PointerUp,
    PointerCancel,
    Wheel { delta_y: f64 },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    /// A contact lifted; `touches` are the ones still down.
    TouchEnd { touches: Vec<Point> },
    UiHover { element: ElementId, hovered: bool },
    Resized { viewport: Size },
}

impl InputEvent {
    /// Listener class this event is delivered to. `None` for events the
    /// controller always consumes.
    pub fn listener_kind(&self) -> Option<ListenerKind> {
        match self {
            InputEvent::ModelPointerDown { .. } | InputEvent::ModelOver | InputEvent::ModelOut => {
                Some(ListenerKind::ModelPointer)
            }
            InputEvent::PointerMove { .. } => Some(ListenerKind::PointerMove),
            InputEvent::PointerUp | InputEvent::PointerCancel => Some(ListenerKind::PointerUp),
            InputEvent::Wheel { .. } => Some(ListenerKind::Wheel),
            InputEvent::TouchStart { .. }
            | InputEvent::TouchMove { .. }
            | InputEvent::TouchEnd { .. } => Some(ListenerKind::Touch),
            InputEvent::UiHover { .. } => Some(ListenerKind::UiHover),
            InputEvent::Resized { .. } => None,
        }
    }
}

/// What the host should do with the event after the controller saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub handled: bool,
    /// Suppress the host's default action (page scroll, native pinch).
    pub prevent_default: bool,
}

impl EventResponse {
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };

    pub const CONSUMED: Self = Self {
        handled: true,
        prevent_default: true,
    };
}
