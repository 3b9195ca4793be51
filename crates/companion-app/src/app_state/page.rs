//! Commands queued for the overlay page.
//!
//! The model and UI mirrors run inside the interaction controller and have
//! no access to the WebView, so they push commands into a shared
//! [`PageOutbox`] that the event loop flushes once per poll.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use companion_common::Point;
use companion_interaction::{ListenerKind, Transform};
use serde_json::{json, Value};

/// One Rust -> page message.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum PageCommand {
    Transform(Transform),
    Focus(Point),
    Visibility { id: String, visible: bool },
    PointerEvents { id: String, value: Option<String> },
    Listen {
        kinds: Vec<&'static str>,
        suppress: Vec<&'static str>,
    },
    LoadModel { path: String },
}

impl PageCommand {
    /// Build a `listen` command from the controller's active kinds.
    pub(super) fn listen(
        active: &BTreeSet<ListenerKind>,
        suppressed: &BTreeSet<ListenerKind>,
    ) -> Self {
        PageCommand::Listen {
            kinds: active.iter().map(listener_kind_name).collect(),
            suppress: suppressed.iter().map(listener_kind_name).collect(),
        }
    }

    pub(super) fn kind(&self) -> &'static str {
        match self {
            PageCommand::Transform(_) => "transform",
            PageCommand::Focus(_) => "focus",
            PageCommand::Visibility { .. } => "visibility",
            PageCommand::PointerEvents { .. } => "pointer_events",
            PageCommand::Listen { .. } => "listen",
            PageCommand::LoadModel { .. } => "load_model",
        }
    }

    pub(super) fn payload(&self) -> Value {
        match self {
            PageCommand::Transform(t) => json!({
                "x": t.x,
                "y": t.y,
                "scale_x": t.scale_x,
                "scale_y": t.scale_y,
            }),
            PageCommand::Focus(p) => json!({ "x": p.x, "y": p.y }),
            PageCommand::Visibility { id, visible } => json!({ "id": id, "visible": visible }),
            PageCommand::PointerEvents { id, value } => json!({ "id": id, "value": value }),
            PageCommand::Listen { kinds, suppress } => {
                json!({ "kinds": kinds, "suppress": suppress })
            }
            PageCommand::LoadModel { path } => json!({ "path": path }),
        }
    }

    /// Commands where only the latest value matters.
    fn replaces(&self, older: &PageCommand) -> bool {
        match (self, older) {
            (PageCommand::Transform(_), PageCommand::Transform(_))
            | (PageCommand::Focus(_), PageCommand::Focus(_))
            | (PageCommand::Listen { .. }, PageCommand::Listen { .. }) => true,
            (
                PageCommand::Visibility { id: a, .. },
                PageCommand::Visibility { id: b, .. },
            ) => a == b,
            (
                PageCommand::PointerEvents { id: a, .. },
                PageCommand::PointerEvents { id: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// Name the page's bridge script uses for a listener kind.
pub(super) fn listener_kind_name(kind: &ListenerKind) -> &'static str {
    match kind {
        ListenerKind::ModelPointer => "model_pointer",
        ListenerKind::PointerMove => "pointer_move",
        ListenerKind::PointerUp => "pointer_up",
        ListenerKind::Wheel => "wheel",
        ListenerKind::Touch => "touch",
        ListenerKind::UiHover => "ui_hover",
    }
}

/// Shared queue of page commands. Clones share the queue.
#[derive(Debug, Clone, Default)]
pub(super) struct PageOutbox {
    queue: Rc<RefCell<Vec<PageCommand>>>,
}

impl PageOutbox {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Queue `command`, dropping any queued command it supersedes.
    pub(super) fn push(&self, command: PageCommand) {
        let mut queue = self.queue.borrow_mut();
        queue.retain(|older| !command.replaces(older));
        queue.push(command);
    }

    pub(super) fn take(&self) -> Vec<PageCommand> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
