//! Pointer, wheel and touch interaction for the companion avatar.
//!
//! [`InteractionController`] owns the interaction flags and routes host
//! input to the drag, zoom and proximity controllers. When a gesture
//! settles it runs display relocation and then, if no relocation
//! happened, a fire-and-forget preference save.
//!
//! Rendering is external: the controller only sees the renderer through
//! [`AvatarModel`], the page chrome through [`UiSurface`], and the window
//! system through [`DisplayHost`].

pub mod controller;
pub mod drag;
pub mod host;
pub mod input;
pub mod model;
pub mod persistence;
pub mod proximity;
pub mod relocate;
pub mod state;
pub mod subscription;
pub mod timer;
pub mod ui;
pub mod zoom;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::InteractionController;
pub use host::{DisplayHost, MoveOutcome, NoDisplayHost};
pub use input::{EventResponse, InputEvent};
pub use model::{AvatarModel, Transform};
pub use persistence::PersistenceBridge;
pub use proximity::{distance_to_rect, FocusPhase};
pub use state::InteractionState;
pub use subscription::{Listener, ListenerKind, ListenerRegistry, Subscription};
pub use timer::CoalescingTimer;
pub use ui::{ElementId, UiSurface};
