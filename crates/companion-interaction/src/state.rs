//! Interaction flags shared by the gesture controllers.

/// Flags for one avatar window, mutated only from event handlers.
///
/// `is_dragging` and `is_touch_zooming` are never both set: starting a
/// pinch cancels a drag, and a drag cannot start during a pinch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub(crate) is_dragging: bool,
    pub(crate) is_touch_zooming: bool,
    pub(crate) is_focusing: bool,
    pub(crate) is_locked: bool,
    pub(crate) goodbye_clicked: bool,
    pub(crate) is_mouse_over_buttons: bool,
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_touch_zooming(&self) -> bool {
        self.is_touch_zooming
    }

    /// Gaze tracking is active (auxiliary UI visible).
    pub fn is_focusing(&self) -> bool {
        self.is_focusing
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// The avatar has been sent away.
    pub fn is_dismissed(&self) -> bool {
        self.goodbye_clicked
    }

    pub fn is_mouse_over_buttons(&self) -> bool {
        self.is_mouse_over_buttons
    }

    pub(crate) fn gestures_consistent(&self) -> bool {
        !(self.is_dragging && self.is_touch_zooming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        let state = InteractionState::default();
        assert!(!state.is_dragging());
        assert!(!state.is_touch_zooming());
        assert!(!state.is_locked());
        assert!(!state.is_dismissed());
        assert!(state.gestures_consistent());
    }

    #[test]
    fn drag_and_pinch_together_is_inconsistent() {
        let state = InteractionState {
            is_dragging: true,
            is_touch_zooming: true,
            ..Default::default()
        };
        assert!(!state.gestures_consistent());
    }
}
