//! Proximity-driven reveal of the lock icon and floating buttons.

use std::time::{Duration, Instant};

use companion_common::{Point, Rect};
use tracing::{debug, warn};

use crate::model::AvatarModel;
use crate::state::InteractionState;
use crate::timer::CoalescingTimer;
use crate::ui::{ElementId, UiSurface};

/// Euclidean distance from `p` to the nearest point of `rect`; zero inside.
pub fn distance_to_rect(p: Point, rect: &Rect) -> f64 {
    let dx = (rect.x - p.x).max(0.0).max(p.x - rect.right());
    let dy = (rect.y - p.y).max(0.0).max(p.y - rect.bottom());
    dx.hypot(dy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPhase {
    Hidden,
    Visible,
    /// Still shown; hides when the timer fires unless the chrome is hovered.
    PendingHide,
}

#[derive(Debug, Clone)]
pub struct ProximityFocusController {
    threshold: f64,
    phase: FocusPhase,
    hide_timer: CoalescingTimer,
}

impl ProximityFocusController {
    pub fn new(threshold: f64, hide_delay: Duration) -> Self {
        Self {
            threshold,
            phase: FocusPhase::Hidden,
            hide_timer: CoalescingTimer::new(hide_delay),
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn set_hide_delay(&mut self, delay: Duration) {
        self.hide_timer.set_delay(delay);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.hide_timer.deadline()
    }

    pub fn on_model_over(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface) {
        self.reveal(state, ui);
    }

    pub fn on_model_out(&mut self, state: &mut InteractionState, now: Instant) {
        self.begin_hide(state, now);
    }

    /// Track the pointer against the model bounds. Gaze follows the pointer
    /// only while the chrome is fully visible.
    pub fn on_pointer_move(
        &mut self,
        state: &mut InteractionState,
        model: &mut dyn AvatarModel,
        ui: &mut dyn UiSurface,
        pointer: Point,
        now: Instant,
    ) {
        let Some(bounds) = model.bounds() else {
            debug!("model bounds unavailable, skipping proximity check");
            return;
        };
        if !bounds.is_finite() || !pointer.is_finite() {
            warn!(?bounds, ?pointer, "non-finite proximity input, keeping visibility");
            return;
        }

        let distance = distance_to_rect(pointer, &bounds);
        if distance < self.threshold {
            if self.phase != FocusPhase::Visible {
                self.reveal(state, ui);
            }
            model.focus(pointer);
        } else {
            self.begin_hide(state, now);
        }
    }

    pub fn on_ui_hover(
        &mut self,
        state: &mut InteractionState,
        ui: &mut dyn UiSurface,
        element: &ElementId,
        hovered: bool,
    ) {
        ui.set_hovered(element, hovered);
        state.is_mouse_over_buttons = ui.is_hovered(&ElementId::FloatingButtons)
            || ui.chrome_controls().iter().any(|id| ui.is_hovered(id));
    }

    /// Fire the hide timer if due. Hovered chrome postpones hiding by a
    /// full delay instead.
    pub fn tick(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface, now: Instant) {
        if !self.hide_timer.fire_if_due(now) {
            return;
        }
        if self.pointer_over_chrome(state, ui) {
            debug!("pointer over controls, postponing hide");
            self.hide_timer.arm(now);
            return;
        }
        self.phase = FocusPhase::Hidden;
        self.apply_visibility(state, ui);
        debug!("auxiliary ui hidden");
    }

    /// Push the current phase, lock and dismissed flags to the chrome.
    pub fn apply_visibility(&self, state: &InteractionState, ui: &mut dyn UiSurface) {
        let shown = self.phase != FocusPhase::Hidden;
        if state.goodbye_clicked {
            ui.set_visible(&ElementId::LockIcon, false);
            ui.set_visible(&ElementId::FloatingButtons, false);
            ui.set_visible(&ElementId::ReturnButton, shown);
        } else {
            ui.set_visible(&ElementId::LockIcon, shown);
            ui.set_visible(&ElementId::FloatingButtons, shown && !state.is_locked);
            ui.set_visible(&ElementId::ReturnButton, false);
        }
    }

    /// Drop straight to hidden, e.g. when the model is replaced.
    pub fn reset(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface) {
        self.hide_timer.cancel();
        self.phase = FocusPhase::Hidden;
        state.is_focusing = false;
        self.apply_visibility(state, ui);
    }

    fn reveal(&mut self, state: &mut InteractionState, ui: &mut dyn UiSurface) {
        self.hide_timer.cancel();
        self.phase = FocusPhase::Visible;
        state.is_focusing = true;
        self.apply_visibility(state, ui);
    }

    fn begin_hide(&mut self, state: &mut InteractionState, now: Instant) {
        if self.phase == FocusPhase::Visible {
            self.phase = FocusPhase::PendingHide;
            state.is_focusing = false;
            self.hide_timer.arm(now);
        }
    }

    fn pointer_over_chrome(&self, state: &InteractionState, ui: &dyn UiSurface) -> bool {
        state.is_mouse_over_buttons
            || [
                ElementId::LockIcon,
                ElementId::FloatingButtons,
                ElementId::ReturnButton,
            ]
            .iter()
            .any(|id| ui.is_hovered(id))
    }
}
