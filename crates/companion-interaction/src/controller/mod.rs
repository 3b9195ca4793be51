//! Routes host input to the gesture controllers and runs the settle
//! pipeline.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use companion_common::{Point, PreferenceRecord, Size};
use companion_config::schema::{DisplayConfig, FocusConfig, InteractionConfig};
use companion_config::CompanionConfig;
use tracing::{debug, info, warn};

use crate::drag::{DragController, DragUpdate};
use crate::host::DisplayHost;
use crate::input::{EventResponse, InputEvent};
use crate::model::AvatarModel;
use crate::persistence::{current_display_origin, PersistenceBridge};
use crate::proximity::{FocusPhase, ProximityFocusController};
use crate::relocate::relocate_after_drag;
use crate::state::InteractionState;
use crate::subscription::{Listener, ListenerKind, ListenerRegistry, Subscription};
use crate::ui::UiSurface;
use crate::zoom::{wheel_scale, PinchZoom};

/// Interaction controller for one avatar window.
///
/// Everything runs on the host's event-loop thread: `handle` for input,
/// `tick` whenever [`next_deadline`](Self::next_deadline) passes.
pub struct InteractionController<M: AvatarModel, U: UiSurface> {
    state: InteractionState,
    model: Option<M>,
    ui: U,
    host: Box<dyn DisplayHost>,
    persistence: PersistenceBridge,
    drag: DragController,
    pinch: PinchZoom,
    proximity: ProximityFocusController,
    listeners: ListenerRegistry,
    base_subscriptions: Vec<Subscription>,
    viewport: Size,
    interaction: InteractionConfig,
    focus: FocusConfig,
    display: DisplayConfig,
}

impl<M: AvatarModel, U: UiSurface> InteractionController<M, U> {
    pub fn new(
        config: &CompanionConfig,
        ui: U,
        host: Box<dyn DisplayHost>,
        persistence: PersistenceBridge,
    ) -> Self {
        let mut controller = Self {
            state: InteractionState::default(),
            model: None,
            ui,
            host,
            persistence,
            drag: DragController::new(),
            pinch: PinchZoom::new(config.interaction.min_scale, config.interaction.max_scale),
            proximity: ProximityFocusController::new(
                config.focus.proximity_threshold,
                Duration::from_millis(config.focus.hide_delay_ms),
            ),
            listeners: ListenerRegistry::new(),
            base_subscriptions: Vec::new(),
            viewport: Size::new(
                f64::from(config.window.width),
                f64::from(config.window.height),
            ),
            interaction: config.interaction.clone(),
            focus: config.focus.clone(),
            display: config.display.clone(),
        };
        controller.reconfigure(config);
        controller
            .proximity
            .apply_visibility(&controller.state, &mut controller.ui);
        controller
    }

    /// Apply interaction, focus and display settings, replacing every
    /// standing listener registration.
    pub fn reconfigure(&mut self, config: &CompanionConfig) {
        self.interaction = config.interaction.clone();
        self.focus = config.focus.clone();
        self.display = config.display.clone();

        self.persistence
            .set_debounce(Duration::from_millis(self.interaction.save_debounce_ms));
        self.pinch
            .set_limits(self.interaction.min_scale, self.interaction.max_scale);
        self.proximity
            .set_threshold(self.focus.proximity_threshold);
        self.proximity
            .set_hide_delay(Duration::from_millis(self.focus.hide_delay_ms));

        self.base_subscriptions.clear();
        let mut subs = vec![
            self.listeners
                .subscribe(ListenerKind::ModelPointer, Listener::Drag),
            self.listeners
                .subscribe(ListenerKind::ModelPointer, Listener::Proximity),
            self.listeners
                .subscribe(ListenerKind::UiHover, Listener::Proximity),
        ];
        if self.focus.track_proximity {
            subs.push(
                self.listeners
                    .subscribe(ListenerKind::PointerMove, Listener::Proximity),
            );
        }
        if self.interaction.wheel_zoom {
            subs.push(self.listeners.subscribe(ListenerKind::Wheel, Listener::Zoom));
        }
        if self.interaction.touch_zoom {
            subs.push(self.listeners.subscribe(ListenerKind::Touch, Listener::Zoom));
        }
        self.base_subscriptions = subs;

        debug!(listeners = self.listeners.len(), "interaction reconfigured");
    }

    /// Dispatch one host event.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> EventResponse {
        if let Some(kind) = event.listener_kind() {
            if !self.listeners.has_listeners(kind) {
                return EventResponse::IGNORED;
            }
        }

        match event {
            InputEvent::ModelPointerDown { position, contacts } => {
                self.on_model_pointer_down(position, contacts)
            }
            InputEvent::ModelOver => {
                if !self.subscribed(ListenerKind::ModelPointer, Listener::Proximity) {
                    return EventResponse::IGNORED;
                }
                self.proximity.on_model_over(&mut self.state, &mut self.ui);
                EventResponse::HANDLED
            }
            InputEvent::ModelOut => {
                if !self.subscribed(ListenerKind::ModelPointer, Listener::Proximity) {
                    return EventResponse::IGNORED;
                }
                self.proximity.on_model_out(&mut self.state, now);
                EventResponse::HANDLED
            }
            InputEvent::PointerMove { position, contacts } => {
                self.on_pointer_move(position, contacts, now)
            }
            InputEvent::PointerUp | InputEvent::PointerCancel => self.on_pointer_up(),
            InputEvent::Wheel { delta_y } => self.on_wheel(delta_y, now),
            InputEvent::TouchStart { touches } => self.on_touch_start(&touches),
            InputEvent::TouchMove { touches } => self.on_touch_move(&touches),
            InputEvent::TouchEnd { touches } => self.on_touch_end(&touches),
            InputEvent::UiHover { element, hovered } => {
                self.proximity
                    .on_ui_hover(&mut self.state, &mut self.ui, &element, hovered);
                EventResponse::HANDLED
            }
            InputEvent::Resized { viewport } => {
                self.viewport = viewport;
                EventResponse::HANDLED
            }
        }
    }

    /// Run timers that are due: the debounced save and the hide delay.
    pub fn tick(&mut self, now: Instant) {
        if self.persistence.save_due(now) {
            if let Some(model) = self.model.as_ref() {
                self.persistence.persist(model, self.host.as_ref());
            }
        }
        self.proximity.tick(&mut self.state, &mut self.ui, now);
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (
            self.persistence.next_deadline(),
            self.proximity.next_deadline(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Make `model` the active model, returning the previous one. Gestures
    /// and pending saves belonging to the old model are dropped.
    pub fn load_model(&mut self, model: M) -> Option<M> {
        self.drag.cancel(&mut self.state, &mut self.ui);
        if self.pinch.end() {
            self.state.is_touch_zooming = false;
        }
        self.persistence.cancel_pending();
        self.proximity.reset(&mut self.state, &mut self.ui);
        info!(model = model.model_path(), "model loaded");
        self.model.replace(model)
    }

    pub fn unload_model(&mut self) -> Option<M> {
        self.drag.cancel(&mut self.state, &mut self.ui);
        if self.pinch.end() {
            self.state.is_touch_zooming = false;
        }
        self.persistence.cancel_pending();
        self.model.take()
    }

    /// Apply a saved preference to the active model. With
    /// `display.restore_display` the window is also asked to move back to
    /// the saved display.
    pub fn restore(&mut self, record: &PreferenceRecord) -> bool {
        let Some(model) = self.model.as_mut() else {
            return false;
        };
        if model.model_path() != record.model_path {
            debug!(
                saved = %record.model_path,
                active = model.model_path(),
                "ignoring preference for another model"
            );
            return false;
        }
        if !record.is_persistable() {
            warn!(model = %record.model_path, "ignoring non-finite saved transform");
            return false;
        }

        model.set_position(record.position);
        model.set_scale(record.scale);

        if self.display.restore_display {
            if let Some(origin) = record.display_origin {
                self.restore_display(origin);
            }
        }
        info!(model = %record.model_path, "preferences restored");
        true
    }

    fn restore_display(&mut self, origin: Point) {
        if !self.host.is_available() {
            return;
        }
        if current_display_origin(self.host.as_ref()) == Some(origin) {
            return;
        }
        match self.host.move_window_to_display(origin.x, origin.y) {
            Ok(outcome) if outcome.success => {
                debug!(?origin, same = outcome.same_display, "window restored to saved display")
            }
            Ok(_) => debug!(?origin, "saved display not available"),
            Err(e) => warn!("failed to restore saved display: {e}"),
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.state.is_locked == locked {
            return;
        }
        self.state.is_locked = locked;
        if locked {
            self.drag.cancel(&mut self.state, &mut self.ui);
            if self.pinch.end() {
                self.state.is_touch_zooming = false;
            }
        }
        self.proximity.apply_visibility(&self.state, &mut self.ui);
        info!(locked, "lock toggled");
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.set_locked(!self.state.is_locked);
        self.state.is_locked
    }

    /// Enter the dismissed mode: normal chrome is replaced by the return
    /// affordance.
    pub fn dismiss(&mut self) {
        self.state.goodbye_clicked = true;
        self.proximity.apply_visibility(&self.state, &mut self.ui);
        info!("companion dismissed");
    }

    pub fn recall(&mut self) {
        self.state.goodbye_clicked = false;
        self.proximity.apply_visibility(&self.state, &mut self.ui);
        info!("companion recalled");
    }

    /// Push the current chrome visibility to the UI again, e.g. after the
    /// page reloaded and lost its state.
    pub fn refresh_chrome(&mut self) {
        self.proximity.apply_visibility(&self.state, &mut self.ui);
    }

    /// The host moved the window between displays on its own.
    pub fn on_display_changed(&mut self, display_id: Option<&str>) {
        info!(display = ?display_id, "display changed");
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn focus_phase(&self) -> FocusPhase {
        self.proximity.phase()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Event kinds the host must forward.
    pub fn active_kinds(&self) -> BTreeSet<ListenerKind> {
        self.listeners.active_kinds()
    }

    /// Event kinds whose default host action must be suppressed.
    pub fn suppressed_default_kinds(&self) -> BTreeSet<ListenerKind> {
        self.listeners
            .active_kinds()
            .into_iter()
            .filter(ListenerKind::suppresses_default)
            .collect()
    }

    fn subscribed(&self, kind: ListenerKind, listener: Listener) -> bool {
        self.listeners.is_subscribed(kind, listener)
    }

    fn on_model_pointer_down(&mut self, position: Point, contacts: usize) -> EventResponse {
        if !self.subscribed(ListenerKind::ModelPointer, Listener::Drag) {
            return EventResponse::IGNORED;
        }
        let Some(model) = self.model.as_ref() else {
            return EventResponse::IGNORED;
        };
        if self.drag.begin(
            &mut self.state,
            model,
            &mut self.ui,
            &self.listeners,
            position,
            contacts,
        ) {
            EventResponse::HANDLED
        } else {
            EventResponse::IGNORED
        }
    }

    fn on_pointer_move(&mut self, position: Point, contacts: usize, now: Instant) -> EventResponse {
        let mut response = EventResponse::IGNORED;

        if self.subscribed(ListenerKind::PointerMove, Listener::Drag) {
            if let Some(model) = self.model.as_mut() {
                match self
                    .drag
                    .update(&mut self.state, model, &mut self.ui, position, contacts)
                {
                    DragUpdate::Moved | DragUpdate::Cancelled => response = EventResponse::HANDLED,
                    // The release never reached us; settle now.
                    DragUpdate::Released => {
                        self.settle_drag();
                        response = EventResponse::HANDLED;
                    }
                    DragUpdate::Ignored => {}
                }
            }
        }

        if self.subscribed(ListenerKind::PointerMove, Listener::Proximity) {
            if let Some(model) = self.model.as_mut() {
                self.proximity
                    .on_pointer_move(&mut self.state, model, &mut self.ui, position, now);
                response.handled = true;
            }
        }
        response
    }

    fn on_pointer_up(&mut self) -> EventResponse {
        if !self.subscribed(ListenerKind::PointerUp, Listener::Drag) {
            return EventResponse::IGNORED;
        }
        if !self.drag.end(&mut self.state, &mut self.ui) {
            return EventResponse::IGNORED;
        }
        self.settle_drag();
        EventResponse::HANDLED
    }

    /// Relocation first; the generic save only runs when no relocation
    /// happened, since relocation saves on its own.
    fn settle_drag(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let relocated = self.display.relocate_on_drag
            && relocate_after_drag(
                model,
                self.host.as_mut(),
                self.viewport,
                &mut self.persistence,
            );
        if !relocated {
            self.persistence.persist(&*model, self.host.as_ref());
        }
    }

    fn on_wheel(&mut self, delta_y: f64, now: Instant) -> EventResponse {
        if self.state.is_locked {
            return EventResponse::IGNORED;
        }
        let Some(model) = self.model.as_mut() else {
            return EventResponse::IGNORED;
        };
        if let Some(scale) = wheel_scale(model.scale(), delta_y, self.interaction.wheel_factor) {
            model.set_scale(scale);
            self.persistence.schedule_save(now);
        }
        EventResponse::CONSUMED
    }

    fn on_touch_start(&mut self, touches: &[Point]) -> EventResponse {
        if self.state.is_locked || touches.len() < 2 {
            return EventResponse::IGNORED;
        }
        let Some(model) = self.model.as_ref() else {
            return EventResponse::IGNORED;
        };
        if self.pinch.is_active() {
            return EventResponse::CONSUMED;
        }

        self.drag.cancel(&mut self.state, &mut self.ui);
        if self.pinch.begin(touches, model.scale()) {
            self.state.is_touch_zooming = true;
            debug!("pinch started");
        }
        EventResponse::CONSUMED
    }

    fn on_touch_move(&mut self, touches: &[Point]) -> EventResponse {
        if touches.len() > 1 && self.drag.is_active() {
            self.drag.cancel(&mut self.state, &mut self.ui);
        }
        if !self.pinch.is_active() {
            return EventResponse::IGNORED;
        }
        if touches.len() < 2 {
            self.end_pinch();
            return EventResponse::CONSUMED;
        }
        if let (Some(model), Some(scale)) = (self.model.as_mut(), self.pinch.update(touches)) {
            model.set_scale(scale);
        }
        EventResponse::CONSUMED
    }

    fn on_touch_end(&mut self, remaining: &[Point]) -> EventResponse {
        if !self.pinch.is_active() {
            return EventResponse::IGNORED;
        }
        if remaining.len() < 2 {
            self.end_pinch();
        }
        EventResponse::CONSUMED
    }

    fn end_pinch(&mut self) {
        if !self.pinch.end() {
            return;
        }
        self.state.is_touch_zooming = false;
        debug!("pinch ended");
        if let Some(model) = self.model.as_ref() {
            self.persistence.persist(model, self.host.as_ref());
        }
    }
}
