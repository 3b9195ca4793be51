//! Translation and dispatch of page messages.

use std::time::Instant;

use companion_common::events::Event;
use companion_common::{Point, PreferenceStore, Size};
use companion_interaction::{ElementId, InputEvent};
use companion_webview::ipc::{
    ElementInfo, HoverPayload, LogPayload, ModelLoadedPayload, PointerPayload, ReadyPayload,
    TouchPayload, ViewportPayload, WheelPayload,
};
use companion_webview::{IpcError, IpcMessage};

use super::core::CompanionApp;
use super::page::PageCommand;
use super::types::RestoreResult;
use super::web_model::WebModel;

/// A page message in host terms.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum PageMessage {
    Input(InputEvent),
    Ready(Vec<ElementInfo>),
    ModelLoaded(ModelLoadedPayload),
    LockToggle,
    Dismiss,
    Recall,
    Log(LogPayload),
}

fn pointer(msg: &IpcMessage) -> Result<(Point, usize), IpcError> {
    let p: PointerPayload = msg.payload_as()?;
    Ok((Point::new(p.x, p.y), p.contacts))
}

fn touches(msg: &IpcMessage) -> Result<Vec<Point>, IpcError> {
    let p: TouchPayload = msg.payload_as()?;
    Ok(p.touches)
}

/// Map an already-allowlisted message to what the host should do with it.
pub(super) fn translate(msg: &IpcMessage) -> Result<PageMessage, IpcError> {
    let event = match msg.kind.as_str() {
        "ready" => {
            // A page without chrome may send no payload at all.
            let ready: ReadyPayload = msg.payload_as().unwrap_or_default();
            return Ok(PageMessage::Ready(ready.elements));
        }
        "model_loaded" => return Ok(PageMessage::ModelLoaded(msg.payload_as()?)),
        "lock_toggle" => return Ok(PageMessage::LockToggle),
        "dismiss" => return Ok(PageMessage::Dismiss),
        "recall" => return Ok(PageMessage::Recall),
        "log" => return Ok(PageMessage::Log(msg.payload_as()?)),

        "viewport" => {
            let v: ViewportPayload = msg.payload_as()?;
            InputEvent::Resized {
                viewport: Size::new(v.width, v.height),
            }
        }
        "model_pointer_down" => {
            let (position, contacts) = pointer(msg)?;
            InputEvent::ModelPointerDown { position, contacts }
        }
        "model_over" => InputEvent::ModelOver,
        "model_out" => InputEvent::ModelOut,
        "pointer_move" => {
            let (position, contacts) = pointer(msg)?;
            InputEvent::PointerMove { position, contacts }
        }
        "pointer_up" => InputEvent::PointerUp,
        "pointer_cancel" => InputEvent::PointerCancel,
        "wheel" => {
            let w: WheelPayload = msg.payload_as()?;
            InputEvent::Wheel { delta_y: w.delta_y }
        }
        "touch_start" => InputEvent::TouchStart {
            touches: touches(msg)?,
        },
        "touch_move" => InputEvent::TouchMove {
            touches: touches(msg)?,
        },
        "touch_end" => InputEvent::TouchEnd {
            touches: touches(msg)?,
        },
        "ui_hover" => {
            let h: HoverPayload = msg.payload_as()?;
            let element =
                ElementId::from_dom_id(&h.id).ok_or_else(|| IpcError::InvalidPayload {
                    kind: msg.kind.clone(),
                    reason: format!("unknown element {}", h.id),
                })?;
            InputEvent::UiHover {
                element,
                hovered: h.hovered,
            }
        }
        other => return Err(IpcError::KindNotAllowed(other.to_string())),
    };
    Ok(PageMessage::Input(event))
}

impl CompanionApp {
    /// Handle one raw IPC body from the overlay page.
    pub(super) fn handle_ipc_message(&mut self, body: &str) {
        let message = match IpcMessage::parse(body).and_then(|m| translate(&m).map(|t| (m, t))) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(body_len = body.len(), "IPC message rejected: {e}");
                return;
            }
        };
        let (msg, translated) = message;
        tracing::trace!(kind = %msg.kind, "IPC message dispatched");

        match translated {
            PageMessage::Input(event) => {
                if let Some(controller) = self.controller.as_mut() {
                    let response = controller.handle(event, Instant::now());
                    if response.prevent_default {
                        tracing::trace!(kind = %msg.kind, "default action suppressed");
                    }
                }
            }
            PageMessage::Ready(elements) => self.on_page_ready(&elements),
            PageMessage::ModelLoaded(payload) => self.on_model_loaded(&payload),
            PageMessage::LockToggle => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.toggle_lock();
                }
            }
            PageMessage::Dismiss => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.dismiss();
                    self.event_bus.publish(Event::Dismissed);
                }
            }
            PageMessage::Recall => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.recall();
                    self.event_bus.publish(Event::Recalled);
                }
            }
            PageMessage::Log(log) => log_from_page(&log),
        }
    }

    /// The page (re)loaded: mirror its chrome, announce listeners and ask
    /// for the configured model.
    fn on_page_ready(&mut self, elements: &[ElementInfo]) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        controller.ui_mut().register(elements);
        controller.refresh_chrome();
        tracing::info!(elements = controller.ui().len(), "overlay page ready");

        // Force a fresh announcement; the page lost its listener table.
        self.announced_kinds = None;
        self.outbox.push(PageCommand::LoadModel {
            path: self.config.model.path.clone(),
        });
    }

    fn on_model_loaded(&mut self, payload: &ModelLoadedPayload) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let model = WebModel::from_loaded(payload, controller.viewport(), self.outbox.clone());
        controller.load_model(model);
        self.request_restore(&payload.path);
        self.event_bus.publish(Event::ModelLoaded {
            model_path: payload.path.clone(),
        });
    }

    /// Load saved preferences for `model_path` off the event loop. The
    /// result is applied by `poll_restores`.
    fn request_restore(&self, model_path: &str) {
        let Some(runtime) = self.tokio_runtime.as_ref() else {
            return;
        };
        let store = self.store.clone();
        let tx = self.restore_tx.clone();
        let model_path = model_path.to_string();
        runtime.spawn(async move {
            let result = store.load(&model_path).await;
            // Receiver gone means the app is shutting down.
            let _ = tx.send(RestoreResult { model_path, result });
        });
    }
}

fn log_from_page(log: &LogPayload) {
    match log.level.as_str() {
        "error" => tracing::error!(target: "companion::page", "{}", log.message),
        "warn" => tracing::warn!(target: "companion::page", "{}", log.message),
        "debug" => tracing::debug!(target: "companion::page", "{}", log.message),
        _ => tracing::info!(target: "companion::page", "{}", log.message),
    }
}
