//! IPC protocol between the overlay page and Rust.
//!
//! Messages flow in both directions:
//! - **JS -> Rust**: the page calls `window.companion.ipc.send(kind, payload)`,
//!   which posts `{"kind": ..., "payload": ...}` to the WebView's IPC handler.
//! - **Rust -> JS**: Rust evaluates `window.companion.ipc._dispatch(kind, payload)`
//!   in the page (see [`js_dispatch_message`]).

use companion_common::Point;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Message kinds the page may send. Anything else is dropped.
pub const ALLOWED_IPC_KINDS: &[&str] = &[
    "ready",
    "viewport",
    "model_loaded",
    "model_pointer_down",
    "model_over",
    "model_out",
    "pointer_move",
    "pointer_up",
    "pointer_cancel",
    "wheel",
    "touch_start",
    "touch_move",
    "touch_end",
    "ui_hover",
    "lock_toggle",
    "dismiss",
    "recall",
    "log",
];

pub fn is_ipc_kind_allowed(kind: &str) -> bool {
    ALLOWED_IPC_KINDS.contains(&kind)
}

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("invalid IPC JSON: {0}")]
    InvalidJson(String),

    #[error("IPC kind not allowed: {0}")]
    KindNotAllowed(String),

    #[error("invalid payload for {kind}: {reason}")]
    InvalidPayload { kind: String, reason: String },
}

/// A typed IPC message from JavaScript to Rust.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: IpcPayload,
}

/// Payload of an IPC message: a plain string or structured JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcPayload {
    Text(String),
    Json(serde_json::Value),
    #[default]
    None,
}

impl IpcMessage {
    /// Parse a raw `postMessage` body and check the kind allowlist.
    pub fn parse(raw: &str) -> Result<Self, IpcError> {
        let msg: Self =
            serde_json::from_str(raw).map_err(|e| IpcError::InvalidJson(e.to_string()))?;
        if !is_ipc_kind_allowed(&msg.kind) {
            return Err(IpcError::KindNotAllowed(msg.kind));
        }
        Ok(msg)
    }

    pub fn json(kind: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload: IpcPayload::Json(value),
        }
    }

    /// Deserialize the payload into `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, IpcError> {
        let value = match &self.payload {
            IpcPayload::Json(v) => v.clone(),
            IpcPayload::Text(s) => serde_json::Value::String(s.clone()),
            IpcPayload::None => serde_json::Value::Null,
        };
        serde_json::from_value(value).map_err(|e| IpcError::InvalidPayload {
            kind: self.kind.clone(),
            reason: e.to_string(),
        })
    }
}

fn one() -> usize {
    1
}

/// Pointer position in CSS pixels with the number of active contacts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPayload {
    pub x: f64,
    pub y: f64,
    #[serde(default = "one")]
    pub contacts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelPayload {
    pub delta_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPayload {
    /// Contacts currently down.
    #[serde(default)]
    pub touches: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverPayload {
    pub id: String,
    pub hovered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPayload {
    pub width: f64,
    pub height: f64,
}

/// Geometry the renderer reports once a model finished loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelLoadedPayload {
    pub path: String,
    /// Unscaled model size.
    pub width: f64,
    pub height: f64,
    #[serde(default = "half")]
    pub anchor_x: f64,
    #[serde(default = "half")]
    pub anchor_y: f64,
    /// Initial transform chosen by the page, if any.
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
}

fn half() -> f64 {
    0.5
}

/// One chrome element found in the page at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: String,
    /// Inline `pointer-events` style, `None` when unset.
    #[serde(default)]
    pub pointer_events: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadyPayload {
    #[serde(default)]
    pub elements: Vec<ElementInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPayload {
    #[serde(default)]
    pub level: String,
    pub message: String,
}

/// JavaScript that sets up the bridge. Injected as an initialization
/// script, so it runs before the page's own scripts.
///
/// Window-wide pointer, wheel and touch events are only forwarded for the
/// kinds Rust announced with a `listen` message; wheel and touch defaults
/// are suppressed synchronously for the kinds listed in `suppress`. The
/// release of a pointer that pressed the model is forwarded regardless.
pub const IPC_INIT_SCRIPT: &str = r#"
(function() {
    var bridge = window.companion = window.companion || {};
    var listening = {};
    var suppressed = {};
    var activePointers = {};
    var modelPointers = {};

    function activeCount() {
        return Object.keys(activePointers).length;
    }

    function touchList(e) {
        var out = [];
        for (var i = 0; i < e.touches.length; i++) {
            out.push({ x: e.touches[i].clientX, y: e.touches[i].clientY });
        }
        return out;
    }

    function chromeId(el) {
        while (el && el !== document.body) {
            var id = el.id || '';
            if (id === 'lock-icon' || id === 'floating-buttons' ||
                id === 'return-button' || id.indexOf('btn-') === 0) {
                return id;
            }
            el = el.parentElement;
        }
        return null;
    }

    bridge.ipc = {
        send: function(kind, payload) {
            window.ipc.postMessage(JSON.stringify({
                kind: kind,
                payload: payload === undefined ? null : payload
            }));
        },
        _handlers: {},
        on: function(kind, callback) {
            this._handlers[kind] = callback;
        },
        _dispatch: function(kind, payload) {
            var handler = this._handlers[kind];
            if (handler) {
                handler(payload);
            }
        }
    };

    bridge.isListening = function(kind) {
        return !!listening[kind];
    };

    // Pointers that pressed the model. Their release is always forwarded,
    // even before the host's `listen` update arrives.
    bridge.trackModelPointer = function(pointerId) {
        modelPointers[pointerId] = true;
    };

    bridge.ipc.on('listen', function(p) {
        listening = {};
        suppressed = {};
        (p.kinds || []).forEach(function(k) { listening[k] = true; });
        (p.suppress || []).forEach(function(k) { suppressed[k] = true; });
    });

    window.addEventListener('pointerdown', function(e) {
        activePointers[e.pointerId] = true;
    }, true);

    window.addEventListener('pointermove', function(e) {
        if (!listening.pointer_move) return;
        bridge.ipc.send('pointer_move', { x: e.clientX, y: e.clientY, contacts: activeCount() });
    });

    ['pointerup', 'pointercancel'].forEach(function(type) {
        window.addEventListener(type, function(e) {
            var fromModel = !!modelPointers[e.pointerId];
            delete activePointers[e.pointerId];
            delete modelPointers[e.pointerId];
            if (!listening.pointer_up && !fromModel) return;
            bridge.ipc.send(type === 'pointerup' ? 'pointer_up' : 'pointer_cancel', null);
        });
    });

    window.addEventListener('wheel', function(e) {
        if (!listening.wheel) return;
        if (suppressed.wheel) e.preventDefault();
        bridge.ipc.send('wheel', { delta_y: e.deltaY });
    }, { passive: false });

    [['touchstart', 'touch_start'], ['touchmove', 'touch_move'], ['touchend', 'touch_end'],
     ['touchcancel', 'touch_end']].forEach(function(pair) {
        window.addEventListener(pair[0], function(e) {
            if (!listening.touch) return;
            if (suppressed.touch && e.touches.length + e.changedTouches.length > 1) {
                e.preventDefault();
            }
            bridge.ipc.send(pair[1], { touches: touchList(e) });
        }, { passive: false });
    });

    ['mouseover', 'mouseout'].forEach(function(type) {
        document.addEventListener(type, function(e) {
            if (!listening.ui_hover) return;
            var id = chromeId(e.target);
            if (!id || chromeId(e.relatedTarget) === id) return;
            bridge.ipc.send('ui_hover', { id: id, hovered: type === 'mouseover' });
        });
    });

    function reportViewport() {
        bridge.ipc.send('viewport', { width: window.innerWidth, height: window.innerHeight });
    }
    window.addEventListener('resize', reportViewport);
    document.addEventListener('DOMContentLoaded', function() {
        var elements = [];
        document.querySelectorAll('[id]').forEach(function(el) {
            if (chromeId(el) === el.id) {
                elements.push({ id: el.id, pointer_events: el.style.pointerEvents || null });
            }
        });
        reportViewport();
        bridge.ipc.send('ready', { elements: elements });
    });
})();
"#;

/// JS snippet delivering a message to the page's handler for `kind`.
pub fn js_dispatch_message(kind: &str, payload: &serde_json::Value) -> String {
    let payload_json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!(
        "window.companion.ipc._dispatch({}, {});",
        serde_json::to_string(kind).unwrap_or_else(|_| "\"unknown\"".to_string()),
        payload_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_pointer_message() {
        let msg =
            IpcMessage::parse(r#"{"kind":"pointer_move","payload":{"x":10.5,"y":20,"contacts":2}}"#)
                .unwrap();
        let p: PointerPayload = msg.payload_as().unwrap();
        assert_eq!(p, PointerPayload { x: 10.5, y: 20.0, contacts: 2 });
    }

    #[test]
    fn contacts_default_to_one() {
        let msg =
            IpcMessage::parse(r#"{"kind":"model_pointer_down","payload":{"x":1,"y":2}}"#).unwrap();
        let p: PointerPayload = msg.payload_as().unwrap();
        assert_eq!(p.contacts, 1);
    }

    #[test]
    fn missing_payload_is_none() {
        let msg = IpcMessage::parse(r#"{"kind":"pointer_up"}"#).unwrap();
        assert!(matches!(msg.payload, IpcPayload::None));
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = IpcMessage::parse(r#"{"kind":"exec_shell","payload":"rm -rf /"}"#).unwrap_err();
        assert!(matches!(err, IpcError::KindNotAllowed(ref k) if k == "exec_shell"));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            IpcMessage::parse("{not json"),
            Err(IpcError::InvalidJson(_))
        ));
    }

    #[test]
    fn bad_payload_reports_kind() {
        let msg = IpcMessage::json("wheel", json!({"delta": 3}));
        let err = msg.payload_as::<WheelPayload>().unwrap_err();
        assert!(err.to_string().starts_with("invalid payload for wheel"));
    }

    #[test]
    fn model_loaded_defaults() {
        let msg = IpcMessage::json(
            "model_loaded",
            json!({"path": "models/a.model3.json", "width": 400, "height": 800}),
        );
        let p: ModelLoadedPayload = msg.payload_as().unwrap();
        assert_eq!(p.anchor_x, 0.5);
        assert_eq!(p.anchor_y, 0.5);
        assert_eq!(p.scale, None);
    }

    #[test]
    fn touch_payload_points() {
        let msg = IpcMessage::json(
            "touch_move",
            json!({"touches": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]}),
        );
        let p: TouchPayload = msg.payload_as().unwrap();
        assert_eq!(p.touches, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn ready_payload_lists_elements() {
        let msg = IpcMessage::json(
            "ready",
            json!({"elements": [
                {"id": "lock-icon", "pointer_events": null},
                {"id": "btn-chat", "pointer_events": "auto"}
            ]}),
        );
        let p: ReadyPayload = msg.payload_as().unwrap();
        assert_eq!(p.elements.len(), 2);
        assert_eq!(p.elements[1].pointer_events.as_deref(), Some("auto"));
    }

    #[test]
    fn dispatch_script_escapes() {
        let js = js_dispatch_message("visibility", &json!({"id": "lock-icon\"", "visible": true}));
        assert!(js.starts_with("window.companion.ipc._dispatch(\"visibility\", "));
        assert!(js.contains(r#"lock-icon\""#));
        assert!(js.ends_with(");"));
    }

    #[test]
    fn init_script_covers_forwarded_kinds() {
        for kind in ["pointer_move", "pointer_up", "wheel", "touch_start", "ui_hover", "viewport"] {
            assert!(is_ipc_kind_allowed(kind));
            assert!(IPC_INIT_SCRIPT.contains(&format!("'{kind}'")), "{kind}");
        }
        assert!(IPC_INIT_SCRIPT.contains("passive: false"));
    }

    #[test]
    fn model_pointer_release_bypasses_listen_gate() {
        assert!(IPC_INIT_SCRIPT.contains("bridge.trackModelPointer = function(pointerId)"));
        assert!(IPC_INIT_SCRIPT.contains("if (!listening.pointer_up && !fromModel) return;"));
    }
}
