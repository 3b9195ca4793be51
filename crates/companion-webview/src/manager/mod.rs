//! Overlay WebView lifecycle.
//!
//! `WebViewManager` builds the single `wry::WebView` that hosts the
//! companion page and collects its events for the event loop.

use std::sync::{Arc, Mutex};

use crate::content::ContentProvider;
use crate::events::WebViewEvent;

mod handle;
pub mod handlers;
mod lifecycle;
mod types;

pub use handle::WebViewHandle;
pub use types::WebViewConfig;

/// Scheme of the bundled-asset protocol.
pub const PROTOCOL: &str = "companion";

/// Builds the overlay WebView and buffers its events.
pub struct WebViewManager {
    /// Event sink, drained by the main event loop.
    pub(crate) events: Arc<Mutex<Vec<WebViewEvent>>>,
    content_provider: Option<Arc<ContentProvider>>,
}

impl WebViewManager {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            content_provider: None,
        }
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Record that the overlay was torn down.
    pub fn notify_closed(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.push(WebViewEvent::Closed);
        }
    }
}

impl Default for WebViewManager {
    fn default() -> Self {
        Self::new()
    }
}

/// URL of an asset served through the custom protocol.
pub fn asset_url(path: &str) -> String {
    format!("{PROTOCOL}://localhost/{}", path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_urls() {
        assert_eq!(
            asset_url("overlay/index.html"),
            "companion://localhost/overlay/index.html"
        );
        assert_eq!(asset_url("/a.js"), "companion://localhost/a.js");
    }

    #[test]
    fn drain_empties_buffer() {
        let manager = WebViewManager::new();
        manager.notify_closed();
        assert_eq!(manager.drain_events(), vec![WebViewEvent::Closed]);
        assert!(manager.drain_events().is_empty());
    }
}
