//! WebView event types.

use serde::{Deserialize, Serialize};

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events emitted by the overlay WebView, drained by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WebViewEvent {
    PageLoad { state: PageLoadState, url: String },
    /// A JSON message posted by the page. Already checked to be valid JSON.
    IpcMessage { body: String },
    /// An allowed navigation; blocked ones never surface.
    NavigationRequested { url: String },
    Closed,
}
