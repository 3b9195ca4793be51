//! WebView bridge hosting the companion overlay page.
//!
//! Wraps the `wry` crate to provide:
//! - A single transparent overlay WebView filling the companion window
//! - Bidirectional IPC (Rust <-> JavaScript) with a kind allowlist
//! - The `companion://` custom protocol serving the overlay assets
//! - Navigation control and page-load events

pub mod content;
pub mod events;
pub mod ipc;
pub mod manager;

pub use content::ContentProvider;
pub use events::{PageLoadState, WebViewEvent};
pub use ipc::{IpcError, IpcMessage, IpcPayload};
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
