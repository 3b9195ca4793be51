//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the overlay window, its WebView and the interaction
//! controller, and shuttles messages between them.

mod core;
mod display_host;
mod event_handler;
mod init;
mod ipc_dispatch;
mod overlay_ui;
mod page;
mod polling;
mod shutdown;
mod types;
mod web_model;

pub use core::CompanionApp;
