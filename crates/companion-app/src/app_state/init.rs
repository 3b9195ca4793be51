//! Window creation, overlay WebView setup and controller construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes, WindowLevel};

use companion_interaction::PersistenceBridge;
use companion_webview::manager::asset_url;
use companion_webview::{ContentProvider, WebViewConfig, WebViewManager};

use super::core::{CompanionApp, Controller};
use super::display_host::{fill_current_monitor, WinitDisplayHost};
use super::overlay_ui::OverlayUi;

/// Window level for the `always_on_top` setting.
pub(super) fn window_level(always_on_top: bool) -> WindowLevel {
    if always_on_top {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    }
}

/// WebView bounds filling a window of `size`.
pub(super) fn overlay_bounds(size: PhysicalSize<u32>) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(size.width, size.height)),
    }
}

/// Resolve the asset directory; relative paths are taken from the
/// working directory.
fn resolve_assets_dir(dir: &str) -> PathBuf {
    let path = Path::new(dir);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

impl CompanionApp {
    /// Create the overlay window, its WebView and the interaction
    /// controller. Returns `false` if the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let window_cfg = &self.config.window;
        let attrs = WindowAttributes::default()
            .with_title(window_cfg.title.clone())
            .with_transparent(window_cfg.transparent)
            .with_decorations(false)
            .with_window_level(window_level(window_cfg.always_on_top))
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(window_cfg.width),
                f64::from(window_cfg.height),
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        if !fill_current_monitor(&window) {
            tracing::warn!("current monitor unknown, keeping the configured window size");
        }

        if !self.initialize_overlay(&window) {
            return false;
        }

        let Some(controller) = self.build_controller(&window) else {
            return false;
        };
        self.controller = Some(controller);
        self.current_monitor = window.current_monitor().and_then(|m| m.name());
        self.window = Some(window);
        tracing::info!("Overlay window created");
        true
    }

    /// Build the overlay WebView serving the page from `model.assets_dir`.
    fn initialize_overlay(&mut self, window: &Arc<Window>) -> bool {
        let assets = resolve_assets_dir(&self.config.model.assets_dir);
        if !assets.is_dir() {
            tracing::warn!(
                path = %assets.display(),
                "Assets directory not found, the overlay page will fail to load"
            );
        }

        let mut manager = WebViewManager::new();
        manager.set_content_provider(ContentProvider::new(&assets));

        let mut webview_config = WebViewConfig::with_url(asset_url(&self.config.model.page));
        webview_config.transparent = self.config.window.transparent;
        webview_config.devtools = cfg!(debug_assertions);

        let bounds = overlay_bounds(window.inner_size());
        match manager.create(window.as_ref(), bounds, webview_config) {
            Ok(handle) => {
                tracing::info!(
                    assets = %assets.display(),
                    url = handle.current_url(),
                    "Overlay WebView created"
                );
                self.overlay = Some(handle);
                self.webviews = Some(manager);
                true
            }
            Err(e) => {
                tracing::error!("Failed to create overlay WebView: {e}");
                false
            }
        }
    }

    fn build_controller(&self, window: &Arc<Window>) -> Option<Controller> {
        let Some(runtime) = self.tokio_runtime.as_ref() else {
            tracing::error!("Async runtime already shut down");
            return None;
        };
        let persistence = PersistenceBridge::new(
            self.store.clone(),
            runtime.handle().clone(),
            Duration::from_millis(self.config.interaction.save_debounce_ms),
        );
        Some(Controller::new(
            &self.config,
            OverlayUi::new(self.outbox.clone()),
            Box::new(WinitDisplayHost::new(Arc::clone(window))),
            persistence,
        ))
    }

    /// Keep the WebView covering the whole window.
    pub(super) fn sync_overlay_bounds(&self) {
        let (Some(window), Some(overlay)) = (self.window.as_ref(), self.overlay.as_ref()) else {
            return;
        };
        if let Err(e) = overlay.set_bounds(overlay_bounds(window.inner_size())) {
            tracing::warn!("Failed to resize overlay WebView: {e}");
        }
    }
}
