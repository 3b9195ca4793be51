//! CompanionApp struct definition and constructor.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, watch};
use winit::window::Window;

use companion_common::events::{Event, EventBus};
use companion_config::schema::{CompanionConfig, StorageConfig};
use companion_interaction::{InteractionController, ListenerKind};
use companion_platform::JsonPreferenceStore;
use companion_webview::{WebViewHandle, WebViewManager};

use super::overlay_ui::OverlayUi;
use super::page::PageOutbox;
use super::types::{RestoreResult, EVENT_BUS_CAPACITY};
use super::web_model::WebModel;

pub(super) type Controller = InteractionController<WebModel, OverlayUi>;

/// Top-level application state.
pub struct CompanionApp {
    pub(super) config: CompanionConfig,
    pub(super) config_rx: Option<watch::Receiver<CompanionConfig>>,
    pub(super) event_bus: EventBus,
    pub(super) bus_rx: broadcast::Receiver<Event>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,
    /// Monitor the window was last seen on.
    pub(super) current_monitor: Option<String>,

    // Overlay page
    pub(super) webviews: Option<WebViewManager>,
    pub(super) overlay: Option<WebViewHandle>,
    pub(super) outbox: PageOutbox,
    /// Listener kinds last announced to the page.
    pub(super) announced_kinds: Option<BTreeSet<ListenerKind>>,

    // Interaction
    pub(super) controller: Option<Controller>,
    pub(super) store: Arc<JsonPreferenceStore>,
    pub(super) restore_tx: mpsc::Sender<RestoreResult>,
    pub(super) restore_rx: mpsc::Receiver<RestoreResult>,

    pub(super) tokio_runtime: Option<tokio::runtime::Runtime>,

    // Whether the app should exit
    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl CompanionApp {
    pub fn new(
        config: CompanionConfig,
        config_rx: Option<watch::Receiver<CompanionConfig>>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let store = Arc::new(JsonPreferenceStore::new(preferences_path(&config.storage)));
        tracing::info!(path = %store.path().display(), "preference store ready");

        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let bus_rx = event_bus.subscribe();
        let (restore_tx, restore_rx) = mpsc::channel();

        Self {
            config,
            config_rx,
            event_bus,
            bus_rx,
            window: None,
            current_monitor: None,
            webviews: None,
            overlay: None,
            outbox: PageOutbox::new(),
            announced_kinds: None,
            controller: None,
            store,
            restore_tx,
            restore_rx,
            tokio_runtime: Some(runtime),
            should_exit: false,
            last_poll: Instant::now(),
        }
    }
}

/// Where preferences are stored: the configured file, else the platform
/// data directory.
pub(super) fn preferences_path(storage: &StorageConfig) -> PathBuf {
    if let Some(path) = storage.preferences_file.as_deref() {
        return PathBuf::from(path);
    }
    companion_platform::preferences_file().unwrap_or_else(|e| {
        tracing::warn!("no data directory ({e}), storing preferences next to the binary");
        PathBuf::from("preferences.json")
    })
}

#[cfg(test)]
pub(super) fn test_app() -> CompanionApp {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime");
    let mut config = CompanionConfig::default();
    config.storage.preferences_file = Some(
        std::env::temp_dir()
            .join("companion-app-test-preferences.json")
            .to_string_lossy()
            .into_owned(),
    );
    CompanionApp::new(config, None, runtime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_preferences_file_wins() {
        let storage = StorageConfig {
            preferences_file: Some("/tmp/prefs.json".into()),
        };
        assert_eq!(preferences_path(&storage), PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn default_preferences_file_is_json() {
        let path = preferences_path(&StorageConfig::default());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn fresh_app_has_no_window_or_controller() {
        let app = test_app();
        assert!(app.window.is_none());
        assert!(app.overlay.is_none());
        assert!(app.controller.is_none());
        assert!(app.tokio_runtime.is_some());
        assert!(!app.should_exit);
    }
}
