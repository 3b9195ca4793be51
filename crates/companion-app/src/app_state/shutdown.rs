//! Graceful shutdown: cancel timers, tear down the overlay, stop the runtime.

use std::time::Duration;

use companion_common::events::Event;

use super::core::CompanionApp;

impl CompanionApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// Order matters:
    /// 1. Drop the controller (a pending debounced save is dropped)
    /// 2. Destroy the overlay WebView
    /// 3. Shut down the tokio runtime, giving in-flight saves time to land
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");
        self.event_bus.publish(Event::Shutdown);

        // 1. Interaction controller
        if let Some(mut controller) = self.controller.take() {
            controller.unload_model();
        }

        // 2. Overlay page
        self.overlay = None;
        if let Some(manager) = self.webviews.take() {
            manager.notify_closed();
        }
        self.outbox.take();
        self.announced_kinds = None;

        // 3. Async runtime
        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }

        self.should_exit = true;
        tracing::info!("Graceful shutdown complete");
    }
}
