//! Event-loop polling: page messages, background results, config reloads
//! and controller timers.

use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use tokio::sync::broadcast;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use companion_common::events::Event;
use companion_webview::{PageLoadState, WebViewEvent};

use super::core::CompanionApp;
use super::init::window_level;
use super::page::PageCommand;
use super::types::POLL_INTERVAL;

/// When to wake next: the controller deadline if it comes before the
/// regular poll, never in the past.
pub(super) fn next_wake(now: Instant, deadline: Option<Instant>) -> Instant {
    let poll = now + POLL_INTERVAL;
    match deadline {
        Some(d) => d.clamp(now, poll),
        None => poll,
    }
}

impl CompanionApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_webview_events();
            self.poll_restores();
            self.poll_config_reload();
            self.poll_event_bus();
        }

        if let Some(controller) = self.controller.as_mut() {
            controller.tick(Instant::now());
        }
        self.flush_page();

        if self.should_exit {
            event_loop.exit();
            return;
        }

        let deadline = self.controller.as_ref().and_then(|c| c.next_deadline());
        event_loop.set_control_flow(ControlFlow::WaitUntil(next_wake(Instant::now(), deadline)));
    }

    fn poll_webview_events(&mut self) {
        let events = match self.webviews.as_ref() {
            Some(manager) => manager.drain_events(),
            None => return,
        };
        for event in events {
            match event {
                WebViewEvent::IpcMessage { body } => self.handle_ipc_message(&body),
                WebViewEvent::PageLoad { state, url } => {
                    tracing::debug!(?state, %url, "overlay page load");
                    if state == PageLoadState::Started {
                        // The page restarts with an empty listener table.
                        self.announced_kinds = None;
                    }
                }
                WebViewEvent::NavigationRequested { url } => {
                    tracing::debug!(%url, "overlay navigation");
                }
                WebViewEvent::Closed => {
                    tracing::info!("overlay WebView closed");
                    self.should_exit = true;
                }
            }
        }
    }

    /// Apply saved preferences loaded in the background.
    fn poll_restores(&mut self) {
        loop {
            let restored = match self.restore_rx.try_recv() {
                Ok(r) => r,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            let Some(controller) = self.controller.as_mut() else {
                continue;
            };
            match restored.result {
                Ok(Some(record)) => {
                    controller.restore(&record);
                }
                Ok(None) => {
                    tracing::debug!(model = %restored.model_path, "no saved preferences");
                }
                Err(e) => {
                    tracing::warn!(model = %restored.model_path, "failed to load preferences: {e}");
                }
            }
        }
    }

    fn poll_config_reload(&mut self) {
        let Some(rx) = self.config_rx.as_mut() else {
            return;
        };
        match rx.has_changed() {
            Ok(true) => {}
            Ok(false) => return,
            Err(_) => {
                tracing::debug!("config watcher stopped");
                self.config_rx = None;
                return;
            }
        }
        let config = rx.borrow_and_update().clone();
        if config == self.config {
            return;
        }

        let model_changed = config.model.path != self.config.model.path;
        self.config = config;

        if let Some(controller) = self.controller.as_mut() {
            controller.reconfigure(&self.config);
        }
        if let Some(window) = self.window.as_ref() {
            window.set_window_level(window_level(self.config.window.always_on_top));
        }
        if model_changed {
            self.outbox.push(PageCommand::LoadModel {
                path: self.config.model.path.clone(),
            });
        }
        self.event_bus.publish(Event::ConfigReloaded);
        tracing::info!("config reloaded");
    }

    fn poll_event_bus(&mut self) {
        loop {
            match self.bus_rx.try_recv() {
                Ok(Event::DisplayChanged { display_id }) => {
                    if let Some(controller) = self.controller.as_mut() {
                        controller.on_display_changed(display_id.as_deref());
                    }
                }
                Ok(Event::Shutdown) => self.should_exit = true,
                Ok(event) => tracing::debug!(?event, "event"),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "event bus lagged");
                }
                Err(_) => break,
            }
        }
    }

    /// Announce listener changes and deliver queued commands to the page.
    pub(super) fn flush_page(&mut self) {
        if let Some(controller) = self.controller.as_ref() {
            let active = controller.active_kinds();
            if self.announced_kinds.as_ref() != Some(&active) {
                self.outbox.push(PageCommand::listen(
                    &active,
                    &controller.suppressed_default_kinds(),
                ));
                self.announced_kinds = Some(active);
            }
        }

        if self.outbox.is_empty() {
            return;
        }
        let commands = self.outbox.take();
        let Some(overlay) = self.overlay.as_ref() else {
            return;
        };
        for command in commands {
            if let Err(e) = overlay.send_ipc(command.kind(), &command.payload()) {
                tracing::warn!(kind = command.kind(), "failed to send page command: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn idle_wakes_at_poll_interval() {
        let now = Instant::now();
        assert_eq!(next_wake(now, None), now + POLL_INTERVAL);
    }

    #[test]
    fn near_deadline_wins() {
        let now = Instant::now();
        let soon = now + Duration::from_millis(2);
        assert_eq!(next_wake(now, Some(soon)), soon);
    }

    #[test]
    fn far_deadline_is_capped() {
        let now = Instant::now();
        assert_eq!(
            next_wake(now, Some(now + Duration::from_secs(1))),
            now + POLL_INTERVAL
        );
    }

    #[test]
    fn overdue_deadline_wakes_now() {
        let now = Instant::now() + Duration::from_secs(1);
        let past = now - Duration::from_millis(100);
        assert_eq!(next_wake(now, Some(past)), now);
    }

    #[test]
    fn flush_without_overlay_drops_commands() {
        let mut app = crate::app_state::core::test_app();
        app.outbox.push(PageCommand::LoadModel { path: "a".into() });
        app.flush_page();
        assert!(app.outbox.is_empty());
    }

    #[test]
    fn shutdown_event_requests_exit() {
        let mut app = crate::app_state::core::test_app();
        app.event_bus.publish(Event::Shutdown);
        app.poll_event_bus();
        assert!(app.should_exit);
    }

    #[test]
    fn restore_without_controller_is_dropped() {
        let mut app = crate::app_state::core::test_app();
        app.restore_tx
            .send(crate::app_state::types::RestoreResult {
                model_path: "m".into(),
                result: Ok(None),
            })
            .unwrap();
        app.poll_restores();
        assert!(app.restore_rx.try_recv().is_err());
    }
}
