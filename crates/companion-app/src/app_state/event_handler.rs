//! `ApplicationHandler` implementation for the winit event loop.

use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use companion_common::events::Event;
use companion_common::Size;
use companion_interaction::InputEvent;

use super::core::CompanionApp;

impl ApplicationHandler for CompanionApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.sync_overlay_bounds();
                    self.on_viewport_changed();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.sync_overlay_bounds();
                self.on_viewport_changed();
            }

            WindowEvent::Moved(_) => {
                self.check_display_change();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl CompanionApp {
    /// Tell the controller the logical viewport size.
    fn on_viewport_changed(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        if let Some(controller) = self.controller.as_mut() {
            controller.handle(
                InputEvent::Resized {
                    viewport: Size::new(size.width, size.height),
                },
                Instant::now(),
            );
        }
    }

    /// Publish a display change when the window ended up on another monitor.
    fn check_display_change(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let monitor = window.current_monitor().and_then(|m| m.name());
        if monitor == self.current_monitor {
            return;
        }
        self.current_monitor = monitor.clone();
        self.event_bus.publish(Event::DisplayChanged {
            display_id: monitor,
        });
    }
}
