//! Multi-monitor window control on top of winit.

use std::sync::Arc;

use companion_common::{DisplayDescriptor, HostDisplay, PlatformError, Point};
use companion_interaction::{DisplayHost, MoveOutcome};
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::monitor::MonitorHandle;
use winit::window::Window;

/// A monitor described in logical coordinates, with its scale factor.
#[derive(Debug, Clone, PartialEq)]
struct Monitor {
    descriptor: DisplayDescriptor,
    scale_factor: f64,
}

/// Converts a monitor's physical geometry to logical coordinates using its
/// own scale factor.
fn describe(
    id: String,
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
    scale_factor: f64,
) -> Monitor {
    let position: LogicalPosition<f64> = position.to_logical(scale_factor);
    let size: LogicalSize<f64> = size.to_logical(scale_factor);
    Monitor {
        descriptor: DisplayDescriptor {
            id,
            screen_x: position.x,
            screen_y: position.y,
            width: size.width,
            height: size.height,
        },
        scale_factor,
    }
}

fn monitor_id(handle: &MonitorHandle, index: usize) -> String {
    handle.name().unwrap_or_else(|| format!("display-{index}"))
}

fn describe_handle(handle: &MonitorHandle, index: usize) -> Monitor {
    describe(
        monitor_id(handle, index),
        handle.position(),
        handle.size(),
        handle.scale_factor(),
    )
}

fn logical_point(position: PhysicalPosition<i32>, scale_factor: f64) -> Point {
    let position: LogicalPosition<f64> = position.to_logical(scale_factor);
    Point::new(position.x, position.y)
}

/// Place `window` at `display`'s origin and size it to the display.
fn fill_display(window: &Window, display: &DisplayDescriptor) {
    window.set_outer_position(LogicalPosition::new(display.screen_x, display.screen_y));
    // Some platforms apply the size asynchronously; the Resized event
    // reports the final viewport.
    let _ = window.request_inner_size(LogicalSize::new(display.width, display.height));
}

/// Cover the monitor the window opened on. Returns `false` when the
/// platform does not report one.
pub(super) fn fill_current_monitor(window: &Window) -> bool {
    let Some(handle) = window.current_monitor() else {
        return false;
    };
    let monitor = describe_handle(&handle, 0);
    fill_display(window, &monitor.descriptor);
    tracing::debug!(display = %monitor.descriptor.id, "overlay sized to its display");
    true
}

/// Plan a move of the window onto the display containing `target`.
///
/// Returns the destination monitor, or `None` when no display contains
/// the point.
fn plan_move<'a>(monitors: &'a [Monitor], target: Point) -> Option<&'a Monitor> {
    monitors.iter().find(|m| m.descriptor.contains(target))
}

/// [`DisplayHost`] backed by the overlay window.
///
/// The overlay is sized to cover its display at startup, and moving it
/// means placing it at the destination display's origin and resizing it to
/// that display. The window's real position is still reported, so a window
/// the platform placed elsewhere maps to screen coordinates correctly.
pub(super) struct WinitDisplayHost {
    window: Arc<Window>,
}

impl WinitDisplayHost {
    pub(super) fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.window
            .available_monitors()
            .enumerate()
            .map(|(i, handle)| describe_handle(&handle, i))
            .collect()
    }

    fn current_monitor(&self) -> Option<Monitor> {
        let current = self.window.current_monitor()?;
        let monitors: Vec<MonitorHandle> = self.window.available_monitors().collect();
        let index = monitors.iter().position(|m| *m == current).unwrap_or(0);
        Some(describe_handle(&current, index))
    }
}

impl DisplayHost for WinitDisplayHost {
    fn current_display(&self) -> Result<Option<HostDisplay>, PlatformError> {
        Ok(self.current_monitor().map(|m| HostDisplay {
            id: Some(m.descriptor.id.clone()),
            screen_x: Some(m.descriptor.screen_x),
            screen_y: Some(m.descriptor.screen_y),
            bounds: Some(m.descriptor.rect()),
        }))
    }

    fn window_origin(&self) -> Option<Point> {
        let position = self.window.inner_position().ok()?;
        Some(logical_point(position, self.window.scale_factor()))
    }

    fn all_displays(&self) -> Result<Vec<DisplayDescriptor>, PlatformError> {
        Ok(self.monitors().into_iter().map(|m| m.descriptor).collect())
    }

    fn move_window_to_display(&mut self, x: f64, y: f64) -> Result<MoveOutcome, PlatformError> {
        let monitors = self.monitors();
        let Some(target) = plan_move(&monitors, Point::new(x, y)) else {
            return Ok(MoveOutcome {
                success: false,
                same_display: false,
                scale_ratio: None,
            });
        };

        let current = self.current_monitor();
        if current.as_ref() == Some(target) {
            return Ok(MoveOutcome {
                success: true,
                same_display: true,
                scale_ratio: Some(1.0),
            });
        }

        fill_display(&self.window, &target.descriptor);
        tracing::debug!(display = %target.descriptor.id, "window moved to display");

        Ok(MoveOutcome {
            success: true,
            same_display: false,
            scale_ratio: current.map(|c| target.scale_factor / c.scale_factor),
        })
    }
}
