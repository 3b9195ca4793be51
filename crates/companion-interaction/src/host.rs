//! Optional desktop window-management capability.

use companion_common::{DisplayDescriptor, HostDisplay, PlatformError, Point};

/// Result of asking the host to move the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub success: bool,
    /// The window was already on the display containing the point.
    pub same_display: bool,
    /// Scale-factor ratio between the new and old display, if known.
    pub scale_ratio: Option<f64>,
}

/// Multi-monitor window control offered by desktop hosts.
///
/// Coordinates are absolute logical screen coordinates.
pub trait DisplayHost {
    /// Whether the host offers multi-monitor control at all.
    fn is_available(&self) -> bool {
        true
    }

    fn current_display(&self) -> Result<Option<HostDisplay>, PlatformError>;

    /// Screen position of the window's content origin. Hosts that cannot
    /// tell return `None` and the current display's origin is used.
    fn window_origin(&self) -> Option<Point> {
        None
    }

    fn all_displays(&self) -> Result<Vec<DisplayDescriptor>, PlatformError>;

    /// Move the window onto the display containing `(x, y)`.
    fn move_window_to_display(&mut self, x: f64, y: f64) -> Result<MoveOutcome, PlatformError>;
}

/// Stand-in for hosts without window control. Relocation and display
/// hints degrade to no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplayHost;

impl DisplayHost for NoDisplayHost {
    fn is_available(&self) -> bool {
        false
    }

    fn current_display(&self) -> Result<Option<HostDisplay>, PlatformError> {
        Ok(None)
    }

    fn all_displays(&self) -> Result<Vec<DisplayDescriptor>, PlatformError> {
        Ok(Vec::new())
    }

    fn move_window_to_display(&mut self, _x: f64, _y: f64) -> Result<MoveOutcome, PlatformError> {
        Err(PlatformError::NotSupported("window relocation".into()))
    }
}
