//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Overlay window settings.
///
/// The window is undecorated; `transparent` controls whether the desktop
/// shows through around the avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in logical pixels (valid range: 200-8192).
    pub width: u32,
    /// Initial inner height in logical pixels (valid range: 200-8192).
    pub height: u32,
    pub always_on_top: bool,
    pub transparent: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Companion".into(),
            width: 1280,
            height: 800,
            always_on_top: true,
            transparent: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
