//! Gesture and proximity tuning.

use serde::{Deserialize, Serialize};

/// Drag, wheel and pinch behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub wheel_zoom: bool,
    /// Scale multiplier per wheel notch (valid range: 1.01-2.0).
    pub wheel_factor: f64,
    pub touch_zoom: bool,
    /// Lower pinch clamp (valid range: 0.01-1.0).
    pub min_scale: f64,
    /// Upper pinch clamp (valid range: 1.0-10.0).
    pub max_scale: f64,
    /// Trailing-edge delay before a wheel burst is saved (valid range: 50-10000).
    pub save_debounce_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wheel_zoom: true,
            wheel_factor: 1.1,
            touch_zoom: true,
            min_scale: 0.1,
            max_scale: 2.0,
            save_debounce_ms: 500,
        }
    }
}

/// Proximity-driven reveal of the lock icon and floating buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Track the pointer window-wide instead of relying on hit-region
    /// enter/leave alone.
    pub track_proximity: bool,
    /// Distance in pixels from the model bounds that counts as near
    /// (valid range: 0-1000).
    pub proximity_threshold: f64,
    /// Auto-hide delay (valid range: 100-60000).
    pub hide_delay_ms: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            track_proximity: true,
            proximity_threshold: 70.0,
            hide_delay_ms: 1000,
        }
    }
}
