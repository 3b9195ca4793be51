//! Avatar model configuration.

use serde::{Deserialize, Serialize};

/// Which model to load and where the overlay page lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model file, relative to `assets_dir`. Also the key under which
    /// position and scale are persisted.
    pub path: String,
    /// Overlay page that hosts the renderer, relative to `assets_dir`.
    pub page: String,
    /// Asset root served through the `companion://` protocol. Relative
    /// paths resolve against the working directory.
    pub assets_dir: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/default/default.model3.json".into(),
            page: "overlay/index.html".into(),
            assets_dir: "assets".into(),
        }
    }
}
