//! Configuration schema types for the companion overlay.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod interaction;
mod model;
mod system;
mod window;

pub use interaction::*;
pub use model::*;
pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    pub model: ModelConfig,
    pub window: WindowConfig,
    pub interaction: InteractionConfig,
    pub focus: FocusConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
