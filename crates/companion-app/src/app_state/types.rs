//! Internal types and constants for the app state module.

use std::time::Duration;

use companion_common::{PreferenceRecord, StorageError};

/// Result of loading a model's saved preferences off the event loop.
#[derive(Debug)]
pub(super) struct RestoreResult {
    pub model_path: String,
    pub result: Result<Option<PreferenceRecord>, StorageError>,
}

/// How often to poll for events (approx 120 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Capacity of the in-process event bus.
pub(super) const EVENT_BUS_CAPACITY: usize = 64;
