//! Settled-gesture saves to the preference store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use companion_common::{Point, PreferenceRecord, PreferenceStore};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::host::DisplayHost;
use crate::model::AvatarModel;
use crate::timer::CoalescingTimer;

/// Origin of the display the window is on, if the host can tell.
pub fn current_display_origin(host: &dyn DisplayHost) -> Option<Point> {
    if !host.is_available() {
        return None;
    }
    match host.current_display() {
        Ok(display) => display.and_then(|d| d.origin()),
        Err(e) => {
            debug!("current display query failed: {e}");
            None
        }
    }
}

/// Writes the model transform to a [`PreferenceStore`] without blocking
/// input handling.
///
/// Saves are queued to a writer task on `runtime` and never report back; a
/// failed save is logged and the next settle writes again. The writer
/// handles one record at a time, so the last submitted transform is the
/// one left in the store.
pub struct PersistenceBridge {
    saves: mpsc::UnboundedSender<PreferenceRecord>,
    save_timer: CoalescingTimer,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn PreferenceStore>, runtime: Handle, debounce: Duration) -> Self {
        let (saves, rx) = mpsc::unbounded_channel();
        runtime.spawn(write_preferences(store, rx));
        Self {
            saves,
            save_timer: CoalescingTimer::new(debounce),
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.save_timer.set_delay(debounce);
    }

    /// Arm (or re-arm) the trailing-edge save.
    pub fn schedule_save(&mut self, now: Instant) {
        self.save_timer.arm(now);
    }

    pub fn cancel_pending(&mut self) {
        self.save_timer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.save_timer.is_armed()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.save_timer.deadline()
    }

    /// Whether the debounced save should run now. Consumes the deadline.
    pub fn save_due(&mut self, now: Instant) -> bool {
        self.save_timer.fire_if_due(now)
    }

    /// Save now, with the display-origin hint from `host`.
    pub fn persist(&mut self, model: &dyn AvatarModel, host: &dyn DisplayHost) -> bool {
        self.persist_with_origin(model, current_display_origin(host))
    }

    /// Save now with an explicit display origin. Supersedes a pending
    /// debounced save.
    pub fn persist_with_origin(
        &mut self,
        model: &dyn AvatarModel,
        display_origin: Option<Point>,
    ) -> bool {
        self.save_timer.cancel();
        let record = PreferenceRecord {
            model_path: model.model_path().to_string(),
            position: model.position(),
            scale: model.scale(),
            rotation: None,
            display_origin,
        };
        self.submit(record)
    }

    fn submit(&self, record: PreferenceRecord) -> bool {
        if !record.is_persistable() {
            warn!(
                model = %record.model_path,
                position = ?record.position,
                scale = ?record.scale,
                "skipping save of non-finite transform"
            );
            return false;
        }

        if self.saves.send(record).is_err() {
            warn!("preference writer stopped, save dropped");
            return false;
        }
        true
    }
}

/// Writer task; ends when the bridge is dropped and the queue drains.
async fn write_preferences(
    store: Arc<dyn PreferenceStore>,
    mut rx: mpsc::UnboundedReceiver<PreferenceRecord>,
) {
    while let Some(record) = rx.recv().await {
        let model = record.model_path.clone();
        match store.save(record).await {
            Ok(true) => debug!(%model, "preferences saved"),
            Ok(false) => warn!(%model, "preference store declined save"),
            Err(e) => warn!(%model, "failed to save preferences: {e}"),
        }
    }
    debug!("preference writer finished");
}
