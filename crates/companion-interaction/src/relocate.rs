//! Moving the window to the monitor the avatar was dragged onto.

use companion_common::{DisplayDescriptor, Point, Size};
use tracing::{debug, info, warn};

use crate::host::DisplayHost;
use crate::model::AvatarModel;
use crate::persistence::{current_display_origin, PersistenceBridge};

/// First display whose rectangle contains `p`.
pub fn find_display_at(displays: &[DisplayDescriptor], p: Point) -> Option<&DisplayDescriptor> {
    displays.iter().find(|d| d.contains(p))
}

fn within_viewport(p: Point, viewport: Size) -> bool {
    p.x >= 0.0 && p.x <= viewport.width && p.y >= 0.0 && p.y <= viewport.height
}

/// After a drag, follow the model onto another display if its center left
/// the window.
///
/// On a successful switch the model is re-anchored to the new display and
/// saved with that display's origin. Returns `true` only in that case, so
/// the caller can skip its own save. Every failure path leaves the window
/// and model untouched.
pub fn relocate_after_drag(
    model: &mut dyn AvatarModel,
    host: &mut dyn DisplayHost,
    viewport: Size,
    persistence: &mut PersistenceBridge,
) -> bool {
    if !host.is_available() {
        return false;
    }
    let Some(bounds) = model.bounds() else {
        return false;
    };
    let center = bounds.center();
    if !center.is_finite() || within_viewport(center, viewport) {
        return false;
    }

    let displays = match host.all_displays() {
        Ok(displays) => displays,
        Err(e) => {
            warn!("display enumeration failed: {e}");
            return false;
        }
    };
    if displays.len() <= 1 {
        return false;
    }

    let Some(origin) = current_display_origin(host) else {
        debug!("current display origin unknown, not relocating");
        return false;
    };
    let window = host.window_origin().unwrap_or(origin);
    let absolute = Point::new(window.x + center.x, window.y + center.y);

    let Some(target) = find_display_at(&displays, absolute) else {
        debug!(?absolute, "model center is off every display");
        return false;
    };
    if target.origin() == origin {
        return false;
    }
    let target = target.clone();

    let outcome = match host.move_window_to_display(absolute.x, absolute.y) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(display = %target.id, "window move failed: {e}");
            return false;
        }
    };
    if !outcome.success || outcome.same_display {
        debug!(?outcome, "window stayed on its display");
        return false;
    }

    let local = Point::new(absolute.x - target.screen_x, absolute.y - target.screen_y);
    let position = model.position_for_center(local);
    model.set_position(position);
    info!(
        display = %target.id,
        scale_ratio = ?outcome.scale_ratio,
        x = position.x,
        y = position.y,
        "moved companion to display"
    );

    persistence.persist_with_origin(model, Some(target.origin()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MoveOutcome, NoDisplayHost};
    use crate::test_support::{assert_no_save, next_save, MockHost, MockModel, RecordingStore};
    use std::time::Duration;
    use tokio::runtime::Handle;

    const VIEWPORT: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };

    fn bridge() -> (
        PersistenceBridge,
        tokio::sync::mpsc::UnboundedReceiver<companion_common::PreferenceRecord>,
    ) {
        let (store, rx) = RecordingStore::new();
        (
            PersistenceBridge::new(store, Handle::current(), Duration::from_millis(500)),
            rx,
        )
    }

    #[test]
    fn first_containing_display_wins() {
        let host = MockHost::dual();
        let found = find_display_at(&host.displays, Point::new(2000.0, 10.0)).unwrap();
        assert_eq!(found.id, "right");
        assert!(find_display_at(&host.displays, Point::new(-5.0, 10.0)).is_none());
    }

    #[tokio::test]
    async fn model_inside_viewport_stays() {
        let (mut persistence, mut rx) = bridge();
        let mut host = MockHost::dual();
        let mut model = MockModel::new(Point::new(1920.0, 540.0));

        assert!(!relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        assert!(host.moves.borrow().is_empty());
        assert_no_save(&mut rx).await;
    }

    #[tokio::test]
    async fn model_past_edge_moves_window_and_reanchors() {
        let (mut persistence, mut rx) = bridge();
        let mut host = MockHost::dual();
        let mut model = MockModel::new(Point::new(2100.0, 500.0));

        assert!(relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        assert_eq!(host.moves.borrow().as_slice(), &[Point::new(2100.0, 500.0)]);
        assert_eq!(model.position, Point::new(180.0, 500.0));

        let saved = next_save(&mut rx).await.unwrap();
        assert_eq!(saved.position, Point::new(180.0, 500.0));
        assert_eq!(saved.display_origin, Some(Point::new(1920.0, 0.0)));
        assert_no_save(&mut rx).await;
    }

    #[tokio::test]
    async fn offset_window_maps_through_its_own_origin() {
        let (mut persistence, mut rx) = bridge();
        let mut host = MockHost::dual();
        host.window_origin = Some(Point::new(800.0, 100.0));
        let viewport = Size::new(1280.0, 800.0);
        // Window x 1300 is screen x 2100, on the right display.
        let mut model = MockModel::new(Point::new(1300.0, 400.0));

        assert!(relocate_after_drag(&mut model, &mut host, viewport, &mut persistence));
        assert_eq!(host.moves.borrow().as_slice(), &[Point::new(2100.0, 500.0)]);
        assert_eq!(model.position, Point::new(180.0, 500.0));
        let saved = next_save(&mut rx).await.unwrap();
        assert_eq!(saved.display_origin, Some(Point::new(1920.0, 0.0)));
    }

    #[tokio::test]
    async fn offset_window_still_on_its_display_stays() {
        let (mut persistence, mut rx) = bridge();
        let mut host = MockHost::dual();
        host.window_origin = Some(Point::new(-400.0, 0.0));
        let viewport = Size::new(1280.0, 800.0);
        // Past the window's right edge, but screen x 1000 is still the left display.
        let mut model = MockModel::new(Point::new(1400.0, 400.0));

        assert!(!relocate_after_drag(&mut model, &mut host, viewport, &mut persistence));
        assert!(host.moves.borrow().is_empty());
        assert_no_save(&mut rx).await;
    }

    #[tokio::test]
    async fn reanchor_accounts_for_anchor_and_scale() {
        let (mut persistence, _rx) = bridge();
        let mut host = MockHost::dual();
        let mut model = MockModel::new(Point::new(2100.0, 900.0));
        model.anchor = Point::new(0.5, 1.0);
        model.scale = Point::new(0.5, 0.5);
        // bounds: x 2050..2150, y 700..900, center (2100, 800)

        assert!(relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        let center = model.bounds().unwrap().center();
        assert!((center.x - 180.0).abs() < 1e-9);
        assert!((center.y - 800.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn single_display_does_nothing() {
        let (mut persistence, mut rx) = bridge();
        let mut host = MockHost::single();
        let mut model = MockModel::new(Point::new(2100.0, 500.0));

        assert!(!relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        assert!(host.moves.borrow().is_empty());
        assert_no_save(&mut rx).await;
    }

    #[tokio::test]
    async fn no_host_api_does_nothing() {
        let (mut persistence, _rx) = bridge();
        let mut model = MockModel::new(Point::new(5000.0, 500.0));
        assert!(!relocate_after_drag(
            &mut model,
            &mut NoDisplayHost,
            VIEWPORT,
            &mut persistence
        ));
        assert_eq!(model.position, Point::new(5000.0, 500.0));
    }

    #[tokio::test]
    async fn off_every_display_does_nothing() {
        let (mut persistence, _rx) = bridge();
        let mut host = MockHost::dual();
        let mut model = MockModel::new(Point::new(500.0, 1500.0));

        assert!(!relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        assert!(host.moves.borrow().is_empty());
    }

    #[tokio::test]
    async fn failed_move_leaves_model() {
        let (mut persistence, mut rx) = bridge();
        let mut host = MockHost::dual();
        host.outcome = None;
        let mut model = MockModel::new(Point::new(2100.0, 500.0));

        assert!(!relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        assert_eq!(host.moves.borrow().len(), 1);
        assert_eq!(model.position, Point::new(2100.0, 500.0));
        assert_no_save(&mut rx).await;
    }

    #[tokio::test]
    async fn same_display_outcome_is_no_switch() {
        let (mut persistence, _rx) = bridge();
        let mut host = MockHost::dual();
        host.outcome = Some(MoveOutcome {
            success: true,
            same_display: true,
            scale_ratio: None,
        });
        let mut model = MockModel::new(Point::new(2100.0, 500.0));

        assert!(!relocate_after_drag(&mut model, &mut host, VIEWPORT, &mut persistence));
        assert_eq!(model.position, Point::new(2100.0, 500.0));
    }
}
