//! Wheel and two-finger pinch scaling.

use companion_common::Point;

/// Scale after one wheel notch. Scrolling up (negative delta) zooms in by
/// `factor`, scrolling down zooms out by it; both axes move together.
/// Returns `None` for a zero or non-finite delta.
pub fn wheel_scale(current: Point, delta_y: f64, factor: f64) -> Option<Point> {
    if !delta_y.is_finite() || delta_y == 0.0 {
        return None;
    }
    let k = if delta_y < 0.0 { factor } else { 1.0 / factor };
    Some(Point::new(current.x * k, current.y * k))
}

/// Distance between the first two contacts.
pub fn two_finger_distance(touches: &[Point]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(a.distance_to(*b)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchBaseline {
    distance: f64,
    scale: Point,
}

/// Two-finger pinch relative to the distance and scale captured when the
/// second finger landed.
#[derive(Debug, Clone)]
pub struct PinchZoom {
    min_scale: f64,
    max_scale: f64,
    baseline: Option<PinchBaseline>,
}

impl PinchZoom {
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            baseline: None,
        }
    }

    pub fn set_limits(&mut self, min_scale: f64, max_scale: f64) {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
    }

    pub fn is_active(&self) -> bool {
        self.baseline.is_some()
    }

    /// Capture the baseline. Needs two contacts a nonzero distance apart.
    pub fn begin(&mut self, touches: &[Point], scale: Point) -> bool {
        match two_finger_distance(touches) {
            Some(distance) if distance.is_finite() && distance > 0.0 => {
                self.baseline = Some(PinchBaseline { distance, scale });
                true
            }
            _ => false,
        }
    }

    /// New scale for the current contacts, clamped per axis.
    pub fn update(&self, touches: &[Point]) -> Option<Point> {
        let baseline = self.baseline?;
        let distance = two_finger_distance(touches)?;
        if !distance.is_finite() {
            return None;
        }
        let ratio = distance / baseline.distance;
        Some(Point::new(
            self.clamp(baseline.scale.x * ratio),
            self.clamp(baseline.scale.y * ratio),
        ))
    }

    /// Returns `true` if a pinch was active.
    pub fn end(&mut self) -> bool {
        self.baseline.take().is_some()
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min_scale, self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touches(distance: f64) -> Vec<Point> {
        vec![Point::new(100.0, 100.0), Point::new(100.0 + distance, 100.0)]
    }

    #[test]
    fn wheel_up_zooms_in_by_factor() {
        let scale = wheel_scale(Point::new(0.5, 0.5), -120.0, 1.1).unwrap();
        assert!((scale.x - 0.55).abs() < 1e-12);
        assert_eq!(scale.x, scale.y);
    }

    #[test]
    fn wheel_down_zooms_out_by_factor() {
        let scale = wheel_scale(Point::new(0.55, 0.55), 3.0, 1.1).unwrap();
        assert!((scale.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn wheel_direction_is_strictly_monotonic_and_positive() {
        let mut scale = Point::new(0.3, 0.3);
        for _ in 0..200 {
            let next = wheel_scale(scale, 1.0, 1.1).unwrap();
            assert!(next.x < scale.x && next.x > 0.0);
            scale = next;
        }
        for _ in 0..50 {
            let next = wheel_scale(scale, -1.0, 1.1).unwrap();
            assert!(next.x > scale.x);
            scale = next;
        }
    }

    #[test]
    fn zero_or_nan_delta_is_ignored() {
        assert_eq!(wheel_scale(Point::new(1.0, 1.0), 0.0, 1.1), None);
        assert_eq!(wheel_scale(Point::new(1.0, 1.0), f64::NAN, 1.1), None);
    }

    #[test]
    fn pinch_scales_with_distance_ratio() {
        let mut pinch = PinchZoom::new(0.1, 2.0);
        assert!(pinch.begin(&touches(100.0), Point::new(0.5, 0.5)));

        let scale = pinch.update(&touches(150.0)).unwrap();
        assert!((scale.x - 0.75).abs() < 1e-12);
    }

    #[test]
    fn pinch_is_clamped() {
        let mut pinch = PinchZoom::new(0.1, 2.0);
        pinch.begin(&touches(100.0), Point::new(0.5, 0.5));

        for d in [0.001, 1.0, 10.0, 50.0, 400.0, 1e6] {
            let scale = pinch.update(&touches(d)).unwrap();
            assert!((0.1..=2.0).contains(&scale.x), "{d} -> {}", scale.x);
            assert!((0.1..=2.0).contains(&scale.y));
        }
        assert_eq!(pinch.update(&touches(1e6)).unwrap().x, 2.0);
        assert_eq!(pinch.update(&touches(0.0)).unwrap().x, 0.1);
    }

    #[test]
    fn pinch_needs_two_distinct_contacts() {
        let mut pinch = PinchZoom::new(0.1, 2.0);
        assert!(!pinch.begin(&[Point::new(1.0, 1.0)], Point::new(1.0, 1.0)));
        assert!(!pinch.begin(&touches(0.0), Point::new(1.0, 1.0)));
        assert!(!pinch.is_active());
        assert_eq!(pinch.update(&touches(10.0)), None);
    }

    #[test]
    fn end_reports_activity_once() {
        let mut pinch = PinchZoom::new(0.1, 2.0);
        pinch.begin(&touches(80.0), Point::new(1.0, 1.0));
        assert!(pinch.end());
        assert!(!pinch.end());
    }
}
