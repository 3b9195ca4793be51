use serde::{Deserialize, Serialize};

use super::core::{Point, Rect};

/// One physical monitor as reported by the host, in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayDescriptor {
    pub id: String,
    pub screen_x: f64,
    pub screen_y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayDescriptor {
    pub fn rect(&self) -> Rect {
        Rect::new(self.screen_x, self.screen_y, self.width, self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.screen_x, self.screen_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.rect().contains(p)
    }
}

/// Answer to the host's "current display" query.
///
/// Some hosts report the origin directly, others only the display bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostDisplay {
    pub id: Option<String>,
    pub screen_x: Option<f64>,
    pub screen_y: Option<f64>,
    pub bounds: Option<Rect>,
}

impl HostDisplay {
    /// Display origin in absolute screen coordinates, preferring the direct
    /// origin fields over the bounds.
    pub fn origin(&self) -> Option<Point> {
        match (self.screen_x, self.screen_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => self.bounds.map(|b| Point::new(b.x, b.y)),
        }
    }
}
