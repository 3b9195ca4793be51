//! The renderer's model object, as seen by the interaction layer.

use companion_common::{Point, Rect, Size};

/// Snapshot of a model's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transform {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
    }
}

/// A renderer-owned avatar.
///
/// `position` is the window-space location of the anchor point; `anchor`
/// is that point's ratio within the unscaled `intrinsic_size`.
pub trait AvatarModel {
    /// Key under which this model's preferences are stored.
    fn model_path(&self) -> &str;

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    fn scale(&self) -> Point;

    fn set_scale(&mut self, scale: Point);

    fn anchor(&self) -> Point;

    fn intrinsic_size(&self) -> Size;

    /// Direct the model's gaze at a window-space point.
    fn focus(&mut self, target: Point);

    /// Axis-aligned bounds in window space, `None` while the renderer
    /// cannot report them.
    fn bounds(&self) -> Option<Rect> {
        let pos = self.position();
        let scale = self.scale();
        let anchor = self.anchor();
        let size = self.intrinsic_size();
        let width = size.width * scale.x;
        let height = size.height * scale.y;
        Some(Rect::new(
            pos.x - anchor.x * width,
            pos.y - anchor.y * height,
            width,
            height,
        ))
    }

    /// The position that puts the bounds center at `center`.
    fn position_for_center(&self, center: Point) -> Point {
        let scale = self.scale();
        let anchor = self.anchor();
        let size = self.intrinsic_size();
        Point::new(
            center.x - (0.5 - anchor.x) * size.width * scale.x,
            center.y - (0.5 - anchor.y) * size.height * scale.y,
        )
    }

    fn transform(&self) -> Transform {
        let pos = self.position();
        let scale = self.scale();
        Transform {
            x: pos.x,
            y: pos.y,
            scale_x: scale.x,
            scale_y: scale.y,
        }
    }
}
