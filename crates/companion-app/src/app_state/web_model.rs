//! Host-side mirror of the model rendered in the overlay page.

use companion_common::{Point, Size};
use companion_interaction::AvatarModel;
use companion_webview::ipc::ModelLoadedPayload;

use super::page::{PageCommand, PageOutbox};

/// The page's avatar as seen from Rust.
///
/// Geometry comes from the page's `model_loaded` report; every transform
/// change made here is pushed back to the page.
#[derive(Debug)]
pub(super) struct WebModel {
    path: String,
    position: Point,
    scale: Point,
    anchor: Point,
    size: Size,
    outbox: PageOutbox,
}

impl WebModel {
    /// Build from a load report. Missing placement falls back to the
    /// viewport center at unit scale.
    pub(super) fn from_loaded(
        payload: &ModelLoadedPayload,
        viewport: Size,
        outbox: PageOutbox,
    ) -> Self {
        let position = match (payload.x, payload.y) {
            (Some(x), Some(y)) => Point::new(x, y),
            _ => Point::new(viewport.width / 2.0, viewport.height / 2.0),
        };
        let scale = payload.scale.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(1.0);
        Self {
            path: payload.path.clone(),
            position,
            scale: Point::new(scale, scale),
            anchor: Point::new(payload.anchor_x, payload.anchor_y),
            size: Size::new(payload.width, payload.height),
            outbox,
        }
    }

    fn push_transform(&self) {
        self.outbox.push(PageCommand::Transform(self.transform()));
    }
}

impl AvatarModel for WebModel {
    fn model_path(&self) -> &str {
        &self.path
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
        self.push_transform();
    }

    fn scale(&self) -> Point {
        self.scale
    }

    fn set_scale(&mut self, scale: Point) {
        self.scale = scale;
        self.push_transform();
    }

    fn anchor(&self) -> Point {
        self.anchor
    }

    fn intrinsic_size(&self) -> Size {
        self.size
    }

    fn focus(&mut self, target: Point) {
        self.outbox.push(PageCommand::Focus(target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_common::Rect;

    fn payload() -> ModelLoadedPayload {
        ModelLoadedPayload {
            path: "models/hiyori/hiyori.model3.json".into(),
            width: 400.0,
            height: 800.0,
            anchor_x: 0.5,
            anchor_y: 0.5,
            x: None,
            y: None,
            scale: None,
        }
    }

    #[test]
    fn defaults_to_viewport_center() {
        let model = WebModel::from_loaded(&payload(), Size::new(1920.0, 1080.0), PageOutbox::new());
        assert_eq!(model.position(), Point::new(960.0, 540.0));
        assert_eq!(model.scale(), Point::new(1.0, 1.0));
        assert_eq!(model.model_path(), "models/hiyori/hiyori.model3.json");
    }

    #[test]
    fn keeps_page_placement() {
        let mut p = payload();
        p.x = Some(100.0);
        p.y = Some(200.0);
        p.scale = Some(0.25);
        let model = WebModel::from_loaded(&p, Size::new(800.0, 600.0), PageOutbox::new());
        assert_eq!(model.position(), Point::new(100.0, 200.0));
        assert_eq!(model.scale(), Point::new(0.25, 0.25));
        assert_eq!(model.bounds(), Some(Rect::new(50.0, 100.0, 100.0, 200.0)));
    }

    #[test]
    fn invalid_scale_falls_back_to_one() {
        let mut p = payload();
        p.scale = Some(f64::NAN);
        let model = WebModel::from_loaded(&p, Size::new(800.0, 600.0), PageOutbox::new());
        assert_eq!(model.scale(), Point::new(1.0, 1.0));
    }

    #[test]
    fn changes_are_pushed_to_the_page() {
        let outbox = PageOutbox::new();
        let mut model = WebModel::from_loaded(&payload(), Size::new(800.0, 600.0), outbox.clone());
        model.set_position(Point::new(10.0, 20.0));
        model.set_scale(Point::new(2.0, 2.0));
        model.focus(Point::new(1.0, 1.0));

        let queued = outbox.take();
        assert_eq!(
            queued,
            vec![
                PageCommand::Transform(companion_interaction::Transform {
                    x: 10.0,
                    y: 20.0,
                    scale_x: 2.0,
                    scale_y: 2.0,
                }),
                PageCommand::Focus(Point::new(1.0, 1.0)),
            ]
        );
    }
}
