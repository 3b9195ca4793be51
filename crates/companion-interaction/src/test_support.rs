//! In-memory collaborators for controller tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use companion_common::{
    DisplayDescriptor, HostDisplay, PlatformError, Point, PreferenceRecord, PreferenceStore, Rect,
    Size, StorageError,
};
use tokio::sync::mpsc;

use crate::host::{DisplayHost, MoveOutcome};
use crate::model::AvatarModel;
use crate::ui::{ElementId, UiSurface};

pub const MODEL_PATH: &str = "models/hiyori/hiyori.model3.json";

#[derive(Debug, Clone)]
pub struct MockModel {
    pub path: String,
    pub position: Point,
    pub scale: Point,
    pub anchor: Point,
    pub size: Size,
    pub focus_calls: Vec<Point>,
    pub report_bounds: bool,
}

impl MockModel {
    /// 200x400 model, centered anchor, unit scale.
    pub fn new(position: Point) -> Self {
        Self {
            path: MODEL_PATH.into(),
            position,
            scale: Point::new(1.0, 1.0),
            anchor: Point::new(0.5, 0.5),
            size: Size::new(200.0, 400.0),
            focus_calls: Vec::new(),
            report_bounds: true,
        }
    }
}

impl AvatarModel for MockModel {
    fn model_path(&self) -> &str {
        &self.path
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn scale(&self) -> Point {
        self.scale
    }

    fn set_scale(&mut self, scale: Point) {
        self.scale = scale;
    }

    fn anchor(&self) -> Point {
        self.anchor
    }

    fn intrinsic_size(&self) -> Size {
        self.size
    }

    fn focus(&mut self, target: Point) {
        self.focus_calls.push(target);
    }

    fn bounds(&self) -> Option<Rect> {
        if !self.report_bounds {
            return None;
        }
        let width = self.size.width * self.scale.x;
        let height = self.size.height * self.scale.y;
        Some(Rect::new(
            self.position.x - self.anchor.x * width,
            self.position.y - self.anchor.y * height,
            width,
            height,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockElement {
    pub visible: bool,
    pub pointer_events: Option<String>,
    pub hovered: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockUi {
    pub elements: BTreeMap<ElementId, MockElement>,
}

impl MockUi {
    /// Lock icon, panel, return button, plus a button and wrapper per name.
    pub fn with_buttons(names: &[&str]) -> Self {
        let mut ui = Self::default();
        for id in [
            ElementId::LockIcon,
            ElementId::FloatingButtons,
            ElementId::ReturnButton,
        ] {
            ui.elements.insert(id, MockElement::default());
        }
        for name in names {
            ui.elements
                .insert(ElementId::Button((*name).into()), MockElement::default());
            ui.elements.insert(
                ElementId::ButtonWrapper((*name).into()),
                MockElement::default(),
            );
        }
        ui
    }

    pub fn visible(&self, id: &ElementId) -> bool {
        self.elements.get(id).map(|e| e.visible).unwrap_or(false)
    }
}

impl UiSurface for MockUi {
    fn has_element(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    fn set_visible(&mut self, id: &ElementId, visible: bool) {
        if let Some(el) = self.elements.get_mut(id) {
            el.visible = visible;
        }
    }

    fn pointer_events(&self, id: &ElementId) -> Option<String> {
        self.elements.get(id).and_then(|e| e.pointer_events.clone())
    }

    fn set_pointer_events(&mut self, id: &ElementId, value: Option<&str>) {
        if let Some(el) = self.elements.get_mut(id) {
            el.pointer_events = value.map(str::to_string);
        }
    }

    fn is_hovered(&self, id: &ElementId) -> bool {
        self.elements.get(id).map(|e| e.hovered).unwrap_or(false)
    }

    fn set_hovered(&mut self, id: &ElementId, hovered: bool) {
        if let Some(el) = self.elements.get_mut(id) {
            el.hovered = hovered;
        }
    }

    fn chrome_controls(&self) -> Vec<ElementId> {
        self.elements
            .keys()
            .filter(|id| id.is_chrome_control())
            .cloned()
            .collect()
    }
}

/// Scriptable multi-monitor host. `moves` is shared so tests can inspect
/// it after the host is boxed into a controller.
#[derive(Debug, Clone)]
pub struct MockHost {
    pub current: Option<HostDisplay>,
    pub window_origin: Option<Point>,
    pub displays: Vec<DisplayDescriptor>,
    pub outcome: Option<MoveOutcome>,
    pub moves: Rc<RefCell<Vec<Point>>>,
}

impl MockHost {
    /// Two 1920x1080 displays side by side, window on the left one.
    pub fn dual() -> Self {
        Self {
            current: Some(HostDisplay {
                id: Some("left".into()),
                screen_x: Some(0.0),
                screen_y: Some(0.0),
                bounds: None,
            }),
            window_origin: None,
            displays: vec![
                DisplayDescriptor {
                    id: "left".into(),
                    screen_x: 0.0,
                    screen_y: 0.0,
                    width: 1920.0,
                    height: 1080.0,
                },
                DisplayDescriptor {
                    id: "right".into(),
                    screen_x: 1920.0,
                    screen_y: 0.0,
                    width: 1920.0,
                    height: 1080.0,
                },
            ],
            outcome: Some(MoveOutcome {
                success: true,
                same_display: false,
                scale_ratio: Some(1.0),
            }),
            moves: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn single() -> Self {
        let mut host = Self::dual();
        host.displays.truncate(1);
        host
    }
}

impl DisplayHost for MockHost {
    fn current_display(&self) -> Result<Option<HostDisplay>, PlatformError> {
        Ok(self.current.clone())
    }

    fn window_origin(&self) -> Option<Point> {
        self.window_origin
    }

    fn all_displays(&self) -> Result<Vec<DisplayDescriptor>, PlatformError> {
        Ok(self.displays.clone())
    }

    fn move_window_to_display(&mut self, x: f64, y: f64) -> Result<MoveOutcome, PlatformError> {
        self.moves.borrow_mut().push(Point::new(x, y));
        self.outcome
            .ok_or_else(|| PlatformError::WindowManagerError("move refused".into()))
    }
}

/// Store that forwards every save to a channel.
pub struct RecordingStore {
    tx: mpsc::UnboundedSender<PreferenceRecord>,
    fail: bool,
}

impl RecordingStore {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PreferenceRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, fail: false }), rx)
    }

    /// Records the attempt, then reports an I/O failure.
    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<PreferenceRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, fail: true }), rx)
    }
}

#[async_trait]
impl PreferenceStore for RecordingStore {
    async fn save(&self, record: PreferenceRecord) -> Result<bool, StorageError> {
        let _ = self.tx.send(record);
        if self.fail {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        Ok(true)
    }

    async fn load(&self, _model_path: &str) -> Result<Option<PreferenceRecord>, StorageError> {
        Ok(None)
    }
}

/// Next save reaching the store, or `None` after a short wait.
pub async fn next_save(
    rx: &mut mpsc::UnboundedReceiver<PreferenceRecord>,
) -> Option<PreferenceRecord> {
    tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .ok()
        .flatten()
}

/// Asserts nothing else reaches the store.
pub async fn assert_no_save(rx: &mut mpsc::UnboundedReceiver<PreferenceRecord>) {
    let extra = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(
        !matches!(extra, Ok(Some(_))),
        "unexpected save: {extra:?}"
    );
}
