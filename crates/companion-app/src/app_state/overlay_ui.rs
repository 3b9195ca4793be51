//! Host-side mirror of the overlay chrome.

use std::collections::BTreeMap;

use companion_interaction::{ElementId, UiSurface};
use companion_webview::ipc::ElementInfo;

use super::page::{PageCommand, PageOutbox};

#[derive(Debug, Clone, Default, PartialEq)]
struct ElementMirror {
    /// Last visibility sent to the page; `None` until the first send.
    visible: Option<bool>,
    pointer_events: Option<String>,
    hovered: bool,
}

/// Chrome elements known to exist in the page.
///
/// Reads are answered from the mirror; writes update it and queue a page
/// command only when the value actually changes.
#[derive(Debug)]
pub(super) struct OverlayUi {
    elements: BTreeMap<ElementId, ElementMirror>,
    outbox: PageOutbox,
}

impl OverlayUi {
    pub(super) fn new(outbox: PageOutbox) -> Self {
        Self {
            elements: BTreeMap::new(),
            outbox,
        }
    }

    /// Replace the mirror with the elements the page reported. Unknown ids
    /// are skipped.
    pub(super) fn register(&mut self, elements: &[ElementInfo]) {
        self.elements = elements
            .iter()
            .filter_map(|info| {
                let id = ElementId::from_dom_id(&info.id);
                if id.is_none() {
                    tracing::debug!(id = %info.id, "ignoring unknown overlay element");
                }
                id.map(|id| {
                    (
                        id,
                        ElementMirror {
                            pointer_events: info.pointer_events.clone(),
                            ..ElementMirror::default()
                        },
                    )
                })
            })
            .collect();
        tracing::debug!(count = self.elements.len(), "overlay elements registered");
    }

    pub(super) fn len(&self) -> usize {
        self.elements.len()
    }
}

impl UiSurface for OverlayUi {
    fn has_element(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    fn set_visible(&mut self, id: &ElementId, visible: bool) {
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        if element.visible == Some(visible) {
            return;
        }
        element.visible = Some(visible);
        self.outbox.push(PageCommand::Visibility {
            id: id.dom_id(),
            visible,
        });
    }

    fn pointer_events(&self, id: &ElementId) -> Option<String> {
        self.elements
            .get(id)
            .and_then(|e| e.pointer_events.clone())
    }

    fn set_pointer_events(&mut self, id: &ElementId, value: Option<&str>) {
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        if element.pointer_events.as_deref() == value {
            return;
        }
        element.pointer_events = value.map(str::to_string);
        self.outbox.push(PageCommand::PointerEvents {
            id: id.dom_id(),
            value: element.pointer_events.clone(),
        });
    }

    fn is_hovered(&self, id: &ElementId) -> bool {
        self.elements.get(id).is_some_and(|e| e.hovered)
    }

    fn set_hovered(&mut self, id: &ElementId, hovered: bool) {
        if let Some(element) = self.elements.get_mut(id) {
            element.hovered = hovered;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, pointer_events: Option<&str>) -> ElementInfo {
        ElementInfo {
            id: id.into(),
            pointer_events: pointer_events.map(str::to_string),
        }
    }

    fn ui() -> (OverlayUi, PageOutbox) {
        let outbox = PageOutbox::new();
        let mut ui = OverlayUi::new(outbox.clone());
        ui.register(&[
            info("lock-icon", None),
            info("floating-buttons", None),
            info("btn-chat", Some("auto")),
            info("btn-wrapper-chat", None),
            info("live2d-canvas", None),
        ]);
        (ui, outbox)
    }

    #[test]
    fn register_skips_unknown_ids() {
        let (ui, _) = ui();
        assert_eq!(ui.len(), 4);
        assert!(ui.has_element(&ElementId::LockIcon));
        assert!(!ui.has_element(&ElementId::ReturnButton));
        assert_eq!(
            ui.pointer_events(&ElementId::Button("chat".into())),
            Some("auto".into())
        );
    }

    #[test]
    fn visibility_is_sent_only_on_change() {
        let (mut ui, outbox) = ui();
        ui.set_visible(&ElementId::LockIcon, false);
        ui.set_visible(&ElementId::LockIcon, false);
        assert_eq!(outbox.len(), 1);

        ui.set_visible(&ElementId::LockIcon, true);
        assert_eq!(
            outbox.take().last(),
            Some(&PageCommand::Visibility {
                id: "lock-icon".into(),
                visible: true
            })
        );
    }

    #[test]
    fn absent_elements_are_no_ops() {
        let (mut ui, outbox) = ui();
        ui.set_visible(&ElementId::ReturnButton, true);
        ui.set_pointer_events(&ElementId::ReturnButton, Some("none"));
        ui.set_hovered(&ElementId::ReturnButton, true);
        assert!(outbox.is_empty());
        assert!(!ui.is_hovered(&ElementId::ReturnButton));
        assert_eq!(ui.pointer_events(&ElementId::ReturnButton), None);
    }

    #[test]
    fn pointer_events_round_trip_through_none() {
        let (mut ui, outbox) = ui();
        let button = ElementId::Button("chat".into());
        ui.set_pointer_events(&button, Some("none"));
        ui.set_pointer_events(&button, Some("auto"));

        let queued = outbox.take();
        assert_eq!(
            queued,
            vec![PageCommand::PointerEvents {
                id: "btn-chat".into(),
                value: Some("auto".into())
            }]
        );
        assert_eq!(ui.pointer_events(&button), Some("auto".into()));
    }

    #[test]
    fn chrome_controls_lists_buttons_and_wrappers() {
        let (ui, _) = ui();
        assert_eq!(
            ui.chrome_controls(),
            vec![
                ElementId::Button("chat".into()),
                ElementId::ButtonWrapper("chat".into()),
            ]
        );
    }

    #[test]
    fn hover_state_is_tracked() {
        let (mut ui, _) = ui();
        ui.set_hovered(&ElementId::FloatingButtons, true);
        assert!(ui.is_hovered(&ElementId::FloatingButtons));
    }
}
