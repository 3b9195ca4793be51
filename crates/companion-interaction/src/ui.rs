//! The overlay chrome: lock icon, floating buttons and the return
//! affordance shown while dismissed.

use std::fmt;

/// Stable identifier of an overlay element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    LockIcon,
    FloatingButtons,
    ReturnButton,
    /// One control inside the floating panel.
    Button(String),
    /// Wrapper around a control, carries its own hit testing.
    ButtonWrapper(String),
}

impl ElementId {
    /// The element's id in the overlay page.
    pub fn dom_id(&self) -> String {
        match self {
            ElementId::LockIcon => "lock-icon".into(),
            ElementId::FloatingButtons => "floating-buttons".into(),
            ElementId::ReturnButton => "return-button".into(),
            ElementId::Button(name) => format!("btn-{name}"),
            ElementId::ButtonWrapper(name) => format!("btn-wrapper-{name}"),
        }
    }

    pub fn from_dom_id(id: &str) -> Option<Self> {
        match id {
            "lock-icon" => Some(ElementId::LockIcon),
            "floating-buttons" => Some(ElementId::FloatingButtons),
            "return-button" => Some(ElementId::ReturnButton),
            _ => {
                if let Some(name) = id.strip_prefix("btn-wrapper-") {
                    (!name.is_empty()).then(|| ElementId::ButtonWrapper(name.to_string()))
                } else if let Some(name) = id.strip_prefix("btn-") {
                    (!name.is_empty()).then(|| ElementId::Button(name.to_string()))
                } else {
                    None
                }
            }
        }
    }

    /// Controls whose hit testing is suspended during a drag.
    pub fn is_chrome_control(&self) -> bool {
        matches!(self, ElementId::Button(_) | ElementId::ButtonWrapper(_))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dom_id())
    }
}

/// Host-side view of the overlay elements.
///
/// Absent elements are tolerated everywhere: setters become no-ops and
/// getters report defaults.
pub trait UiSurface {
    fn has_element(&self, id: &ElementId) -> bool;

    fn set_visible(&mut self, id: &ElementId, visible: bool);

    /// Inline `pointer-events` value, `None` when unset.
    fn pointer_events(&self, id: &ElementId) -> Option<String>;

    fn set_pointer_events(&mut self, id: &ElementId, value: Option<&str>);

    fn is_hovered(&self, id: &ElementId) -> bool;

    /// Record a hover change reported by the host.
    fn set_hovered(&mut self, id: &ElementId, hovered: bool);

    /// Every button and wrapper currently in the page.
    fn chrome_controls(&self) -> Vec<ElementId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_ids_round_trip() {
        let ids = [
            ElementId::LockIcon,
            ElementId::FloatingButtons,
            ElementId::ReturnButton,
            ElementId::Button("chat".into()),
            ElementId::ButtonWrapper("settings".into()),
        ];
        for id in ids {
            assert_eq!(ElementId::from_dom_id(&id.dom_id()), Some(id));
        }
    }

    #[test]
    fn unknown_dom_ids_are_rejected() {
        assert_eq!(ElementId::from_dom_id("canvas"), None);
        assert_eq!(ElementId::from_dom_id("btn-"), None);
        assert_eq!(ElementId::from_dom_id("btn-wrapper-"), None);
    }

    #[test]
    fn chrome_classification() {
        assert!(ElementId::Button("mic".into()).is_chrome_control());
        assert!(ElementId::ButtonWrapper("mic".into()).is_chrome_control());
        assert!(!ElementId::LockIcon.is_chrome_control());
        assert!(!ElementId::ReturnButton.is_chrome_control());
    }
}
