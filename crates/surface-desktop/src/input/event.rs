//! Pointer and keyboard event vocabulary

use crate::math::Vec2;
use crate::types::AppletId;

/// Result of routing an input event
#[derive(Clone, Debug, PartialEq)]
pub enum InputResult {
    /// Event was consumed by the compositor
    Handled,
    /// Event was not relevant (or was rejected)
    Unhandled,
    /// Event should be delivered to the applet's own content
    Forward {
        applet_id: AppletId,
        /// Position relative to the applet's top-left corner (surface px)
        local: Vec2,
    },
}

impl InputResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, InputResult::Handled)
    }
}

/// Pointer button, numbered like DOM `MouseEvent.button`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Middle),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

/// Keys the compositor reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Held to drag an applet by its body
    DragModifier,
    /// Held during a drag to write `left`/`top` directly
    PreciseModifier,
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "Alt" => Some(Key::DragModifier),
            "Shift" => Some(Key::PreciseModifier),
            "+" | "=" => Some(Key::ZoomIn),
            "-" => Some(Key::ZoomOut),
            "0" => Some(Key::ZoomReset),
            _ => None,
        }
    }
}

/// Modifier keys currently held
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub drag: bool,
    pub precise: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_from_index() {
        assert_eq!(PointerButton::from_index(0), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_index(2), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_index(4), None);
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("Alt"), Some(Key::DragModifier));
        assert_eq!(Key::from_dom("="), Some(Key::ZoomIn));
        assert_eq!(Key::from_dom("q"), None);
    }
}
