//! Pointer and keyboard event types.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Selection toggle modifier (Ctrl, or Cmd on macOS).
    pub fn toggle(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

impl Key {
    /// Parse a key name as reported by a windowing layer.
    ///
    /// Single characters are lowercased; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Delete" => Some(Key::Delete),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c.to_ascii_lowercase())),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_modifier() {
        assert!(!Modifiers::NONE.toggle());
        assert!(Modifiers { ctrl: true, ..Modifiers::NONE }.toggle());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.toggle());
        assert!(!Modifiers { shift: true, ..Modifiers::NONE }.toggle());
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("Delete"), Some(Key::Delete));
        assert_eq!(Key::from_name("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("R"), Some(Key::Char('r')));
        assert_eq!(Key::from_name("F12"), None);
        assert_eq!(Key::from_name(""), None);
    }
}
