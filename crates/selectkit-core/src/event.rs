//! Input events delivered by the host UI.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Text input received
    TextInput {
        /// Input text
        text: String,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
    /// Pointer down (unified mouse/touch/pen)
    PointerDown {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
        /// Is primary pointer
        is_primary: bool,
        /// Button (for mouse pointers)
        button: Option<MouseButton>,
    },
    /// Pointer up
    PointerUp {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
        /// Is primary pointer
        is_primary: bool,
        /// Button (for mouse pointers)
        button: Option<MouseButton>,
    },
}

/// Pointer identifier for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Touch pointer
    Touch,
    /// Pen/stylus pointer
    Pen,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard key identifiers.
///
/// Only non-printable keys plus `Space` are modelled; printable characters
/// arrive as [`Event::TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Space key
    Space,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl Key {
    /// All modelled keys.
    pub const ALL: [Self; 13] = [
        Self::Enter,
        Self::Escape,
        Self::Backspace,
        Self::Tab,
        Self::Space,
        Self::Home,
        Self::End,
        Self::PageUp,
        Self::PageDown,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
    ];

    /// Canonical lowercase name, as accepted by [`Key::from_str`].
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Escape => "escape",
            Self::Backspace => "backspace",
            Self::Tab => "tab",
            Self::Space => "space",
            Self::Home => "home",
            Self::End => "end",
            Self::PageUp => "pageup",
            Self::PageDown => "pagedown",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let normalized = match lower.as_str() {
            "return" => "enter",
            "esc" => "escape",
            "arrowup" => "up",
            "arrowdown" => "down",
            "arrowleft" => "left",
            "arrowright" => "right",
            " " => "space",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| KeyParseError(s.to_string()))
    }
}

/// Error type for key name parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(pub String);

impl std::fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key name: {:?}", self.0)
    }
}

impl std::error::Error for KeyParseError {}

impl Event {
    /// Position of a primary activation (left mouse press or primary pointer
    /// press), if this event is one.
    #[must_use]
    pub const fn activation_point(&self) -> Option<Point> {
        match self {
            Self::MouseDown {
                position,
                button: MouseButton::Left,
            }
            | Self::PointerDown {
                position,
                is_primary: true,
                button: None | Some(MouseButton::Left),
                ..
            } => Some(*position),
            _ => None,
        }
    }

    /// Convenience constructor for a primary left click.
    #[must_use]
    pub const fn click(position: Point) -> Self {
        Self::MouseDown {
            position,
            button: MouseButton::Left,
        }
    }

    /// Convenience constructor for a key press.
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::KeyDown { key }
    }

    /// Convenience constructor for text input.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextInput { text: text.into() }
    }
}

impl PointerId {
    /// Create a new pointer ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_point_left_click() {
        let pos = Point::new(5.0, 6.0);
        assert_eq!(Event::click(pos).activation_point(), Some(pos));
    }

    #[test]
    fn test_activation_point_ignores_secondary_buttons() {
        let event = Event::MouseDown {
            position: Point::ORIGIN,
            button: MouseButton::Right,
        };
        assert_eq!(event.activation_point(), None);
        assert_eq!(
            Event::MouseUp {
                position: Point::ORIGIN,
                button: MouseButton::Left
            }
            .activation_point(),
            None
        );
    }

    #[test]
    fn test_activation_point_pointer() {
        let pos = Point::new(1.0, 2.0);
        let touch = Event::PointerDown {
            pointer_id: PointerId::new(3),
            pointer_type: PointerType::Touch,
            position: pos,
            is_primary: true,
            button: None,
        };
        assert_eq!(touch.activation_point(), Some(pos));

        let secondary = Event::PointerDown {
            pointer_id: PointerId::new(4),
            pointer_type: PointerType::Touch,
            position: pos,
            is_primary: false,
            button: None,
        };
        assert_eq!(secondary.activation_point(), None);
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("down".parse::<Key>(), Ok(Key::Down));
        assert_eq!("ArrowUp".parse::<Key>(), Ok(Key::Up));
        assert_eq!("Esc".parse::<Key>(), Ok(Key::Escape));
        assert_eq!("return".parse::<Key>(), Ok(Key::Enter));
        assert_eq!("PageDown".parse::<Key>(), Ok(Key::PageDown));
        assert!("F13".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_name_round_trips_through_from_str() {
        for key in Key::ALL {
            assert_eq!(key.name().parse::<Key>(), Ok(key));
        }
    }

    #[test]
    fn test_key_parse_error_display() {
        let err = "bogus".parse::<Key>().unwrap_err();
        assert_eq!(err.to_string(), "unknown key name: \"bogus\"");
    }

    #[test]
    fn test_pointer_type_default() {
        assert_eq!(PointerType::default(), PointerType::Mouse);
    }
}
