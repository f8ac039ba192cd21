//! The `Interactive` trait and related types.
//!
//! Controls in selectkit are pure state machines: the host UI feeds them
//! [`Event`]s and renders whatever model they expose. `Interactive` is the
//! seam between the two.
//!
//! # Examples
//!
//! ```
//! use selectkit_core::{AccessibleRole, Event, Interactive, Key, Rect};
//!
//! #[derive(Default)]
//! struct Toggle {
//!     on: bool,
//! }
//!
//! impl Interactive for Toggle {
//!     type Message = bool;
//!
//!     fn event(&mut self, event: &Event) -> Option<bool> {
//!         match event {
//!             Event::KeyDown { key: Key::Space } => {
//!                 self.on = !self.on;
//!                 Some(self.on)
//!             }
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut toggle = Toggle::default();
//! assert_eq!(toggle.event(&Event::key(Key::Space)), Some(true));
//! assert_eq!(toggle.accessible_role(), AccessibleRole::Generic);
//! assert_eq!(toggle.bounds(), Rect::default());
//! ```

use crate::event::Event;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A component that consumes input events and may emit a message.
pub trait Interactive {
    /// Message emitted when handling an event changes something the caller
    /// must know about.
    type Message;

    /// Handle an input event.
    fn event(&mut self, event: &Event) -> Option<Self::Message>;

    /// Check if this component currently accepts interaction.
    fn is_interactive(&self) -> bool {
        true
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the current bounds of this component.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Combo box / dropdown select
    ComboBox,
}
