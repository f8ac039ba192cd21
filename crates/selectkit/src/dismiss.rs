//! Dismissal watcher: closes an open control when interaction moves away.

use crate::navigator::CloseReason;
use selectkit_core::{Event, Point, Rect};
use serde::{Deserialize, Serialize};

/// Tracks the regions a control occupies on screen.
///
/// The popover is often rendered outside the trigger's layout flow (in a
/// portal or overlay layer), so both regions are tracked independently.
/// Empty rectangles are not tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DismissalWatcher {
    trigger: Rect,
    popover: Rect,
}

impl DismissalWatcher {
    /// Create a watcher with no tracked regions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a watcher for a trigger and popover.
    #[must_use]
    pub const fn with_bounds(trigger: Rect, popover: Rect) -> Self {
        Self { trigger, popover }
    }

    /// Trigger region.
    #[must_use]
    pub const fn trigger(&self) -> Rect {
        self.trigger
    }

    /// Popover region.
    #[must_use]
    pub const fn popover(&self) -> Rect {
        self.popover
    }

    /// Update the trigger region.
    pub fn set_trigger(&mut self, trigger: Rect) {
        self.trigger = trigger;
    }

    /// Update the popover region.
    pub fn set_popover(&mut self, popover: Rect) {
        self.popover = popover;
    }

    /// Check if `point` falls inside any tracked region.
    #[must_use]
    pub fn is_inside(&self, point: &Point) -> bool {
        [self.trigger, self.popover]
            .iter()
            .any(|r| !r.is_empty() && r.contains_point(point))
    }

    /// Check if `point` falls inside the trigger.
    #[must_use]
    pub fn hits_trigger(&self, point: &Point) -> bool {
        !self.trigger.is_empty() && self.trigger.contains_point(point)
    }

    /// Decide whether `event` dismisses a control that is `is_open`.
    ///
    /// A primary activation outside every region closes with
    /// [`CloseReason::Outside`]. Focus leaving the control closes with
    /// [`CloseReason::FocusLost`]. Nothing closes a closed control.
    #[must_use]
    pub fn watch(&self, event: &Event, is_open: bool) -> Option<CloseReason> {
        if !is_open {
            return None;
        }
        if matches!(event, Event::FocusOut) {
            return Some(CloseReason::FocusLost);
        }
        let point = event.activation_point()?;
        (!self.is_inside(&point)).then_some(CloseReason::Outside)
    }
}
