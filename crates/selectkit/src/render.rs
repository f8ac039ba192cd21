//! Messages and render models produced by a [`SelectControl`](crate::SelectControl).

use crate::filter::Section;
use crate::navigator::CloseReason;
use crate::option::{OptionValue, SelectOption};
use crate::store::SelectionValue;
use serde::Serialize;

/// Message emitted when the selection changes (or would change, for a
/// controlled control).
#[derive(Debug, Clone, Serialize)]
pub struct SelectionChanged<T> {
    /// New value; a proposal the caller must echo back when controlled
    pub value: SelectionValue<T>,
    /// Options backing the new value in selection order (multi mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<Vec<SelectOption<T>>>,
    /// Whether the change closed the popover
    pub close: bool,
}

impl<T: OptionValue> PartialEq for SelectionChanged<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.selected_options == other.selected_options
            && self.close == other.close
    }
}

impl<T: OptionValue> Eq for SelectionChanged<T> {}

/// One option row in a render model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOption<T> {
    /// Option value
    pub value: T,
    /// Display label
    pub label: String,
    /// Group name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Whether the option is disabled
    pub disabled: bool,
    /// Whether the option is part of the current value
    pub selected: bool,
    /// Whether the option is under the keyboard/hover cursor
    pub highlighted: bool,
}

/// A selected value rendered as a removable chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip<T> {
    /// Selected value
    pub value: T,
    /// Label of the option carrying the value, if the option is still listed
    pub label: Option<String>,
}

/// Everything a host needs to draw the control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel<T> {
    /// Whether the popover is open
    pub is_open: bool,
    /// Current search text
    pub query: String,
    /// Highlighted view position, `-1` for none
    pub highlighted_index: isize,
    /// Filtered options in display order
    pub options: Vec<RenderedOption<T>>,
    /// Group sections over `options`
    pub sections: Vec<Section>,
    /// Selected values in selection order
    pub chips: Vec<Chip<T>>,
    /// Label to show on the trigger in single mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_label: Option<String>,
    /// Whether the filtered view is empty
    pub is_empty: bool,
    /// Whether the control accepts interaction
    pub interactive: bool,
    /// Whether the host is still loading options
    pub loading: bool,
}

impl<T> RenderModel<T> {
    /// Highlighted option row, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<&RenderedOption<T>> {
        self.options.iter().find(|o| o.highlighted)
    }

    /// Labels of the rendered option rows.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

/// Outcome of one control operation.
#[derive(Debug, Clone, Serialize)]
pub struct Response<T> {
    /// Selection change produced by the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<SelectionChanged<T>>,
    /// Set when the operation closed the popover
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<CloseReason>,
    /// State after the operation
    pub render: RenderModel<T>,
}
