//! Selection store: the authoritative current value of a control.
//!
//! The store is tagged [`Ownership::Controlled`] or
//! [`Ownership::Uncontrolled`] when it is created. Uncontrolled stores apply
//! every change they report. Controlled stores only compute the proposed
//! value and wait for the caller to echo it back through
//! [`SelectionStore::set_value`].

use crate::error::{ControlError, Result};
use crate::option::{OptionValue, SelectOption};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::trace;

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one value
    #[default]
    Single,
    /// Any number of values, kept in selection order
    Multiple,
}

impl SelectionMode {
    /// Human-readable name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }
}

/// Who owns the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    /// The caller owns the value and echoes changes back
    Controlled,
    /// The store owns the value
    #[default]
    Uncontrolled,
}

/// Current value of a control.
///
/// Equality is order-sensitive: two multi values are equal only when they
/// hold the same values in the same selection order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de> + Eq + Hash"
))]
pub enum SelectionValue<T> {
    /// Single-mode value
    Single(Option<T>),
    /// Multi-mode values in selection order
    Multi(IndexSet<T>),
}

impl<T: OptionValue> SelectionValue<T> {
    /// Empty value for a mode.
    #[must_use]
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Multiple => Self::Multi(IndexSet::new()),
        }
    }

    /// Single-mode value holding `value`.
    #[must_use]
    pub const fn single(value: T) -> Self {
        Self::Single(Some(value))
    }

    /// Multi-mode value from `values`. Repeats are dropped.
    #[must_use]
    pub fn multi(values: impl IntoIterator<Item = T>) -> Self {
        Self::Multi(values.into_iter().collect())
    }

    /// Mode this value shape belongs to.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multi(_) => SelectionMode::Multiple,
        }
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(v) => v.is_none(),
            Self::Multi(set) => set.is_empty(),
        }
    }

    /// Number of selected values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(v) => usize::from(v.is_some()),
            Self::Multi(set) => set.len(),
        }
    }

    /// Check if `value` is selected.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Self::Single(v) => v.as_ref() == Some(value),
            Self::Multi(set) => set.contains(value),
        }
    }

    /// Iterate selected values in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let single = match self {
            Self::Single(v) => v.as_ref(),
            Self::Multi(_) => None,
        };
        let multi = match self {
            Self::Multi(set) => Some(set.iter()),
            Self::Single(_) => None,
        };
        single.into_iter().chain(multi.into_iter().flatten())
    }

    /// The single-mode value, if this is a single-mode value.
    #[must_use]
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Self::Single(v) => v.as_ref(),
            Self::Multi(_) => None,
        }
    }
}

impl<T: OptionValue> PartialEq for SelectionValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.mode() == other.mode() && self.iter().eq(other.iter())
    }
}

impl<T: OptionValue> Eq for SelectionValue<T> {}

/// A value change produced by a store operation.
#[derive(Debug, Clone)]
pub struct ValueChange<T> {
    /// The new value (proposed, in controlled mode)
    pub value: SelectionValue<T>,
    /// Whether the operation asks the popover to close
    pub close: bool,
    /// Whether the store applied the value itself
    pub applied: bool,
}

/// Owns the current selection.
#[derive(Debug, Clone)]
pub struct SelectionStore<T> {
    mode: SelectionMode,
    ownership: Ownership,
    value: SelectionValue<T>,
}

impl<T: OptionValue> SelectionStore<T> {
    /// Create a store.
    ///
    /// `initial` is the default value of an uncontrolled store or the
    /// caller-owned value of a controlled one. `None` starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ModeMismatch`] if `initial` has the wrong shape
    /// for `mode`.
    pub fn new(
        mode: SelectionMode,
        ownership: Ownership,
        initial: Option<SelectionValue<T>>,
    ) -> Result<Self> {
        let value = initial.unwrap_or_else(|| SelectionValue::empty(mode));
        check_shape(mode, &value)?;
        Ok(Self {
            mode,
            ownership,
            value,
        })
    }

    /// Create an empty uncontrolled store.
    #[must_use]
    pub fn uncontrolled(mode: SelectionMode) -> Self {
        Self {
            mode,
            ownership: Ownership::Uncontrolled,
            value: SelectionValue::empty(mode),
        }
    }

    /// Selection mode.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Ownership tag.
    #[must_use]
    pub const fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Check if the caller owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.ownership == Ownership::Controlled
    }

    /// Current value.
    #[must_use]
    pub const fn current_value(&self) -> &SelectionValue<T> {
        &self.value
    }

    /// Check if `value` is selected.
    #[must_use]
    pub fn is_selected(&self, value: &T) -> bool {
        self.value.contains(value)
    }

    /// Select an option.
    ///
    /// Single mode replaces the value, even with the same value, and asks to
    /// close. Multi mode appends the value when absent and does nothing when
    /// it is already selected. Disabled options are rejected.
    pub fn select(&mut self, option: &SelectOption<T>) -> Option<ValueChange<T>> {
        if option.disabled {
            trace!(label = %option.label, "rejected disabled option");
            return None;
        }
        match &self.value {
            SelectionValue::Single(_) => {
                Some(self.propose(SelectionValue::single(option.value.clone()), true))
            }
            SelectionValue::Multi(set) => {
                if set.contains(&option.value) {
                    return None;
                }
                let mut next = set.clone();
                next.insert(option.value.clone());
                Some(self.propose(SelectionValue::Multi(next), false))
            }
        }
    }

    /// Toggle an option.
    ///
    /// Multi mode removes the value when present, keeping the order of the
    /// rest, and appends it otherwise. Single mode behaves like
    /// [`select`](Self::select).
    pub fn toggle(&mut self, option: &SelectOption<T>) -> Option<ValueChange<T>> {
        if option.disabled {
            trace!(label = %option.label, "rejected disabled option");
            return None;
        }
        match &self.value {
            SelectionValue::Single(_) => self.select(option),
            SelectionValue::Multi(set) => {
                let mut next = set.clone();
                if !next.shift_remove(&option.value) {
                    next.insert(option.value.clone());
                }
                Some(self.propose(SelectionValue::Multi(next), false))
            }
        }
    }

    /// Remove a value, as a chip's remove button does.
    ///
    /// Does nothing when the value is not selected. Disabled state is not
    /// checked: an option disabled after it was selected can still be removed.
    pub fn remove(&mut self, value: &T) -> Option<ValueChange<T>> {
        if !self.value.contains(value) {
            return None;
        }
        let next = match &self.value {
            SelectionValue::Single(_) => SelectionValue::Single(None),
            SelectionValue::Multi(set) => {
                let mut next = set.clone();
                next.shift_remove(value);
                SelectionValue::Multi(next)
            }
        };
        Some(self.propose(next, false))
    }

    /// Clear the selection. Always reports a change, even when already empty.
    pub fn clear(&mut self) -> ValueChange<T> {
        self.propose(SelectionValue::empty(self.mode), false)
    }

    /// Replace the stored value.
    ///
    /// This is the controlled echo, or a programmatic assignment in
    /// uncontrolled mode. No change is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ModeMismatch`] if `value` has the wrong shape.
    pub fn set_value(&mut self, value: SelectionValue<T>) -> Result<()> {
        check_shape(self.mode, &value)?;
        self.value = value;
        Ok(())
    }

    fn propose(&mut self, next: SelectionValue<T>, close: bool) -> ValueChange<T> {
        let applied = !self.is_controlled();
        if applied {
            self.value = next.clone();
        }
        ValueChange {
            value: next,
            close,
            applied,
        }
    }
}

fn check_shape<T: OptionValue>(mode: SelectionMode, value: &SelectionValue<T>) -> Result<()> {
    if value.mode() == mode {
        Ok(())
    } else {
        Err(ControlError::ModeMismatch {
            mode: mode.name(),
            got: value.mode().name(),
        })
    }
}
