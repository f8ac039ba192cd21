//! Option model: one selectable entry of a selection control.

use crate::error::{ControlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Bounds required of an option value.
///
/// Values are compared by identity (`Eq + Hash`) so a selection survives the
/// option being filtered out of view or the option list being replaced.
pub trait OptionValue: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> OptionValue for T {}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption<T> {
    /// Unique value for this option
    pub value: T,
    /// Display label
    pub label: String,
    /// Whether this option is disabled
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// Group this option is listed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(b: &bool) -> bool {
    !*b
}

impl<T> SelectOption<T> {
    /// Create a new option.
    #[must_use]
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
            group: None,
        }
    }

    /// Set disabled state.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Place the option in a named group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Check if this option matches an already-lowercased query.
    ///
    /// An empty query matches everything. Otherwise the label, or failing
    /// that the group name, must contain the query as a substring.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.label.to_lowercase().contains(needle)
            || self
                .group
                .as_deref()
                .is_some_and(|g| g.to_lowercase().contains(needle))
    }

    /// Check if this option matches a query (case-insensitive).
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.matches_lowercase(&query.to_lowercase())
    }
}

impl SelectOption<String> {
    /// Create an option where value equals label.
    #[must_use]
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }
}

/// Find the first pair of options sharing a value.
///
/// Returns `(first, duplicate)` indices.
pub fn find_duplicate<T: OptionValue>(options: &[SelectOption<T>]) -> Option<(usize, usize)> {
    let mut seen: HashMap<&T, usize> = HashMap::with_capacity(options.len());
    for (index, option) in options.iter().enumerate() {
        if let Some(&first) = seen.get(&option.value) {
            return Some((first, index));
        }
        seen.insert(&option.value, index);
    }
    None
}

/// Fail with [`ControlError::DuplicateValue`] if two options share a value.
pub fn ensure_unique<T: OptionValue>(options: &[SelectOption<T>]) -> Result<()> {
    match find_duplicate(options) {
        Some((first, duplicate)) => Err(ControlError::DuplicateValue {
            first,
            duplicate,
            value: format!("{:?}", options[duplicate].value),
        }),
        None => Ok(()),
    }
}

/// Find the option carrying `value`.
pub fn find_by_value<'a, T: OptionValue>(
    options: &'a [SelectOption<T>],
    value: &T,
) -> Option<&'a SelectOption<T>> {
    options.iter().find(|o| &o.value == value)
}
