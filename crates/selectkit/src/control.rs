//! Control facade: one synchronous event-to-render cycle over the option
//! model, filter engine, selection store, navigator, and dismissal watcher.
//!
//! # Examples
//!
//! ```
//! use selectkit::{SelectControl, SelectOption, SelectionValue};
//! use selectkit_core::Key;
//!
//! let mut control = SelectControl::builder()
//!     .options(vec![
//!         SelectOption::new(1, "Maputo"),
//!         SelectOption::new(2, "Beira"),
//!     ])
//!     .searchable(true)
//!     .build()
//!     .unwrap();
//!
//! control.type_text("bei");
//! control.key(Key::Down);
//! let response = control.key(Key::Enter);
//!
//! assert_eq!(response.change.unwrap().value, SelectionValue::single(2));
//! assert!(!response.render.is_open);
//! ```

use crate::config::ControlConfig;
use crate::dismiss::DismissalWatcher;
use crate::error::Result;
use crate::filter::{filter, FilteredView};
use crate::navigator::{CloseReason, Intent, Navigator, ViewState};
use crate::option::{ensure_unique, find_by_value, OptionValue, SelectOption};
use crate::render::{Chip, RenderModel, RenderedOption, Response, SelectionChanged};
use crate::store::{Ownership, SelectionMode, SelectionStore, SelectionValue, ValueChange};
use selectkit_core::{AccessibleRole, Event, Interactive, Key, Rect};
use std::fmt;
use tracing::debug;

/// Callback invoked with every selection change.
pub type ChangeCallback<T> = Box<dyn FnMut(&SelectionChanged<T>) + Send>;

/// A dropdown / combobox selection control.
pub struct SelectControl<T> {
    options: Vec<SelectOption<T>>,
    view: FilteredView,
    store: SelectionStore<T>,
    navigator: Navigator,
    watcher: DismissalWatcher,
    disabled: bool,
    loading: bool,
    on_change: Option<ChangeCallback<T>>,
}

impl<T: fmt::Debug> fmt::Debug for SelectControl<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectControl")
            .field("options", &self.options)
            .field("store", &self.store)
            .field("state", self.navigator.state())
            .field("disabled", &self.disabled)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SelectControl`].
pub struct SelectControlBuilder<T> {
    options: Vec<SelectOption<T>>,
    config: ControlConfig,
    initial: Option<(Ownership, SelectionValue<T>)>,
    on_change: Option<ChangeCallback<T>>,
    watcher: DismissalWatcher,
}

impl<T: OptionValue> Default for SelectControlBuilder<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            config: ControlConfig::default(),
            initial: None,
            on_change: None,
            watcher: DismissalWatcher::new(),
        }
    }
}

impl<T: OptionValue> SelectControlBuilder<T> {
    /// Set the options.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption<T>>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    /// Replace all flags at once.
    #[must_use]
    pub const fn config(mut self, config: ControlConfig) -> Self {
        self.config = config;
        self
    }

    /// Allow multiple values.
    #[must_use]
    pub const fn multiple(mut self, multiple: bool) -> Self {
        self.config.multiple = multiple;
        self
    }

    /// Filter options by typed text.
    #[must_use]
    pub const fn searchable(mut self, searchable: bool) -> Self {
        self.config.searchable = searchable;
        self
    }

    /// Start disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Start loading.
    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.config.loading = loading;
        self
    }

    /// Make the control controlled, owning `value` on the caller's side.
    #[must_use]
    pub fn value(mut self, value: SelectionValue<T>) -> Self {
        self.initial = Some((Ownership::Controlled, value));
        self
    }

    /// Make the control uncontrolled, starting from `value`.
    #[must_use]
    pub fn default_value(mut self, value: SelectionValue<T>) -> Self {
        self.initial = Some((Ownership::Uncontrolled, value));
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(&SelectionChanged<T>) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Set the trigger bounds used for outside-click detection.
    #[must_use]
    pub fn trigger_bounds(mut self, bounds: Rect) -> Self {
        self.watcher.set_trigger(bounds);
        self
    }

    /// Set the popover bounds used for outside-click detection.
    #[must_use]
    pub fn popover_bounds(mut self, bounds: Rect) -> Self {
        self.watcher.set_popover(bounds);
        self
    }

    /// Build the control.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::DuplicateValue`](crate::ControlError::DuplicateValue)
    /// if two options share a value, or
    /// [`ControlError::ModeMismatch`](crate::ControlError::ModeMismatch) if
    /// the initial value does not fit the mode.
    pub fn build(self) -> Result<SelectControl<T>> {
        ensure_unique(&self.options)?;
        let (ownership, initial) = match self.initial {
            Some((ownership, value)) => (ownership, Some(value)),
            None => (Ownership::Uncontrolled, None),
        };
        let store = SelectionStore::new(self.config.mode(), ownership, initial)?;
        let view = filter(&self.options, "");
        Ok(SelectControl {
            options: self.options,
            view,
            store,
            navigator: Navigator::new(self.config.searchable),
            watcher: self.watcher,
            disabled: self.config.disabled,
            loading: self.config.loading,
            on_change: self.on_change,
        })
    }
}

impl<T: OptionValue> SelectControl<T> {
    /// Start building a control.
    #[must_use]
    pub fn builder() -> SelectControlBuilder<T> {
        SelectControlBuilder::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &[SelectOption<T>] {
        &self.options
    }

    /// Current filtered view.
    #[must_use]
    pub const fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &SelectionValue<T> {
        self.store.current_value()
    }

    /// Ephemeral view state.
    #[must_use]
    pub const fn view_state(&self) -> &ViewState {
        self.navigator.state()
    }

    /// Check if the popover is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.navigator.is_open()
    }

    /// Current query.
    #[must_use]
    pub fn query(&self) -> &str {
        self.navigator.query()
    }

    /// Highlighted view position.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.navigator.highlighted()
    }

    /// Option under the highlight.
    #[must_use]
    pub fn highlighted_option(&self) -> Option<&SelectOption<T>> {
        self.highlighted()
            .and_then(|p| self.view.get(p))
            .and_then(|i| self.options.get(i))
    }

    /// Selection mode.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.store.mode()
    }

    /// Ownership tag.
    #[must_use]
    pub const fn ownership(&self) -> Ownership {
        self.store.ownership()
    }

    /// Check if disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Check if loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Tracked screen regions.
    #[must_use]
    pub const fn watcher(&self) -> &DismissalWatcher {
        &self.watcher
    }

    const fn gated(&self) -> bool {
        self.disabled || self.loading
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Handle an input event.
    ///
    /// Key presses drive the navigator, text input edits the query, a
    /// primary activation on the trigger toggles the popover, and activations
    /// outside the control or focus loss dismiss it.
    pub fn handle(&mut self, event: &Event) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        if let Some(reason) = self.watcher.watch(event, self.is_open()) {
            return self.close_with(reason);
        }
        match event {
            Event::KeyDown { key } => self.key(*key),
            Event::TextInput { text } => self.type_text(text),
            _ => match event.activation_point() {
                Some(point) if self.watcher.hits_trigger(&point) => self.click_trigger(),
                _ => self.respond(None, None),
            },
        }
    }

    /// Handle a key press.
    pub fn key(&mut self, key: Key) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let intent = self.navigator.key(key, self.view.len());
        self.apply(intent)
    }

    /// Append typed text to the query.
    pub fn type_text(&mut self, text: &str) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let intent = self.navigator.text(text);
        self.apply(intent)
    }

    /// Replace the whole query.
    pub fn set_query(&mut self, query: &str) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let intent = self.navigator.set_query(query);
        self.apply(intent)
    }

    /// Toggle the popover, as clicking the trigger does.
    pub fn click_trigger(&mut self) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let intent = if self.is_open() {
            self.navigator.close(CloseReason::Trigger)
        } else {
            self.navigator.open()
        };
        self.apply(intent)
    }

    /// Commit the entry at view position `position`, as clicking an option
    /// row does.
    pub fn click_option(&mut self, position: usize) -> Response<T> {
        if self.gated() || !self.is_open() || position >= self.view.len() {
            return self.respond(None, None);
        }
        self.navigator.hover(position, self.view.len());
        self.commit(position)
    }

    /// Highlight the entry at view position `position`.
    pub fn hover(&mut self, position: usize) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let intent = self.navigator.hover(position, self.view.len());
        self.apply(intent)
    }

    /// Open the popover.
    pub fn open(&mut self) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let intent = self.navigator.open();
        self.apply(intent)
    }

    /// Close the popover.
    pub fn close(&mut self) -> Response<T> {
        self.close_with(CloseReason::Programmatic)
    }

    /// Select `value` by identity.
    ///
    /// The value does not need to be among the current options.
    pub fn select_value(&mut self, value: &T) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let option = self.option_for(value);
        let change = self.store.select(&option);
        self.finish_change(change)
    }

    /// Toggle `value` by identity.
    pub fn toggle_value(&mut self, value: &T) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let option = self.option_for(value);
        let change = self.store.toggle(&option);
        self.finish_change(change)
    }

    /// Remove `value`, as a chip's remove button does.
    pub fn remove_value(&mut self, value: &T) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let change = self.store.remove(value);
        self.finish_change(change)
    }

    /// Clear the selection. Notifies even when already empty.
    pub fn clear(&mut self) -> Response<T> {
        if self.gated() {
            return self.respond(None, None);
        }
        let change = self.store.clear();
        self.finish_change(Some(change))
    }

    // =========================================================================
    // External updates
    // =========================================================================

    /// Replace the options, for example when a fetch completes.
    ///
    /// The view is recomputed with the current query and the highlight is
    /// clamped into it. Selected values are kept even when their options are
    /// gone.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::DuplicateValue`](crate::ControlError::DuplicateValue)
    /// if two options share a value. The control is left unchanged.
    pub fn set_options(&mut self, options: Vec<SelectOption<T>>) -> Result<()> {
        ensure_unique(&options)?;
        debug!(count = options.len(), "options replaced");
        self.options = options;
        self.refilter();
        Ok(())
    }

    /// Replace the value. In controlled mode this is the echo of an accepted
    /// change.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::ModeMismatch`](crate::ControlError::ModeMismatch)
    /// if `value` does not fit the mode.
    pub fn set_value(&mut self, value: SelectionValue<T>) -> Result<()> {
        self.store.set_value(value)
    }

    /// Set the disabled flag. Disabling an open control closes it.
    pub fn set_disabled(&mut self, disabled: bool) -> Response<T> {
        self.disabled = disabled;
        self.close_if_gated()
    }

    /// Set the loading flag. Loading closes an open control.
    pub fn set_loading(&mut self, loading: bool) -> Response<T> {
        self.loading = loading;
        self.close_if_gated()
    }

    /// Enable or disable search. Disabling drops the current query.
    pub fn set_searchable(&mut self, searchable: bool) {
        self.navigator.set_searchable(searchable);
        self.refilter();
    }

    /// Update the tracked trigger and popover regions.
    pub fn set_bounds(&mut self, trigger: Rect, popover: Rect) {
        self.watcher = DismissalWatcher::with_bounds(trigger, popover);
    }

    /// Close and forget query and highlight. The value is kept.
    pub fn reset(&mut self) {
        self.navigator.reset();
        self.refilter();
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build the render model for the current state.
    #[must_use]
    pub fn render(&self) -> RenderModel<T> {
        let value = self.store.current_value();
        let highlighted = self.highlighted();

        let options = self
            .view
            .indices()
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                self.options.get(index).map(|o| RenderedOption {
                    value: o.value.clone(),
                    label: o.label.clone(),
                    group: o.group.clone(),
                    disabled: o.disabled,
                    selected: value.contains(&o.value),
                    highlighted: highlighted == Some(position),
                })
            })
            .collect();

        let chips = value
            .iter()
            .map(|v| Chip {
                value: v.clone(),
                label: find_by_value(&self.options, v).map(|o| o.label.clone()),
            })
            .collect();

        let selected_label = value
            .as_single()
            .and_then(|v| find_by_value(&self.options, v))
            .map(|o| o.label.clone());

        RenderModel {
            is_open: self.is_open(),
            query: self.query().to_string(),
            highlighted_index: self.navigator.state().highlighted_index(),
            options,
            sections: self.view.sections().to_vec(),
            chips,
            selected_label,
            is_empty: self.view.is_empty(),
            interactive: !self.gated(),
            loading: self.loading,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply(&mut self, intent: Intent) -> Response<T> {
        match intent {
            Intent::Opened => {
                debug!(highlighted = ?self.highlighted(), "opened");
                self.respond(None, None)
            }
            Intent::Closed(reason) => {
                debug!(?reason, "closed");
                self.refilter();
                self.respond(None, Some(reason))
            }
            Intent::Commit(position) => self.commit(position),
            Intent::QueryChanged { opened } => {
                self.refilter();
                debug!(query = self.query(), matches = self.view.len(), opened, "query changed");
                self.respond(None, None)
            }
            Intent::Moved | Intent::Ignored => self.respond(None, None),
        }
    }

    fn commit(&mut self, position: usize) -> Response<T> {
        let Some(option) = self.view.get(position).and_then(|i| self.options.get(i)) else {
            return self.respond(None, None);
        };
        let change = match self.store.mode() {
            SelectionMode::Single => self.store.select(option),
            SelectionMode::Multiple => self.store.toggle(option),
        };
        if change.is_none() {
            debug!(label = %option.label, "commit rejected");
        }
        self.finish_change(change)
    }

    fn finish_change(&mut self, change: Option<ValueChange<T>>) -> Response<T> {
        let Some(change) = change else {
            return self.respond(None, None);
        };
        debug!(
            selected = change.value.len(),
            applied = change.applied,
            close = change.close,
            "selection changed"
        );
        let closed = if change.close {
            match self.navigator.close(CloseReason::Commit) {
                Intent::Closed(reason) => {
                    self.refilter();
                    Some(reason)
                }
                _ => None,
            }
        } else {
            None
        };
        let message = self.message(change);
        if let Some(callback) = self.on_change.as_mut() {
            callback(&message);
        }
        self.respond(Some(message), closed)
    }

    fn message(&self, change: ValueChange<T>) -> SelectionChanged<T> {
        let selected_options = match &change.value {
            SelectionValue::Multi(values) => Some(
                values.iter().map(|v| self.option_for(v)).collect(),
            ),
            SelectionValue::Single(_) => None,
        };
        SelectionChanged {
            value: change.value,
            selected_options,
            close: change.close,
        }
    }

    fn close_with(&mut self, reason: CloseReason) -> Response<T> {
        let intent = self.navigator.close(reason);
        self.apply(intent)
    }

    fn close_if_gated(&mut self) -> Response<T> {
        if self.gated() {
            self.close_with(CloseReason::Disabled)
        } else {
            self.respond(None, None)
        }
    }

    fn option_for(&self, value: &T) -> SelectOption<T> {
        find_by_value(&self.options, value)
            .cloned()
            .unwrap_or_else(|| SelectOption::new(value.clone(), String::new()))
    }

    fn refilter(&mut self) {
        self.view = filter(&self.options, self.navigator.query());
        if self.navigator.clamp(self.view.len()) {
            debug!(highlighted = ?self.highlighted(), "highlight clamped");
        }
    }

    fn respond(&self, change: Option<SelectionChanged<T>>, closed: Option<CloseReason>) -> Response<T> {
        Response {
            change,
            closed,
            render: self.render(),
        }
    }
}

impl<T: OptionValue> Interactive for SelectControl<T> {
    type Message = SelectionChanged<T>;

    fn event(&mut self, event: &Event) -> Option<Self::Message> {
        self.handle(event).change
    }

    fn is_interactive(&self) -> bool {
        !self.gated()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ComboBox
    }

    fn bounds(&self) -> Rect {
        self.watcher.trigger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlError;
    use selectkit_core::Point;
    use std::sync::{Arc, Mutex};

    fn cities() -> Vec<SelectOption<u32>> {
        vec![
            SelectOption::new(1, "Maputo"),
            SelectOption::new(2, "Beira"),
            SelectOption::new(3, "Nampula").disabled(true),
        ]
    }

    fn single() -> SelectControl<u32> {
        SelectControl::builder()
            .options(cities())
            .searchable(true)
            .build()
            .unwrap()
    }

    fn multi() -> SelectControl<u32> {
        SelectControl::builder()
            .options(cities())
            .multiple(true)
            .searchable(true)
            .build()
            .unwrap()
    }

    fn recorder() -> (
        Arc<Mutex<Vec<SelectionChanged<u32>>>>,
        impl FnMut(&SelectionChanged<u32>) + Send + 'static,
    ) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        (log, move |c: &SelectionChanged<u32>| {
            sink.lock().unwrap().push(c.clone());
        })
    }

    // =========================================================================
    // Builder
    // =========================================================================

    #[test]
    fn test_builder_defaults() {
        let control: SelectControl<u32> = SelectControl::builder().build().unwrap();
        assert_eq!(control.mode(), SelectionMode::Single);
        assert_eq!(control.ownership(), Ownership::Uncontrolled);
        assert!(!control.is_open());
        assert!(control.value().is_empty());
        assert!(control.render().is_empty);
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let result = SelectControl::builder()
            .options(vec![SelectOption::new(1, "a"), SelectOption::new(1, "b")])
            .build();
        assert!(matches!(
            result,
            Err(ControlError::DuplicateValue {
                first: 0,
                duplicate: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_builder_rejects_wrong_shape() {
        let result = SelectControl::builder()
            .options(cities())
            .default_value(SelectionValue::multi([1]))
            .build();
        assert!(matches!(result, Err(ControlError::ModeMismatch { .. })));
    }

    #[test]
    fn test_builder_config() {
        let control: SelectControl<u32> = SelectControl::builder()
            .config(ControlConfig {
                multiple: true,
                searchable: false,
                disabled: true,
                loading: false,
            })
            .build()
            .unwrap();
        assert_eq!(control.mode(), SelectionMode::Multiple);
        assert!(control.is_disabled());
        assert!(!control.is_interactive());
    }

    #[test]
    fn test_default_value_not_in_options() {
        let control = SelectControl::builder()
            .options(cities())
            .default_value(SelectionValue::single(99))
            .build()
            .unwrap();
        let render = control.render();
        assert_eq!(render.chips.len(), 1);
        assert_eq!(render.chips[0].label, None);
        assert_eq!(render.selected_label, None);
    }

    // =========================================================================
    // Single mode
    // =========================================================================

    #[test]
    fn test_single_commit_closes_and_resets() {
        let mut control = single();
        control.type_text("b");
        control.key(Key::Down);
        let response = control.key(Key::Enter);
        let change = response.change.unwrap();
        assert_eq!(change.value, SelectionValue::single(2));
        assert!(change.close);
        assert!(change.selected_options.is_none());
        assert_eq!(response.closed, Some(CloseReason::Commit));
        assert!(!response.render.is_open);
        assert_eq!(response.render.query, "");
        assert_eq!(response.render.highlighted_index, -1);
        assert_eq!(response.render.options.len(), 3);
        assert_eq!(response.render.selected_label.as_deref(), Some("Beira"));
    }

    #[test]
    fn test_single_reselect_notifies() {
        let (log, callback) = recorder();
        let mut control = SelectControl::builder()
            .options(cities())
            .default_value(SelectionValue::single(1))
            .on_change(callback)
            .build()
            .unwrap();
        control.key(Key::Down);
        control.key(Key::Enter);
        assert_eq!(log.lock().unwrap().len(), 1);
        assert_eq!(control.value(), &SelectionValue::single(1));
    }

    #[test]
    fn test_commit_disabled_is_noop() {
        let (log, callback) = recorder();
        let mut control = SelectControl::builder()
            .options(cities())
            .on_change(callback)
            .build()
            .unwrap();
        control.key(Key::Down);
        control.key(Key::End);
        assert_eq!(control.highlighted_option().map(|o| o.value), Some(3));
        let response = control.key(Key::Enter);
        assert!(response.change.is_none());
        assert!(response.render.is_open);
        assert!(log.lock().unwrap().is_empty());
        assert!(control.value().is_empty());
    }

    #[test]
    fn test_enter_without_highlight_does_nothing() {
        let mut control = single();
        control.open();
        let response = control.key(Key::Enter);
        assert!(response.change.is_none());
        assert!(response.render.is_open);
    }

    // =========================================================================
    // Multi mode
    // =========================================================================

    #[test]
    fn test_multi_commit_keeps_open_and_query() {
        let mut control = multi();
        control.type_text("a");
        control.key(Key::Down);
        let response = control.key(Key::Enter);
        let change = response.change.unwrap();
        assert_eq!(change.value, SelectionValue::multi([1]));
        assert!(!change.close);
        assert_eq!(
            change.selected_options,
            Some(vec![SelectOption::new(1, "Maputo")])
        );
        assert!(response.render.is_open);
        assert_eq!(response.render.query, "a");
        assert!(response.render.options[0].selected);
    }

    #[test]
    fn test_multi_commit_twice_toggles_off() {
        let mut control = multi();
        control.key(Key::Down);
        control.key(Key::Enter);
        control.key(Key::Enter);
        assert!(control.value().is_empty());
    }

    #[test]
    fn test_chips_in_selection_order() {
        let mut control = multi();
        control.open();
        control.click_option(1);
        control.click_option(0);
        let render = control.render();
        let labels: Vec<_> = render.chips.iter().map(|c| c.label.as_deref()).collect();
        assert_eq!(labels, [Some("Beira"), Some("Maputo")]);

        control.remove_value(&2);
        assert_eq!(control.value(), &SelectionValue::multi([1]));
    }

    #[test]
    fn test_clear_always_notifies() {
        let (log, callback) = recorder();
        let mut control = SelectControl::builder()
            .options(cities())
            .multiple(true)
            .on_change(callback)
            .build()
            .unwrap();
        let response = control.clear();
        assert!(response.change.unwrap().value.is_empty());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_select_and_toggle_value() {
        let mut control = multi();
        control.select_value(&2);
        control.select_value(&2);
        control.toggle_value(&1);
        assert_eq!(control.value(), &SelectionValue::multi([2, 1]));
        control.toggle_value(&2);
        assert_eq!(control.value(), &SelectionValue::multi([1]));
        assert!(control.toggle_value(&3).change.is_none());
    }

    // =========================================================================
    // Controlled mode
    // =========================================================================

    #[test]
    fn test_controlled_proposes_and_waits_for_echo() {
        let (log, callback) = recorder();
        let mut control = SelectControl::builder()
            .options(cities())
            .value(SelectionValue::Single(None))
            .on_change(callback)
            .build()
            .unwrap();
        control.key(Key::Down);
        let response = control.key(Key::Enter);
        assert_eq!(response.change.unwrap().value, SelectionValue::single(1));
        assert!(control.value().is_empty());
        assert!(!response.render.is_open);

        let proposed = log.lock().unwrap()[0].value.clone();
        control.set_value(proposed).unwrap();
        assert_eq!(control.value(), &SelectionValue::single(1));
    }

    #[test]
    fn test_controlled_rejecting_caller_keeps_value() {
        let mut control = SelectControl::builder()
            .options(cities())
            .multiple(true)
            .value(SelectionValue::multi([2]))
            .build()
            .unwrap();
        control.select_value(&1);
        control.clear();
        assert_eq!(control.value(), &SelectionValue::multi([2]));
        assert!(control.set_value(SelectionValue::single(1)).is_err());
    }

    // =========================================================================
    // Pointer and dismissal
    // =========================================================================

    fn bounded() -> SelectControl<u32> {
        let trigger = Rect::new(0.0, 0.0, 200.0, 30.0);
        SelectControl::builder()
            .options(cities())
            .trigger_bounds(trigger)
            .popover_bounds(trigger.below(120.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_trigger_click_toggles() {
        let mut control = bounded();
        control.handle(&Event::click(Point::new(10.0, 10.0)));
        assert!(control.is_open());
        let response = control.handle(&Event::click(Point::new(10.0, 10.0)));
        assert_eq!(response.closed, Some(CloseReason::Trigger));
    }

    #[test]
    fn test_outside_click_dismisses() {
        let mut control = bounded();
        control.open();
        control.key(Key::Down);
        let inside = control.handle(&Event::click(Point::new(10.0, 100.0)));
        assert!(inside.render.is_open);
        let outside = control.handle(&Event::click(Point::new(400.0, 400.0)));
        assert_eq!(outside.closed, Some(CloseReason::Outside));
        assert_eq!(outside.render.highlighted_index, -1);
        assert!(outside.change.is_none());
    }

    #[test]
    fn test_focus_out_dismisses() {
        let mut control = bounded();
        control.open();
        let response = control.handle(&Event::FocusOut);
        assert_eq!(response.closed, Some(CloseReason::FocusLost));
    }

    #[test]
    fn test_handle_routes_keys_and_text() {
        let mut control = single();
        control.handle(&Event::text("nam"));
        assert_eq!(control.query(), "nam");
        assert_eq!(control.view().len(), 1);
        control.handle(&Event::key(Key::Escape));
        assert!(!control.is_open());
        assert_eq!(control.view().len(), 3);
    }

    #[test]
    fn test_hover_and_click_option() {
        let mut control = single();
        control.open();
        control.hover(1);
        assert_eq!(control.highlighted(), Some(1));
        let response = control.click_option(1);
        assert_eq!(response.change.unwrap().value, SelectionValue::single(2));
        assert!(control.click_option(5).change.is_none());
    }

    #[test]
    fn test_click_option_when_closed_ignored() {
        let mut control = single();
        assert!(control.click_option(0).change.is_none());
    }

    // =========================================================================
    // Gate and external updates
    // =========================================================================

    #[test]
    fn test_loading_closes_and_ignores_input() {
        let mut control = single();
        control.type_text("ma");
        let response = control.set_loading(true);
        assert_eq!(response.closed, Some(CloseReason::Disabled));
        assert_eq!(response.render.query, "");
        assert!(!response.render.interactive);
        assert!(response.render.loading);

        assert!(!control.key(Key::Down).render.is_open);
        assert!(control.clear().change.is_none());
        assert!(control.select_value(&1).change.is_none());

        control.set_loading(false);
        assert!(control.key(Key::Down).render.is_open);
    }

    #[test]
    fn test_disabled_ignores_events() {
        let mut control = bounded();
        control.set_disabled(true);
        assert!(!control.handle(&Event::click(Point::new(10.0, 10.0))).render.is_open);
        assert!(control.event(&Event::key(Key::Down)).is_none());
        assert!(!control.is_open());
    }

    #[test]
    fn test_set_options_clamps_highlight() {
        let mut control = single();
        control.open();
        control.key(Key::End);
        assert_eq!(control.highlighted(), Some(2));
        control
            .set_options(vec![SelectOption::new(7, "Tete")])
            .unwrap();
        assert_eq!(control.highlighted(), Some(0));
        control.set_options(Vec::new()).unwrap();
        assert_eq!(control.highlighted(), None);
        assert!(control.render().is_empty);
    }

    #[test]
    fn test_set_options_rejects_duplicates_and_keeps_state() {
        let mut control = single();
        let result = control.set_options(vec![SelectOption::new(1, "a"), SelectOption::new(1, "b")]);
        assert!(result.is_err());
        assert_eq!(control.options().len(), 3);
    }

    #[test]
    fn test_set_options_keeps_query() {
        let mut control = single();
        control.type_text("e");
        control
            .set_options(vec![
                SelectOption::new(4, "Tete"),
                SelectOption::new(5, "Lichinga"),
            ])
            .unwrap();
        assert_eq!(control.render().labels(), ["Tete"]);
    }

    #[test]
    fn test_value_survives_filtering() {
        let mut control = single();
        control.select_value(&1);
        control.type_text("bei");
        let render = control.render();
        assert_eq!(render.labels(), ["Beira"]);
        assert_eq!(render.selected_label.as_deref(), Some("Maputo"));
    }

    #[test]
    fn test_reset_and_searchable_toggle() {
        let mut control = single();
        control.type_text("ma");
        control.set_searchable(false);
        assert_eq!(control.query(), "");
        assert_eq!(control.view().len(), 3);
        assert!(control.type_text("x").render.query.is_empty());

        control.reset();
        assert!(!control.is_open());
    }

    #[test]
    fn test_disabling_search_drops_stale_highlight() {
        let mut control = single();
        control.type_text("bei");
        control.key(Key::Down);
        assert_eq!(control.highlighted_option().map(|o| o.label.as_str()), Some("Beira"));

        control.set_searchable(false);
        assert!(control.is_open());
        assert_eq!(control.highlighted(), None);
        assert!(control.key(Key::Enter).change.is_none());
        assert_eq!(control.value(), &SelectionValue::Single(None));
    }

    #[test]
    fn test_selected_option_disabled_later_is_kept() {
        let mut control = multi();
        control.toggle_value(&1);
        control
            .set_options(vec![
                SelectOption::new(1, "Maputo").disabled(true),
                SelectOption::new(2, "Beira"),
            ])
            .unwrap();
        assert_eq!(control.value(), &SelectionValue::multi([1]));
        assert!(control.render().options[0].selected);

        assert!(control.toggle_value(&1).change.is_none());
        assert!(control.select_value(&1).change.is_none());
        assert_eq!(control.value(), &SelectionValue::multi([1]));
    }

    #[test]
    fn test_selected_options_cover_unlisted_values() {
        let mut control = multi();
        control.toggle_value(&1);
        let change = control.toggle_value(&99).change.unwrap();
        assert_eq!(change.value, SelectionValue::multi([1, 99]));
        let selected = change.selected_options.unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].label, "Maputo");
        assert_eq!(selected[1].value, 99);
        assert_eq!(selected[1].label, "");
    }

    #[test]
    fn test_interactive_trait() {
        let mut control = bounded();
        assert_eq!(control.accessible_role(), AccessibleRole::ComboBox);
        assert_eq!(control.bounds(), Rect::new(0.0, 0.0, 200.0, 30.0));
        control.event(&Event::key(Key::Down));
        let message = control.event(&Event::key(Key::Enter)).unwrap();
        assert_eq!(message.value, SelectionValue::single(1));

        control.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0), Rect::default());
        assert_eq!(control.watcher().trigger(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_control_is_send() {
        fn assert_send<S: Send>() {}
        assert_send::<SelectControl<u32>>();
    }
}
