//! Test harness for selectkit controls.

use selectkit::{
    CloseReason, OptionValue, RenderModel, Response, SelectControl, SelectionChanged,
    SelectionValue,
};
use selectkit_core::{Event, Key, MouseButton, Point, Rect};
use std::collections::VecDeque;

/// Distance from the tracked regions used for outside clicks.
const OUTSIDE_MARGIN: f32 = 50.0;

/// Test harness for driving a [`SelectControl`] with simulated input.
///
/// Every response is recorded, so tests can assert on the changes and close
/// reasons an interaction produced.
pub struct Harness<T> {
    /// Control being tested
    control: SelectControl<T>,
    /// Event queue for simulation
    event_queue: VecDeque<Event>,
    /// Selection changes seen so far
    changes: Vec<SelectionChanged<T>>,
    /// Close reasons seen so far
    closes: Vec<CloseReason>,
}

impl<T: OptionValue> Harness<T> {
    /// Create a new harness around a control.
    pub fn new(control: SelectControl<T>) -> Self {
        Self {
            control,
            event_queue: VecDeque::new(),
            changes: Vec::new(),
            closes: Vec::new(),
        }
    }

    /// Control under test.
    #[must_use]
    pub const fn control(&self) -> &SelectControl<T> {
        &self.control
    }

    /// Mutable access for external updates (`set_options`, `set_value`, ...).
    pub fn control_mut(&mut self) -> &mut SelectControl<T> {
        &mut self.control
    }

    // === Event Simulation ===

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.event_queue.push_back(Event::KeyDown { key });
        self.event_queue.push_back(Event::KeyUp { key });
        self.process_events();
        self
    }

    /// Simulate a sequence of key presses.
    pub fn press_keys(&mut self, keys: &[Key]) -> &mut Self {
        for &key in keys {
            self.press_key(key);
        }
        self
    }

    /// Simulate typing text, one character at a time.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        for c in text.chars() {
            self.event_queue.push_back(Event::TextInput {
                text: c.to_string(),
            });
        }
        self.process_events();
        self
    }

    /// Simulate a primary click at `position`.
    pub fn click_at(&mut self, position: Point) -> &mut Self {
        self.event_queue.push_back(Event::MouseMove { position });
        self.event_queue.push_back(Event::MouseDown {
            position,
            button: MouseButton::Left,
        });
        self.event_queue.push_back(Event::MouseUp {
            position,
            button: MouseButton::Left,
        });
        self.process_events();
        self
    }

    /// Click the trigger. Uses its center when bounds are known.
    pub fn click_trigger(&mut self) -> &mut Self {
        let trigger = self.control.watcher().trigger();
        if trigger.is_empty() {
            let response = self.control.click_trigger();
            self.record(response);
            self
        } else {
            self.click_at(trigger.center())
        }
    }

    /// Click somewhere outside both the trigger and the popover.
    pub fn click_outside(&mut self) -> &mut Self {
        let point = self.outside_point();
        self.click_at(point)
    }

    /// Click the option row at view position `position`.
    pub fn click_option(&mut self, position: usize) -> &mut Self {
        let response = self.control.click_option(position);
        self.record(response);
        self
    }

    /// Hover the option row at view position `position`.
    pub fn hover(&mut self, position: usize) -> &mut Self {
        let response = self.control.hover(position);
        self.record(response);
        self
    }

    /// Simulate focus leaving the control.
    pub fn blur(&mut self) -> &mut Self {
        self.event_queue.push_back(Event::FocusOut);
        self.process_events();
        self
    }

    /// Replace the query, as a host text field does.
    pub fn set_query(&mut self, query: &str) -> &mut Self {
        let response = self.control.set_query(query);
        self.record(response);
        self
    }

    /// Open programmatically.
    pub fn open(&mut self) -> &mut Self {
        let response = self.control.open();
        self.record(response);
        self
    }

    /// Close programmatically.
    pub fn close(&mut self) -> &mut Self {
        let response = self.control.close();
        self.record(response);
        self
    }

    /// Press the clear button.
    pub fn clear(&mut self) -> &mut Self {
        let response = self.control.clear();
        self.record(response);
        self
    }

    /// Press a chip's remove button.
    pub fn remove(&mut self, value: &T) -> &mut Self {
        let response = self.control.remove_value(value);
        self.record(response);
        self
    }

    /// Echo the last proposed value back, as a controlled host does.
    ///
    /// # Panics
    ///
    /// Panics if there is no change to echo or it does not fit the mode.
    pub fn accept_last_change(&mut self) -> &mut Self {
        let value = self
            .changes
            .last()
            .map(|c| c.value.clone())
            .expect("no change to accept");
        self.control
            .set_value(value)
            .expect("proposed value must fit the mode");
        self
    }

    // === Queries ===

    /// Current render model.
    #[must_use]
    pub fn render(&self) -> RenderModel<T> {
        self.control.render()
    }

    /// Recorded selection changes, oldest first.
    #[must_use]
    pub fn changes(&self) -> &[SelectionChanged<T>] {
        &self.changes
    }

    /// Most recent selection change.
    #[must_use]
    pub fn last_change(&self) -> Option<&SelectionChanged<T>> {
        self.changes.last()
    }

    /// Recorded close reasons, oldest first.
    #[must_use]
    pub fn close_reasons(&self) -> &[CloseReason] {
        &self.closes
    }

    /// Labels of the rendered option rows.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.render().options.into_iter().map(|o| o.label).collect()
    }

    // === Assertions ===

    /// Assert that the popover is open.
    ///
    /// # Panics
    ///
    /// Panics if the popover is closed.
    pub fn assert_open(&self) -> &Self {
        assert!(self.control.is_open(), "Expected control to be open");
        self
    }

    /// Assert that the popover is closed.
    ///
    /// # Panics
    ///
    /// Panics if the popover is open.
    pub fn assert_closed(&self) -> &Self {
        assert!(!self.control.is_open(), "Expected control to be closed");
        self
    }

    /// Assert the current query.
    ///
    /// # Panics
    ///
    /// Panics if the query does not match.
    pub fn assert_query(&self, expected: &str) -> &Self {
        let actual = self.control.query();
        assert_eq!(
            actual, expected,
            "Expected query '{expected}' but got '{actual}'"
        );
        self
    }

    /// Assert the label of the highlighted row, `None` for no highlight.
    ///
    /// # Panics
    ///
    /// Panics if the highlight does not match.
    pub fn assert_highlighted(&self, expected: Option<&str>) -> &Self {
        let actual = self.control.highlighted_option().map(|o| o.label.as_str());
        assert_eq!(
            actual, expected,
            "Expected highlight {expected:?} but got {actual:?}"
        );
        self
    }

    /// Assert the labels of the rendered rows.
    ///
    /// # Panics
    ///
    /// Panics if the labels do not match.
    pub fn assert_labels(&self, expected: &[&str]) -> &Self {
        let actual = self.labels();
        assert_eq!(
            actual, expected,
            "Expected rows {expected:?} but got {actual:?}"
        );
        self
    }

    /// Assert the current value.
    ///
    /// # Panics
    ///
    /// Panics if the value does not match.
    pub fn assert_value(&self, expected: &SelectionValue<T>) -> &Self {
        let actual = self.control.value();
        assert_eq!(
            actual, expected,
            "Expected value {expected:?} but got {actual:?}"
        );
        self
    }

    /// Assert the number of recorded changes.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_change_count(&self, expected: usize) -> &Self {
        let actual = self.changes.len();
        assert_eq!(
            actual, expected,
            "Expected {expected} selection changes but found {actual}"
        );
        self
    }

    // === Internal ===

    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            let response = self.control.handle(&event);
            self.record(response);
        }
    }

    fn record(&mut self, response: Response<T>) {
        if let Some(change) = response.change {
            self.changes.push(change);
        }
        if let Some(reason) = response.closed {
            self.closes.push(reason);
        }
    }

    fn outside_point(&self) -> Point {
        let watcher = self.control.watcher();
        let region = [watcher.trigger(), watcher.popover()]
            .into_iter()
            .filter(|r| !r.is_empty())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let Rect {
            x,
            y,
            width,
            height,
        } = region;
        Point::new(x + width + OUTSIDE_MARGIN, y + height + OUTSIDE_MARGIN)
    }
}
