//! Keyboard navigator: open/closed state, search query, and highlight cursor.
//!
//! The navigator never touches options or values. It is told the length of
//! the current filtered view and answers with an [`Intent`] that the control
//! facade acts on.

use selectkit_core::Key;
use serde::{Deserialize, Serialize};

/// Rows moved by PageUp/PageDown.
pub const PAGE_SIZE: usize = 10;

/// Why a control closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// A single-mode selection was committed
    Commit,
    /// Escape key pressed
    Escape,
    /// Pointer activation outside the trigger and popover
    Outside,
    /// Focus left the control
    FocusLost,
    /// Tab key pressed
    Tab,
    /// Trigger clicked while open
    Trigger,
    /// The control became disabled or started loading
    Disabled,
    /// Closed by the host
    Programmatic,
}

/// Ephemeral view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Whether the popover is open
    pub is_open: bool,
    /// Current search text
    pub query: String,
    /// Highlighted position in the filtered view
    pub highlighted: Option<usize>,
}

impl ViewState {
    /// Highlight as a signed index, `-1` when nothing is highlighted.
    #[must_use]
    pub fn highlighted_index(&self) -> isize {
        self.highlighted
            .and_then(|h| isize::try_from(h).ok())
            .unwrap_or(-1)
    }

    fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
        self.highlighted = None;
    }
}

/// What the facade should do after a navigator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The popover opened
    Opened,
    /// The popover closed; query and highlight were reset
    Closed(CloseReason),
    /// The highlight moved
    Moved,
    /// Commit the entry at this view position
    Commit(usize),
    /// The query changed; the view must be recomputed
    QueryChanged {
        /// Whether the same step also opened the popover
        opened: bool,
    },
    /// Nothing changed
    Ignored,
}

/// Keyboard state machine.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: ViewState,
    searchable: bool,
}

impl Navigator {
    /// Create a closed navigator.
    #[must_use]
    pub fn new(searchable: bool) -> Self {
        Self {
            state: ViewState::default(),
            searchable,
        }
    }

    /// Current view state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Check if open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Current query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// Highlighted view position.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.state.highlighted
    }

    /// Check if typed text edits the query.
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Enable or disable searching. Disabling drops the current query.
    pub fn set_searchable(&mut self, searchable: bool) {
        self.searchable = searchable;
        if !searchable && !self.state.query.is_empty() {
            self.state.query.clear();
            self.state.highlighted = None;
        }
    }

    /// Handle a key press against a view of `view_len` entries.
    pub fn key(&mut self, key: Key, view_len: usize) -> Intent {
        if !self.state.is_open {
            return match key {
                Key::Enter | Key::Space | Key::Up => self.open(),
                Key::Down => {
                    self.state.is_open = true;
                    self.state.highlighted = (view_len > 0).then_some(0);
                    Intent::Opened
                }
                _ => Intent::Ignored,
            };
        }

        match key {
            Key::Down => self.step_down(view_len),
            Key::Up => self.step_up(view_len),
            Key::Home => self.move_to((view_len > 0).then_some(0)),
            Key::End => self.move_to(view_len.checked_sub(1)),
            Key::PageDown => self.page(view_len, |h, last| (h + PAGE_SIZE).min(last)),
            Key::PageUp => self.page(view_len, |h, _| h.saturating_sub(PAGE_SIZE)),
            Key::Enter | Key::Space => self
                .state
                .highlighted
                .filter(|&h| h < view_len)
                .map_or(Intent::Ignored, Intent::Commit),
            Key::Escape => self.close(CloseReason::Escape),
            Key::Tab => self.close(CloseReason::Tab),
            Key::Backspace if self.searchable => {
                if self.state.query.pop().is_some() {
                    self.state.highlighted = None;
                    Intent::QueryChanged { opened: false }
                } else {
                    Intent::Ignored
                }
            }
            _ => Intent::Ignored,
        }
    }

    /// Append typed text to the query, opening if closed.
    ///
    /// The highlight is reset; no entry is highlighted automatically.
    pub fn text(&mut self, text: &str) -> Intent {
        if !self.searchable || text.chars().all(char::is_control) {
            return Intent::Ignored;
        }
        let opened = !self.state.is_open;
        self.state.is_open = true;
        self.state
            .query
            .extend(text.chars().filter(|c| !c.is_control()));
        self.state.highlighted = None;
        Intent::QueryChanged { opened }
    }

    /// Replace the whole query, as a host text field does.
    pub fn set_query(&mut self, query: &str) -> Intent {
        if !self.searchable || self.state.query == query {
            return Intent::Ignored;
        }
        let opened = !self.state.is_open && !query.is_empty();
        if opened {
            self.state.is_open = true;
        }
        query.clone_into(&mut self.state.query);
        self.state.highlighted = None;
        Intent::QueryChanged { opened }
    }

    /// Highlight a view position, as pointer hover does. Only while open.
    pub fn hover(&mut self, position: usize, view_len: usize) -> Intent {
        if !self.state.is_open || position >= view_len {
            return Intent::Ignored;
        }
        self.move_to(Some(position))
    }

    /// Open without highlighting anything.
    pub fn open(&mut self) -> Intent {
        if self.state.is_open {
            return Intent::Ignored;
        }
        self.state.is_open = true;
        self.state.highlighted = None;
        Intent::Opened
    }

    /// Close, resetting query and highlight.
    pub fn close(&mut self, reason: CloseReason) -> Intent {
        if !self.state.is_open {
            return Intent::Ignored;
        }
        self.state.close();
        Intent::Closed(reason)
    }

    /// Keep the highlight inside a view of `view_len` entries.
    ///
    /// Returns `true` if the highlight changed.
    pub fn clamp(&mut self, view_len: usize) -> bool {
        match self.state.highlighted {
            Some(h) if h >= view_len => {
                self.state.highlighted = view_len.checked_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Back to the initial closed state.
    pub fn reset(&mut self) {
        self.state.close();
    }

    fn step_down(&mut self, view_len: usize) -> Intent {
        if view_len == 0 {
            return Intent::Ignored;
        }
        let next = self.state.highlighted.map_or(0, |h| (h + 1) % view_len);
        self.move_to(Some(next))
    }

    fn step_up(&mut self, view_len: usize) -> Intent {
        if view_len == 0 {
            return Intent::Ignored;
        }
        let next = match self.state.highlighted {
            None | Some(0) => view_len - 1,
            Some(h) => h.min(view_len) - 1,
        };
        self.move_to(Some(next))
    }

    /// Page moves stop at the ends instead of wrapping. With no highlight
    /// they start from the first row.
    fn page(&mut self, view_len: usize, step: impl Fn(usize, usize) -> usize) -> Intent {
        let Some(last) = view_len.checked_sub(1) else {
            return Intent::Ignored;
        };
        let target = self.state.highlighted.map_or(0, |h| step(h.min(last), last));
        self.move_to(Some(target))
    }

    fn move_to(&mut self, target: Option<usize>) -> Intent {
        if target.is_none() || self.state.highlighted == target {
            return Intent::Ignored;
        }
        self.state.highlighted = target;
        Intent::Moved
    }
}
