//! Selection control state machine.
//!
//! `selectkit` implements the state core of a dropdown/combobox: single and
//! multiple selection, live text filtering, option grouping, keyboard
//! navigation, outside-click dismissal, and controlled or uncontrolled value
//! ownership. It draws nothing. The host feeds it events and renders the
//! [`RenderModel`] it returns.
//!
//! # Components
//!
//! - [`SelectOption`]: value, label, group, disabled flag
//! - [`filter`]: query-filtered, group-partitioned [`FilteredView`]
//! - [`SelectionStore`]: the current [`SelectionValue`]
//! - [`Navigator`]: open/closed state, query, highlight cursor
//! - [`DismissalWatcher`]: outside-click and focus-loss detection
//! - [`SelectControl`]: the facade composing all of the above
//!
//! # Quick Start
//!
//! ```
//! use selectkit::{SelectControl, SelectOption, SelectionValue};
//! use selectkit_core::Key;
//!
//! let mut control = SelectControl::builder()
//!     .options(vec![
//!         SelectOption::new(1, "Maputo"),
//!         SelectOption::new(2, "Beira"),
//!         SelectOption::new(3, "Nampula").disabled(true),
//!     ])
//!     .multiple(true)
//!     .searchable(true)
//!     .build()
//!     .unwrap();
//!
//! control.type_text("a");
//! control.key(Key::Down);
//! control.key(Key::Enter);
//!
//! assert_eq!(control.value(), &SelectionValue::multi([1]));
//! assert!(control.is_open());
//! assert_eq!(control.query(), "a");
//! ```

mod config;
mod control;
mod dismiss;
mod error;
mod filter;
mod navigator;
mod option;
mod render;
mod store;

pub use config::{ConfigError, ControlConfig, ControlManifest};
pub use control::{ChangeCallback, SelectControl, SelectControlBuilder};
pub use dismiss::DismissalWatcher;
pub use error::{ControlError, Result};
pub use filter::{filter, FilteredView, Section};
pub use navigator::{CloseReason, Intent, Navigator, ViewState, PAGE_SIZE};
pub use option::{ensure_unique, find_by_value, find_duplicate, OptionValue, SelectOption};
pub use render::{Chip, RenderModel, RenderedOption, Response, SelectionChanged};
pub use store::{Ownership, SelectionMode, SelectionStore, SelectionValue, ValueChange};
