//! Testing harness for selectkit controls.
//!
//! - [`Harness`]: drive a control with simulated input and assert on the
//!   changes, close reasons, and render model it produces
//! - [`Step`] / [`parse_script`]: line-oriented interaction scripts
//!
//! ```
//! use selectkit::{SelectControl, SelectOption, SelectionValue};
//! use selectkit_core::Key;
//! use selectkit_test::Harness;
//!
//! let control = SelectControl::builder()
//!     .options(vec![SelectOption::new(1, "Maputo"), SelectOption::new(2, "Beira")])
//!     .build()
//!     .unwrap();
//!
//! let mut harness = Harness::new(control);
//! harness.press_keys(&[Key::Down, Key::Enter]);
//! harness
//!     .assert_closed()
//!     .assert_value(&SelectionValue::single(1))
//!     .assert_change_count(1);
//! ```

#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

mod harness;
mod script;

pub use harness::Harness;
pub use script::{parse_script, script_lines, ScriptError, Step};
