//! Core types and traits for selectkit controls.
//!
//! This crate provides the input vocabulary shared by every selectkit crate:
//! - Geometric primitives for hit testing: [`Point`], [`Rect`]
//! - Events delivered by the host UI: [`Event`], [`Key`], [`MouseButton`]
//! - The [`Interactive`] trait implemented by controls

mod event;
mod geometry;
mod interactive;

pub use event::{Event, Key, KeyParseError, MouseButton, PointerId, PointerType};
pub use geometry::{Point, Rect};
pub use interactive::{AccessibleRole, Interactive};
