#![forbid(unsafe_code)]

//! Core: pixel geometry and pointer input primitives.
//!
//! # Role in Vellum
//! `vellum-core` is the leaf crate. It owns the floating-point geometry used
//! to place blocks on the canvas and the host-agnostic pointer event types
//! that the interaction machine in `vellum-canvas` consumes.
//!
//! Nothing here knows about documents, sections, or blocks; hosts translate
//! their native input (DOM pointer events, winit, test scripts) into
//! [`event::PointerEvent`] values and measured layout into [`geometry::Rect`].

pub mod event;
pub mod geometry;

pub use event::{Modifiers, PointerButton, PointerEvent, PointerEventKind};
pub use geometry::{Axis, Point, Rect, Size};
