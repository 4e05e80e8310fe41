#![forbid(unsafe_code)]

//! Host-agnostic pointer input.
//!
//! # Design Notes
//!
//! - Positions are canvas pixels, already corrected for scroll and zoom by
//!   the host adapter.
//! - `pointer_id` distinguishes concurrent pointers (touch, pen); an active
//!   interaction only reacts to the pointer that started it.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerButton {
    /// Left mouse button, primary touch, or pen tip.
    #[default]
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Middle,
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released.
    Up(PointerButton),
    /// The platform aborted the pointer stream (touch cancel, capture lost).
    Cancel,
}

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,
    /// Stable identifier for the pointer; `0` is reserved.
    pub pointer_id: u32,
    /// Position in canvas pixels.
    pub position: Point,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event without modifiers.
    #[must_use]
    pub const fn new(kind: PointerEventKind, pointer_id: u32, position: Point) -> Self {
        Self {
            kind,
            pointer_id,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button press.
    #[must_use]
    pub const fn down(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(
            PointerEventKind::Down(PointerButton::Primary),
            pointer_id,
            Point::new(x, y),
        )
    }

    /// Pointer motion.
    #[must_use]
    pub const fn moved(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, pointer_id, Point::new(x, y))
    }

    /// Primary-button release.
    #[must_use]
    pub const fn up(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(
            PointerEventKind::Up(PointerButton::Primary),
            pointer_id,
            Point::new(x, y),
        )
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
