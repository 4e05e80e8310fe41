#![forbid(unsafe_code)]

//! Deterministic pointer interaction lifecycle for blocks and sections.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle
//!           |  \-> Resizing -> Idle
//!           \----> Idle (select on release, or cancel)
//! ```
//!
//! The machine only tracks pointer bookkeeping. It never touches the
//! document: the editor maps each [`InteractionTransition`] effect onto snap
//! previews, commits, and host callbacks.
//!
//! # Invariants
//!
//! 1. Only the pointer that armed the machine can advance or release it.
//! 2. A release while [`InteractionState::Armed`] is a select and carries no
//!    movement.
//! 3. The mode (drag or resize) is fixed by the target at arm time.
//! 4. Every call to [`InteractionMachine::apply`] yields exactly one
//!    transition with a strictly increasing `transition_id`.
//!
//! # Failure Modes
//!
//! Out-of-order input never errors: it produces a
//! [`InteractionEffect::Noop`] with an explicit [`InteractionNoopReason`].

use std::fmt;

use serde::{Deserialize, Serialize};
use vellum_core::geometry::Point;

use crate::id::{BlockId, SectionId};

/// Default pointer travel, per axis, before an armed press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 5.0;

/// Resize grip on a selected block.
///
/// Grips sit on the trailing edges only; resizing never moves the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    Right,
    Bottom,
    BottomRight,
}

impl ResizeHandle {
    /// Whether the grip changes width.
    #[must_use]
    pub const fn resizes_width(self) -> bool {
        matches!(self, Self::Right | Self::BottomRight)
    }

    /// Whether the grip changes height.
    #[must_use]
    pub const fn resizes_height(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomRight)
    }
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionTarget {
    /// Block body; moving drags the block.
    Block { block_id: BlockId },
    /// Block resize grip.
    BlockResize {
        block_id: BlockId,
        handle: ResizeHandle,
    },
    /// Section bottom edge; moving changes the section height.
    SectionResize { section_id: SectionId },
}

impl InteractionTarget {
    #[must_use]
    pub const fn block(block_id: BlockId) -> Self {
        Self::Block { block_id }
    }

    #[must_use]
    pub const fn block_resize(block_id: BlockId, handle: ResizeHandle) -> Self {
        Self::BlockResize { block_id, handle }
    }

    #[must_use]
    pub const fn section_resize(section_id: SectionId) -> Self {
        Self::SectionResize { section_id }
    }

    /// Block this target belongs to, if any.
    #[must_use]
    pub const fn block_id(self) -> Option<BlockId> {
        match self {
            Self::Block { block_id } | Self::BlockResize { block_id, .. } => Some(block_id),
            Self::SectionResize { .. } => None,
        }
    }

    /// Mode the target enters once the threshold is crossed.
    #[must_use]
    pub const fn mode(self) -> InteractionMode {
        match self {
            Self::Block { .. } => InteractionMode::Drag,
            Self::BlockResize { .. } | Self::SectionResize { .. } => InteractionMode::Resize,
        }
    }
}

/// Active interaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    Drag,
    Resize,
}

/// Why an interaction was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EscapeKey,
    PointerCancel,
    Blur,
    /// The pointer left every measured section box.
    LeftBounds,
    Programmatic,
}

/// Machine input, already hit-tested by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum InteractionInput {
    PointerDown {
        target: InteractionTarget,
        pointer_id: u32,
        position: Point,
        /// Locked targets refuse to arm.
        locked: bool,
    },
    PointerMove {
        pointer_id: u32,
        position: Point,
    },
    PointerUp {
        pointer_id: u32,
        position: Point,
    },
    Cancel {
        reason: CancelReason,
    },
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Armed {
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
        current: Point,
    },
    Dragging {
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
        current: Point,
    },
    Resizing {
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
        current: Point,
    },
}

impl InteractionState {
    /// Target of a non-idle state.
    #[must_use]
    pub const fn target(&self) -> Option<InteractionTarget> {
        match *self {
            Self::Idle => None,
            Self::Armed { target, .. }
            | Self::Dragging { target, .. }
            | Self::Resizing { target, .. } => Some(target),
        }
    }

    /// Pointer that owns a non-idle state.
    #[must_use]
    pub const fn pointer_id(&self) -> Option<u32> {
        match *self {
            Self::Idle => None,
            Self::Armed { pointer_id, .. }
            | Self::Dragging { pointer_id, .. }
            | Self::Resizing { pointer_id, .. } => Some(pointer_id),
        }
    }

    /// Mode of a started (dragging or resizing) state.
    #[must_use]
    pub const fn active_mode(&self) -> Option<InteractionMode> {
        match self {
            Self::Dragging { .. } => Some(InteractionMode::Drag),
            Self::Resizing { .. } => Some(InteractionMode::Resize),
            Self::Idle | Self::Armed { .. } => None,
        }
    }

    fn started(
        mode: InteractionMode,
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
        current: Point,
    ) -> Self {
        match mode {
            InteractionMode::Drag => Self::Dragging {
                target,
                pointer_id,
                origin,
                current,
            },
            InteractionMode::Resize => Self::Resizing {
                target,
                pointer_id,
                origin,
                current,
            },
        }
    }
}

/// Explicit diagnostics for input that is safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionNoopReason {
    IdleWithoutActiveInteraction,
    InteractionAlreadyInProgress,
    PointerMismatch,
    ThresholdNotReached,
    Locked,
    Unchanged,
}

/// Effect emitted by one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    Armed {
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
    },
    Started {
        mode: InteractionMode,
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
        current: Point,
        total_dx: f64,
        total_dy: f64,
    },
    Updated {
        mode: InteractionMode,
        target: InteractionTarget,
        pointer_id: u32,
        previous: Point,
        current: Point,
        total_dx: f64,
        total_dy: f64,
    },
    Committed {
        mode: InteractionMode,
        target: InteractionTarget,
        pointer_id: u32,
        origin: Point,
        end: Point,
        total_dx: f64,
        total_dy: f64,
    },
    /// Released before the threshold: a click.
    Selected {
        target: InteractionTarget,
        pointer_id: u32,
    },
    Canceled {
        target: Option<InteractionTarget>,
        pointer_id: Option<u32>,
        reason: CancelReason,
    },
    Noop {
        reason: InteractionNoopReason,
    },
}

/// One machine step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionTransition {
    pub transition_id: u64,
    pub from: InteractionState,
    pub to: InteractionState,
    pub effect: InteractionEffect,
}

/// Machine configuration errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionError {
    InvalidDragThreshold { threshold: f64 },
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDragThreshold { threshold } => {
                write!(f, "drag threshold must be finite and >= 0 (got {threshold})")
            }
        }
    }
}

impl std::error::Error for InteractionError {}

/// Runtime lifecycle machine for block drag/resize and section resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMachine {
    state: InteractionState,
    drag_threshold: f64,
    transition_counter: u64,
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self {
            state: InteractionState::Idle,
            drag_threshold: DEFAULT_DRAG_THRESHOLD_PX,
            transition_counter: 0,
        }
    }
}

impl InteractionMachine {
    /// Construct a machine with an explicit drag threshold in pixels.
    pub fn new(drag_threshold: f64) -> Result<Self, InteractionError> {
        validate_threshold(drag_threshold)?;
        Ok(Self {
            drag_threshold,
            ..Self::default()
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Configured drag-start threshold.
    #[must_use]
    pub const fn drag_threshold(&self) -> f64 {
        self.drag_threshold
    }

    /// Change the threshold; takes effect on the next armed move.
    pub fn set_drag_threshold(&mut self, drag_threshold: f64) -> Result<(), InteractionError> {
        validate_threshold(drag_threshold)?;
        self.drag_threshold = drag_threshold;
        Ok(())
    }

    /// Whether the machine is armed, dragging, or resizing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    /// Reset to idle, reporting a programmatic cancel if anything was active.
    pub fn force_cancel(&mut self) -> Option<InteractionTransition> {
        if !self.is_active() {
            return None;
        }
        Some(self.apply(InteractionInput::Cancel {
            reason: CancelReason::Programmatic,
        }))
    }

    /// Apply one input and report the resulting transition.
    pub fn apply(&mut self, input: InteractionInput) -> InteractionTransition {
        let from = self.state;
        let effect = match (from, input) {
            (
                InteractionState::Idle,
                InteractionInput::PointerDown {
                    locked: true, ..
                },
            ) => InteractionEffect::Noop {
                reason: InteractionNoopReason::Locked,
            },
            (
                InteractionState::Idle,
                InteractionInput::PointerDown {
                    target,
                    pointer_id,
                    position,
                    locked: false,
                },
            ) => {
                self.state = InteractionState::Armed {
                    target,
                    pointer_id,
                    origin: position,
                    current: position,
                };
                InteractionEffect::Armed {
                    target,
                    pointer_id,
                    origin: position,
                }
            }
            (InteractionState::Idle, InteractionInput::Cancel { .. })
            | (
                InteractionState::Idle,
                InteractionInput::PointerMove { .. } | InteractionInput::PointerUp { .. },
            ) => InteractionEffect::Noop {
                reason: InteractionNoopReason::IdleWithoutActiveInteraction,
            },
            (_, InteractionInput::PointerDown { .. }) => InteractionEffect::Noop {
                reason: InteractionNoopReason::InteractionAlreadyInProgress,
            },
            (active, InteractionInput::Cancel { reason }) => {
                self.state = InteractionState::Idle;
                InteractionEffect::Canceled {
                    target: active.target(),
                    pointer_id: active.pointer_id(),
                    reason,
                }
            }
            (
                InteractionState::Armed {
                    target,
                    pointer_id,
                    origin,
                    ..
                },
                InteractionInput::PointerMove {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    InteractionEffect::Noop {
                        reason: InteractionNoopReason::PointerMismatch,
                    }
                } else if crossed_drag_threshold(origin, position, self.drag_threshold) {
                    let mode = target.mode();
                    self.state =
                        InteractionState::started(mode, target, pointer_id, origin, position);
                    let (total_dx, total_dy) = position.delta_from(origin);
                    InteractionEffect::Started {
                        mode,
                        target,
                        pointer_id,
                        origin,
                        current: position,
                        total_dx,
                        total_dy,
                    }
                } else {
                    self.state = InteractionState::Armed {
                        target,
                        pointer_id,
                        origin,
                        current: position,
                    };
                    InteractionEffect::Noop {
                        reason: InteractionNoopReason::ThresholdNotReached,
                    }
                }
            }
            (
                InteractionState::Armed {
                    target, pointer_id, ..
                },
                InteractionInput::PointerUp {
                    pointer_id: incoming,
                    ..
                },
            ) => {
                if incoming != pointer_id {
                    InteractionEffect::Noop {
                        reason: InteractionNoopReason::PointerMismatch,
                    }
                } else {
                    self.state = InteractionState::Idle;
                    InteractionEffect::Selected { target, pointer_id }
                }
            }
            (
                InteractionState::Dragging {
                    target,
                    pointer_id,
                    origin,
                    current,
                }
                | InteractionState::Resizing {
                    target,
                    pointer_id,
                    origin,
                    current,
                },
                InteractionInput::PointerMove {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    InteractionEffect::Noop {
                        reason: InteractionNoopReason::PointerMismatch,
                    }
                } else if position == current {
                    InteractionEffect::Noop {
                        reason: InteractionNoopReason::Unchanged,
                    }
                } else {
                    let mode = target.mode();
                    self.state =
                        InteractionState::started(mode, target, pointer_id, origin, position);
                    let (total_dx, total_dy) = position.delta_from(origin);
                    InteractionEffect::Updated {
                        mode,
                        target,
                        pointer_id,
                        previous: current,
                        current: position,
                        total_dx,
                        total_dy,
                    }
                }
            }
            (
                InteractionState::Dragging {
                    target,
                    pointer_id,
                    origin,
                    ..
                }
                | InteractionState::Resizing {
                    target,
                    pointer_id,
                    origin,
                    ..
                },
                InteractionInput::PointerUp {
                    pointer_id: incoming,
                    position,
                },
            ) => {
                if incoming != pointer_id {
                    InteractionEffect::Noop {
                        reason: InteractionNoopReason::PointerMismatch,
                    }
                } else {
                    self.state = InteractionState::Idle;
                    let (total_dx, total_dy) = position.delta_from(origin);
                    InteractionEffect::Committed {
                        mode: target.mode(),
                        target,
                        pointer_id,
                        origin,
                        end: position,
                        total_dx,
                        total_dy,
                    }
                }
            }
        };

        self.transition_counter = self.transition_counter.saturating_add(1);
        InteractionTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        }
    }
}

fn validate_threshold(threshold: f64) -> Result<(), InteractionError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(InteractionError::InvalidDragThreshold { threshold })
    }
}

/// Crossed when either axis moved strictly more than `threshold`.
fn crossed_drag_threshold(origin: Point, current: Point, threshold: f64) -> bool {
    let (dx, dy) = current.delta_from(origin);
    dx.abs() > threshold || dy.abs() > threshold
}
