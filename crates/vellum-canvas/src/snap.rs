#![forbid(unsafe_code)]

//! Alignment snapping for dragged blocks.
//!
//! [`compute_snap`] compares the start, center, and end of a candidate box
//! on each axis against:
//!
//! - the section's center line, and
//! - the start, center, and end lines of every visible sibling. This covers
//!   equal-edge alignment (left-to-left), abutting (left-to-right), and
//!   midline alignment.
//!
//! Per axis, the closest line within the threshold wins and the candidate is
//! translated by that distance. Axes snap independently.
//!
//! # Invariants
//!
//! 1. A candidate whose anchor already lies on a target line comes back
//!    unchanged (distance 0 always wins), so repeated snapping never drifts.
//! 2. Ties resolve to the earliest target: section center first, then
//!    siblings in slice order, then start/center/end.
//! 3. Invisible siblings never produce targets.
//! 4. Size is never changed; only the origin moves.
//!
//! # Failure Modes
//!
//! A negative or non-finite threshold disables snapping. The scan is linear
//! in the number of siblings; sections hold tens of blocks.

use serde::{Deserialize, Serialize};
use vellum_core::geometry::{Axis, Rect};

/// Default snap window in pixels.
pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 8.0;

/// Lines closer than this are considered coincident when emitting guides.
const GUIDE_EPSILON: f64 = 1e-6;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideAxis {
    /// A vertical line at `x = offset` (horizontal alignment).
    Vertical,
    /// A horizontal line at `y = offset` (vertical alignment).
    Horizontal,
}

impl GuideAxis {
    const fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::Vertical,
            Axis::Vertical => Self::Horizontal,
        }
    }
}

/// A transient alignment line shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub axis: GuideAxis,
    /// Canvas-space coordinate of the line.
    pub offset: f64,
}

/// Which part of the candidate box matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapAnchor {
    Start,
    Center,
    End,
}

const ANCHORS: [SnapAnchor; 3] = [SnapAnchor::Start, SnapAnchor::Center, SnapAnchor::End];

/// Where a target line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SnapSource {
    SectionCenter,
    Sibling { index: usize, anchor: SnapAnchor },
}

/// The winning match on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapMatch {
    pub anchor: SnapAnchor,
    pub source: SnapSource,
    /// Target line coordinate.
    pub target: f64,
    /// Translation applied to the candidate along this axis.
    pub delta: f64,
}

/// A sibling box the candidate may align with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSibling {
    pub rect: Rect,
    pub visible: bool,
}

impl SnapSibling {
    #[must_use]
    pub const fn visible(rect: Rect) -> Self {
        Self {
            rect,
            visible: true,
        }
    }
}

/// Output of one snap evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Candidate box after snapping.
    pub rect: Rect,
    pub x: Option<SnapMatch>,
    pub y: Option<SnapMatch>,
    pub guides: Vec<GuideLine>,
}

impl SnapResult {
    fn unsnapped(rect: Rect) -> Self {
        Self {
            rect,
            x: None,
            y: None,
            guides: Vec::new(),
        }
    }

    #[must_use]
    pub fn snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

fn targets<'a>(
    axis: Axis,
    siblings: &'a [SnapSibling],
    section: &Rect,
) -> impl Iterator<Item = (SnapSource, f64)> + 'a {
    let center = match axis {
        Axis::Horizontal => section.center_x(),
        Axis::Vertical => section.center_y(),
    };
    std::iter::once((SnapSource::SectionCenter, center)).chain(
        siblings
            .iter()
            .enumerate()
            .filter(|(_, sibling)| sibling.visible)
            .flat_map(move |(index, sibling)| {
                ANCHORS
                    .iter()
                    .zip(sibling.rect.anchors(axis))
                    .map(move |(&anchor, line)| (SnapSource::Sibling { index, anchor }, line))
            }),
    )
}

fn best_match(
    axis: Axis,
    candidate: &Rect,
    siblings: &[SnapSibling],
    section: &Rect,
    threshold: f64,
) -> Option<SnapMatch> {
    let anchors = candidate.anchors(axis);
    let mut best: Option<SnapMatch> = None;
    for (source, target) in targets(axis, siblings, section) {
        if !target.is_finite() {
            continue;
        }
        for (&anchor, value) in ANCHORS.iter().zip(anchors) {
            let delta = target - value;
            let distance = delta.abs();
            if distance > threshold {
                continue;
            }
            match best {
                Some(current) if current.delta.abs() <= distance => {}
                _ => {
                    best = Some(SnapMatch {
                        anchor,
                        source,
                        target,
                        delta,
                    });
                }
            }
        }
    }
    best
}

fn push_guides(
    axis: Axis,
    rect: &Rect,
    siblings: &[SnapSibling],
    section: &Rect,
    guides: &mut Vec<GuideLine>,
) {
    let anchors = rect.anchors(axis);
    let guide_axis = GuideAxis::for_axis(axis);
    for (_, line) in targets(axis, siblings, section) {
        let coincides = anchors
            .iter()
            .any(|value| (value - line).abs() <= GUIDE_EPSILON);
        let already = guides
            .iter()
            .any(|g| g.axis == guide_axis && (g.offset - line).abs() <= GUIDE_EPSILON);
        if coincides && !already {
            guides.push(GuideLine {
                axis: guide_axis,
                offset: line,
            });
        }
    }
}

/// Snap `candidate` against the section center and visible siblings.
///
/// All rectangles are in the same (canvas) coordinate space.
#[must_use]
pub fn compute_snap(
    candidate: Rect,
    siblings: &[SnapSibling],
    section: &Rect,
    threshold: f64,
) -> SnapResult {
    if !threshold.is_finite() || threshold < 0.0 {
        return SnapResult::unsnapped(candidate);
    }

    let x = best_match(Axis::Horizontal, &candidate, siblings, section, threshold);
    let y = best_match(Axis::Vertical, &candidate, siblings, section, threshold);

    let rect = candidate.translate(
        x.map_or(0.0, |m| m.delta),
        y.map_or(0.0, |m| m.delta),
    );

    let mut guides = Vec::new();
    if x.is_some() {
        push_guides(Axis::Horizontal, &rect, siblings, section, &mut guides);
    }
    if y.is_some() {
        push_guides(Axis::Vertical, &rect, siblings, section, &mut guides);
    }

    SnapResult { rect, x, y, guides }
}
