#![forbid(unsafe_code)]

//! Percent <-> pixel conversion against a section box.
//!
//! Block geometry is persisted as percentages of the owning section's box
//! and converted to pixels for hit testing, snapping, and rendering.
//!
//! ```text
//! x% = pixel_x / section_width  * 100
//! y% = pixel_y / section_height * 100
//! ```
//!
//! Pixel positions here are *section-local* (relative to the section's
//! top-left corner); callers holding canvas coordinates subtract the
//! section origin first (see [`Rect::relative_to`]).
//!
//! # Failure Modes
//!
//! - A degenerate axis (zero, negative, or non-finite extent; section not yet
//!   laid out) converts to `0` for positions and `auto` for sizes on that
//!   axis instead of producing `NaN`/`Infinity`.
//! - Non-finite inputs convert to `0`.
//! - `auto` lengths always pass through unconverted.

use vellum_core::geometry::{Point, Rect, Size};

use crate::document::{Length, PercentPosition, PercentSize};

/// A block size in pixels; `auto` dimensions stay intrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelSize {
    pub width: Length,
    pub height: Length,
}

impl PixelSize {
    #[must_use]
    pub const fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn fixed(width: f64, height: f64) -> Self {
        Self::new(Length::Value(width), Length::Value(height))
    }

    /// Concrete size, substituting `intrinsic` for `auto` dimensions.
    #[must_use]
    pub fn or_intrinsic(self, intrinsic: Size) -> Size {
        Size::new(
            self.width.value().unwrap_or(intrinsic.width),
            self.height.value().unwrap_or(intrinsic.height),
        )
    }
}

fn usable(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn to_px(percent: f64, extent: f64) -> f64 {
    if usable(extent) {
        finite_or_zero(percent) / 100.0 * extent
    } else {
        0.0
    }
}

fn to_pct(pixels: f64, extent: f64) -> f64 {
    if usable(extent) {
        finite_or_zero(pixels) / extent * 100.0
    } else {
        0.0
    }
}

fn length_to_px(length: Length, extent: f64) -> Length {
    match length {
        Length::Auto => Length::Auto,
        Length::Value(_) if !usable(extent) => Length::Auto,
        Length::Value(percent) => Length::Value(to_px(percent, extent)),
    }
}

fn length_to_pct(length: Length, extent: f64) -> Length {
    match length {
        Length::Auto => Length::Auto,
        Length::Value(_) if !usable(extent) => Length::Auto,
        Length::Value(pixels) => Length::Value(to_pct(pixels, extent)),
    }
}

/// Convert a percent position to section-local pixels.
#[must_use]
pub fn position_to_pixels(position: PercentPosition, section: Size) -> Point {
    Point::new(
        to_px(position.x, section.width),
        to_px(position.y, section.height),
    )
}

/// Convert a section-local pixel position to percentages.
#[must_use]
pub fn position_to_percent(position: Point, section: Size) -> PercentPosition {
    PercentPosition::new(
        to_pct(position.x, section.width),
        to_pct(position.y, section.height),
    )
}

/// Convert percent geometry to section-local pixel geometry.
#[must_use]
pub fn to_pixels(
    position: PercentPosition,
    size: PercentSize,
    section: Size,
) -> (Point, PixelSize) {
    (
        position_to_pixels(position, section),
        PixelSize::new(
            length_to_px(size.width, section.width),
            length_to_px(size.height, section.height),
        ),
    )
}

/// Convert section-local pixel geometry to percent geometry.
#[must_use]
pub fn to_percent(
    position: Point,
    size: PixelSize,
    section: Size,
) -> (PercentPosition, PercentSize) {
    (
        position_to_percent(position, section),
        PercentSize::new(
            length_to_pct(size.width, section.width),
            length_to_pct(size.height, section.height),
        ),
    )
}

/// Canvas-space box of a block inside a section box.
///
/// `intrinsic` supplies the measured content size for `auto` dimensions.
#[must_use]
pub fn block_rect(
    position: PercentPosition,
    size: PercentSize,
    section_box: &Rect,
    intrinsic: Size,
) -> Rect {
    let (origin, pixel_size) = to_pixels(position, size, section_box.size());
    Rect::from_origin_size(
        origin.offset(section_box.x, section_box.y),
        pixel_size.or_intrinsic(intrinsic),
    )
}
