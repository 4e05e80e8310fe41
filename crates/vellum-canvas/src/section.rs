#![forbid(unsafe_code)]

//! Section container behavior: background stacking, the height handle, and
//! full-bleed embedded documents.
//!
//! # Invariants
//!
//! 1. Background layers paint bottom to top: color, image, overlay. Blocks
//!    paint above all of them.
//! 2. Candidate heights are never below the configured minimum.
//! 3. A section that holds a full-bleed embedded document exposes no resize
//!    handle; its height tracks reported content height instead.

use serde::{Deserialize, Serialize};
use vellum_core::geometry::{Point, Rect};

use crate::document::{
    BackgroundRepeat, BackgroundSize, Block, Section, SectionBackground, Viewport,
};

/// Half the thickness of the bottom-edge resize hit zone.
pub const RESIZE_HANDLE_HIT_PX: f64 = 6.0;

/// One background paint layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum BackgroundLayer {
    Color {
        color: String,
        opacity: f64,
    },
    Image {
        url: String,
        repeat: BackgroundRepeat,
        position: String,
        size: BackgroundSize,
    },
    Overlay {
        color: String,
        opacity: f64,
    },
}

/// Background layers for a section, bottom first.
///
/// Transparent color and overlay layers are omitted.
#[must_use]
pub fn background_layers(background: &SectionBackground) -> Vec<BackgroundLayer> {
    let mut layers = Vec::with_capacity(3);
    if let Some(color) = &background.color
        && background.opacity > 0.0
    {
        layers.push(BackgroundLayer::Color {
            color: color.clone(),
            opacity: background.opacity.min(1.0),
        });
    }
    if let Some(image) = &background.image
        && !image.url.is_empty()
    {
        layers.push(BackgroundLayer::Image {
            url: image.url.clone(),
            repeat: image.repeat,
            position: image.position.clone(),
            size: image.size,
        });
    }
    if let Some(color) = &background.overlay_color
        && background.overlay_opacity > 0.0
    {
        layers.push(BackgroundLayer::Overlay {
            color: color.clone(),
            opacity: background.overlay_opacity.min(1.0),
        });
    }
    layers
}

/// Whether any block in the list is a full-bleed embedded document.
#[must_use]
pub fn has_full_bleed(blocks: &[Block]) -> bool {
    blocks.iter().any(|block| block.content.is_full_bleed())
}

/// Whether the section's bottom edge can be dragged.
#[must_use]
pub fn is_resizable(blocks: &[Block]) -> bool {
    !has_full_bleed(blocks)
}

/// Hit zone of the bottom-edge handle for a section box.
#[must_use]
pub fn resize_handle_rect(section_box: &Rect) -> Rect {
    Rect::new(
        section_box.x,
        section_box.bottom() - RESIZE_HANDLE_HIT_PX,
        section_box.width,
        RESIZE_HANDLE_HIT_PX * 2.0,
    )
}

/// Whether `point` lands on the section's resize handle.
#[must_use]
pub fn hits_resize_handle(section_box: &Rect, point: Point) -> bool {
    !section_box.is_empty() && resize_handle_rect(section_box).contains(point)
}

/// Candidate height for a vertical pointer delta, clamped to `min_height`.
#[must_use]
pub fn candidate_height(start_height: f64, delta_y: f64, min_height: f64) -> f64 {
    let start = if start_height.is_finite() { start_height } else { min_height };
    let delta = if delta_y.is_finite() { delta_y } else { 0.0 };
    (start + delta).max(min_height)
}

/// Store a height for `viewport`: base on desktop, override elsewhere.
pub fn set_height(section: &mut Section, height: f64, viewport: Viewport) {
    if viewport.is_base() {
        section.height = height;
    } else {
        section.heights.insert(viewport, height);
    }
}
