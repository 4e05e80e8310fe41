#![forbid(unsafe_code)]

//! Viewport geometry resolution.
//!
//! [`resolve`] merges a block's base (desktop) geometry with the override
//! stored for the requested viewport. Only keys present in the override
//! replace base values; everything else inherits from desktop.
//!
//! # Invariants
//!
//! 1. With no override for `viewport`, `resolve(b, viewport) == resolve(b, Desktop)`.
//! 2. An override carrying only `position` never changes the resolved
//!    `size`, `visible`, or `styles`.
//! 3. Override `styles` merge key-by-key over the base dictionary.
//! 4. `resolve()` never fails.
//!
//! # Failure Modes
//!
//! None. Desktop overrides stored in `layouts` are ignored: desktop reads
//! the base fields only.

use std::borrow::Cow;

use crate::document::{Block, PercentPosition, PercentSize, Section, Styles, Viewport};

/// Effective geometry of a block for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGeometry<'a> {
    pub position: PercentPosition,
    pub size: PercentSize,
    pub visible: bool,
    /// Borrowed when no override touches styles.
    pub styles: Cow<'a, Styles>,
    pub z_index: i32,
}

/// Resolve a block's effective geometry for `viewport`.
#[must_use]
pub fn resolve(block: &Block, viewport: Viewport) -> ResolvedGeometry<'_> {
    let mut resolved = ResolvedGeometry {
        position: block.position,
        size: block.size,
        visible: block.visible,
        styles: Cow::Borrowed(&block.styles),
        z_index: block.z_index,
    };

    if viewport.is_base() {
        return resolved;
    }
    let Some(layout) = block.layouts.get(&viewport) else {
        return resolved;
    };

    if let Some(position) = layout.position {
        resolved.position = position;
    }
    if let Some(size) = layout.size {
        resolved.size = size;
    }
    if let Some(visible) = layout.visible {
        resolved.visible = visible;
    }
    if let Some(styles) = layout.styles.as_ref().filter(|styles| !styles.is_empty()) {
        let merged = resolved.styles.to_mut();
        for (key, value) in styles {
            merged.insert(key.clone(), value.clone());
        }
    }
    resolved
}

/// Whether a block is shown at `viewport`.
#[must_use]
pub fn is_visible(block: &Block, viewport: Viewport) -> bool {
    if viewport.is_base() {
        return block.visible;
    }
    block
        .layouts
        .get(&viewport)
        .and_then(|layout| layout.visible)
        .unwrap_or(block.visible)
}

/// Effective section height for `viewport`, in pixels.
#[must_use]
pub fn resolve_section_height(section: &Section, viewport: Viewport) -> f64 {
    if viewport.is_base() {
        return section.height;
    }
    section
        .heights
        .get(&viewport)
        .copied()
        .unwrap_or(section.height)
}
