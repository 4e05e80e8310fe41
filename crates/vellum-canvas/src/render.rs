#![forbid(unsafe_code)]

//! Render planning.
//!
//! The engine does not draw. A host registers one renderer per
//! [`BlockType`]; [`RendererRegistry::render_section`] resolves every block
//! for the active viewport, converts it to canvas pixels, and hands the
//! host a [`RenderBlock`] view. The produced elements come back in paint
//! order (bottom first).
//!
//! # Invariants
//!
//! 1. Paint order is ascending `z_index`; equal z keeps document list order,
//!    so the later entry paints on top.
//! 2. Blocks hidden at the viewport produce no element.
//! 3. A block type with no renderer is skipped with a `warn` event; the rest
//!    of the section still renders.

use std::borrow::Cow;
use std::fmt;

use rustc_hash::FxHashMap;
use vellum_core::geometry::{Rect, Size};

use crate::content::{BlockContent, BlockType};
use crate::coords::block_rect;
use crate::document::{Animation, Block, PercentPosition, PercentSize, Styles, Viewport};
use crate::id::BlockId;
use crate::resolve::{is_visible, resolve};

/// Resolved, pixel-placed view of one block handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBlock<'a> {
    pub block_id: BlockId,
    pub content: &'a BlockContent,
    pub styles: Cow<'a, Styles>,
    pub position: PercentPosition,
    pub size: PercentSize,
    /// Canvas-space box; `auto` dimensions use the measured intrinsic size.
    pub rect: Rect,
    pub z_index: i32,
    pub locked: bool,
    pub animation: Option<Animation>,
}

impl RenderBlock<'_> {
    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.content.block_type()
    }
}

/// A rendered element with its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement<E> {
    pub block_id: BlockId,
    pub rect: Rect,
    pub z_index: i32,
    pub element: E,
}

type RenderFn<E> = Box<dyn Fn(&RenderBlock<'_>) -> E + Send + Sync>;

/// Block-type to renderer table.
pub struct RendererRegistry<E> {
    renderers: FxHashMap<BlockType, RenderFn<E>>,
}

impl<E> Default for RendererRegistry<E> {
    fn default() -> Self {
        Self {
            renderers: FxHashMap::default(),
        }
    }
}

impl<E> fmt::Debug for RendererRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.renderers.keys().copied().collect();
        types.sort();
        f.debug_struct("RendererRegistry")
            .field("types", &types)
            .finish()
    }
}

impl<E> RendererRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the renderer for `block_type`.
    pub fn register<F>(&mut self, block_type: BlockType, render: F) -> &mut Self
    where
        F: Fn(&RenderBlock<'_>) -> E + Send + Sync + 'static,
    {
        self.renderers.insert(block_type, Box::new(render));
        self
    }

    /// Builder form of [`Self::register`].
    #[must_use]
    pub fn with<F>(mut self, block_type: BlockType, render: F) -> Self
    where
        F: Fn(&RenderBlock<'_>) -> E + Send + Sync + 'static,
    {
        self.register(block_type, render);
        self
    }

    #[must_use]
    pub fn contains(&self, block_type: BlockType) -> bool {
        self.renderers.contains_key(&block_type)
    }

    /// Render one block, `None` when no renderer is registered.
    #[must_use]
    pub fn render(&self, block: &RenderBlock<'_>) -> Option<E> {
        self.renderers
            .get(&block.block_type())
            .map(|render| render(block))
    }

    /// Render a section's blocks in paint order.
    ///
    /// `intrinsic` reports the measured size of a block for `auto`
    /// dimensions; return [`Size::ZERO`] when unknown.
    pub fn render_section(
        &self,
        blocks: &[Block],
        viewport: Viewport,
        section_box: &Rect,
        intrinsic: impl Fn(BlockId) -> Size,
    ) -> Vec<PlacedElement<E>> {
        let mut placed = Vec::with_capacity(blocks.len());
        for block in paint_order(blocks, viewport) {
            let geometry = resolve(block, viewport);
            let rect = block_rect(
                geometry.position,
                geometry.size,
                section_box,
                intrinsic(block.id),
            );
            let view = RenderBlock {
                block_id: block.id,
                content: &block.content,
                styles: geometry.styles,
                position: geometry.position,
                size: geometry.size,
                rect,
                z_index: geometry.z_index,
                locked: block.locked,
                animation: block.animation,
            };
            match self.render(&view) {
                Some(element) => placed.push(PlacedElement {
                    block_id: block.id,
                    rect,
                    z_index: view.z_index,
                    element,
                }),
                None => tracing::warn!(
                    target: "vellum.canvas",
                    block_id = block.id.get(),
                    block_type = %block.block_type(),
                    "no renderer registered for block type"
                ),
            }
        }
        placed
    }
}

/// Visible blocks at `viewport`, bottom first.
#[must_use]
pub fn paint_order(blocks: &[Block], viewport: Viewport) -> Vec<&Block> {
    let mut visible: Vec<&Block> = blocks
        .iter()
        .filter(|block| is_visible(block, viewport))
        .collect();
    // Stable: equal z keeps list order.
    visible.sort_by_key(|block| block.z_index);
    visible
}
