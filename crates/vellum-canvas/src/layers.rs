#![forbid(unsafe_code)]

//! Layers panel model.
//!
//! The panel lists a section's blocks top-most first. Rows are ordered by
//! descending `z_index`; among equal z the later list entry comes first
//! because it paints on top.
//!
//! Reordering renumbers the whole section: after a move, the row order is
//! written back as contiguous z values, `n-1` for the top row down to `0`.

use serde::{Deserialize, Serialize};

use crate::content::BlockType;
use crate::document::{Block, Viewport};
use crate::id::BlockId;
use crate::resolve::is_visible;

/// Longest text snippet shown in a row label, in characters.
pub const LABEL_SNIPPET_CHARS: usize = 32;

/// One row of the layers panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub block_id: BlockId,
    pub block_type: BlockType,
    pub label: String,
    pub z_index: i32,
    /// Visibility at the viewport the panel was built for.
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
}

/// Indices into `blocks`, top-most first.
#[must_use]
pub fn panel_order(blocks: &[Block]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.sort_by(|&a, &b| {
        blocks[b]
            .z_index
            .cmp(&blocks[a].z_index)
            .then_with(|| b.cmp(&a))
    });
    order
}

/// Panel rows for a section at `viewport`.
#[must_use]
pub fn layer_entries(
    blocks: &[Block],
    viewport: Viewport,
    selected: Option<BlockId>,
) -> Vec<LayerEntry> {
    panel_order(blocks)
        .into_iter()
        .map(|index| {
            let block = &blocks[index];
            LayerEntry {
                block_id: block.id,
                block_type: block.block_type(),
                label: layer_label(block),
                z_index: block.z_index,
                visible: is_visible(block, viewport),
                locked: block.locked,
                selected: selected == Some(block.id),
            }
        })
        .collect()
}

/// Row label: the type name, plus a text snippet when the block has text.
#[must_use]
pub fn layer_label(block: &Block) -> String {
    let label = block.block_type().label();
    match block.content.text().map(snippet) {
        Some(snippet) if !snippet.is_empty() => format!("{label}: {snippet}"),
        _ => label.to_string(),
    }
}

/// Plain-text preview of rich text: tags dropped, whitespace collapsed,
/// truncated to [`LABEL_SNIPPET_CHARS`].
fn snippet(html: &str) -> String {
    let mut plain = String::with_capacity(html.len().min(LABEL_SNIPPET_CHARS * 4));
    let mut in_tag = false;
    let mut pending_space = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                pending_space = true;
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_whitespace() => pending_space = true,
            c => {
                if pending_space && !plain.is_empty() {
                    plain.push(' ');
                }
                pending_space = false;
                plain.push(c);
            }
        }
    }

    if plain.chars().count() <= LABEL_SNIPPET_CHARS {
        return plain;
    }
    let mut truncated: String = plain.chars().take(LABEL_SNIPPET_CHARS).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push('…');
    truncated
}

/// Z assignments after moving the row at panel index `from` to `to`.
///
/// Returns `None` when either index is out of range. Every block in the
/// section receives a new value, top row first.
#[must_use]
pub fn reorder_assignments(blocks: &[Block], from: usize, to: usize) -> Option<Vec<(BlockId, i32)>> {
    let mut order = panel_order(blocks);
    if from >= order.len() || to >= order.len() {
        return None;
    }
    let moved = order.remove(from);
    order.insert(to, moved);

    let top = i32::try_from(order.len()).ok()?.saturating_sub(1);
    Some(
        order
            .into_iter()
            .zip((0..=top).rev())
            .map(|(index, z_index)| (blocks[index].id, z_index))
            .collect(),
    )
}
