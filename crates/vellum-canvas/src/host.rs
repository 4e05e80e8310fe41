//! Host callbacks.
//!
//! The editor never persists anything itself. Every committed mutation is
//! reported to an [`EditorHost`] after it has been applied to the in-memory
//! document, carrying the same whole-field [`BlockPatch`] that was applied.

use serde::{Deserialize, Serialize};

use crate::document::{Block, PercentPosition, Viewport};
use crate::id::{BlockId, SectionId};
use crate::patch::BlockPatch;

/// Receiver for committed document changes.
pub trait EditorHost {
    /// A block's fields were replaced for `viewport`.
    fn on_block_change(&mut self, block_id: BlockId, patch: &BlockPatch, viewport: Viewport);

    /// A block was removed.
    fn on_block_delete(&mut self, block_id: BlockId);

    /// A section height changed. `is_final` is `false` for live previews.
    fn on_section_resize(
        &mut self,
        section_id: SectionId,
        height: f64,
        is_final: bool,
        viewport: Viewport,
    );

    /// A block moved into another section at `position`.
    fn on_block_move(&mut self, block_id: BlockId, section_id: SectionId, position: PercentPosition);

    /// A block was inserted or duplicated.
    fn on_block_create(&mut self, section_id: SectionId, block: &Block) {
        let _ = (section_id, block);
    }
}

/// Discards every notification.
impl EditorHost for () {
    fn on_block_change(&mut self, _: BlockId, _: &BlockPatch, _: Viewport) {}
    fn on_block_delete(&mut self, _: BlockId) {}
    fn on_section_resize(&mut self, _: SectionId, _: f64, _: bool, _: Viewport) {}
    fn on_block_move(&mut self, _: BlockId, _: SectionId, _: PercentPosition) {}
}

/// One recorded host notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    BlockChange {
        block_id: BlockId,
        patch: BlockPatch,
        viewport: Viewport,
    },
    BlockDelete {
        block_id: BlockId,
    },
    SectionResize {
        section_id: SectionId,
        height: f64,
        is_final: bool,
        viewport: Viewport,
    },
    BlockMove {
        block_id: BlockId,
        section_id: SectionId,
        position: PercentPosition,
    },
    BlockCreate {
        section_id: SectionId,
        block: Block,
    },
}

/// Host that records calls in order; useful for tests and undo journals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostLog {
    calls: Vec<HostCall>,
}

impl HostLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn drain(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Final section heights only, skipping live previews.
    pub fn final_section_heights(&self) -> impl Iterator<Item = (SectionId, f64)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            HostCall::SectionResize {
                section_id,
                height,
                is_final: true,
                ..
            } => Some((*section_id, *height)),
            _ => None,
        })
    }
}

impl EditorHost for HostLog {
    fn on_block_change(&mut self, block_id: BlockId, patch: &BlockPatch, viewport: Viewport) {
        self.calls.push(HostCall::BlockChange {
            block_id,
            patch: patch.clone(),
            viewport,
        });
    }

    fn on_block_delete(&mut self, block_id: BlockId) {
        self.calls.push(HostCall::BlockDelete { block_id });
    }

    fn on_section_resize(
        &mut self,
        section_id: SectionId,
        height: f64,
        is_final: bool,
        viewport: Viewport,
    ) {
        self.calls.push(HostCall::SectionResize {
            section_id,
            height,
            is_final,
            viewport,
        });
    }

    fn on_block_move(&mut self, block_id: BlockId, section_id: SectionId, position: PercentPosition) {
        self.calls.push(HostCall::BlockMove {
            block_id,
            section_id,
            position,
        });
    }

    fn on_block_create(&mut self, section_id: SectionId, block: &Block) {
        self.calls.push(HostCall::BlockCreate {
            section_id,
            block: block.clone(),
        });
    }
}

impl<H: EditorHost + ?Sized> EditorHost for &mut H {
    fn on_block_change(&mut self, block_id: BlockId, patch: &BlockPatch, viewport: Viewport) {
        (**self).on_block_change(block_id, patch, viewport);
    }

    fn on_block_delete(&mut self, block_id: BlockId) {
        (**self).on_block_delete(block_id);
    }

    fn on_section_resize(
        &mut self,
        section_id: SectionId,
        height: f64,
        is_final: bool,
        viewport: Viewport,
    ) {
        (**self).on_section_resize(section_id, height, is_final, viewport);
    }

    fn on_block_move(&mut self, block_id: BlockId, section_id: SectionId, position: PercentPosition) {
        (**self).on_block_move(block_id, section_id, position);
    }

    fn on_block_create(&mut self, section_id: SectionId, block: &Block) {
        (**self).on_block_create(section_id, block);
    }
}
