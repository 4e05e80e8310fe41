#![forbid(unsafe_code)]

//! The canvas editing session.
//!
//! [`CanvasEditor`] owns the [`Document`] and is the only way to mutate it.
//! It hit-tests pointer input against measured section boxes, drives the
//! [`InteractionMachine`], keeps transient previews (snapped drag box,
//! resize box, candidate section height), and commits the result through
//! the viewport-aware [`BlockPatch`] path before notifying the
//! [`EditorHost`].
//!
//! # Invariants
//!
//! 1. Previews never touch the document; only commits do.
//! 2. Every committed mutation is applied in memory first, then reported to
//!    the host exactly once.
//! 3. A press released before the drag threshold selects and never mutates.
//! 4. The selection always names a block that exists, or nothing.
//!
//! # Failure Modes
//!
//! - A section without a measured box cannot be hit; its blocks are
//!   unreachable by pointer until [`CanvasEditor::set_section_box`] is called.
//! - Committing against a degenerate box logs a `warn` and stores the safe
//!   defaults produced by [`crate::coords`].
//! - Operations on unknown ids return [`EditError`].

use std::fmt;

use rustc_hash::FxHashMap;
use vellum_core::event::{Modifiers, PointerButton, PointerEvent, PointerEventKind};
use vellum_core::geometry::{Point, Rect, Size};

use crate::config::EditorConfig;
use crate::content::{BlockContent, BlockType, TextContent};
use crate::coords::{PixelSize, block_rect, position_to_percent, to_percent};
use crate::document::{
    Block, Document, DocumentError, Length, PercentPosition, PercentSize, Viewport,
};
use crate::host::EditorHost;
use crate::id::{BlockId, IdAllocator, SectionId};
use crate::interaction::{
    CancelReason, InteractionEffect, InteractionError, InteractionInput, InteractionMachine,
    InteractionState, InteractionTarget, InteractionTransition, ResizeHandle,
};
use crate::layers::{LayerEntry, layer_entries, reorder_assignments};
use crate::palette::{duplicate, template};
use crate::patch::BlockPatch;
use crate::render::{PlacedElement, RendererRegistry, paint_order};
use crate::resolve::{is_visible, resolve, resolve_section_height};
use crate::section::{
    BackgroundLayer, background_layers, candidate_height, has_full_bleed, hits_resize_handle,
    is_resizable, set_height,
};
use crate::snap::{GuideLine, SnapSibling, compute_snap};

const LOG_TARGET: &str = "vellum.canvas";

/// Half the thickness of a block resize grip's hit zone.
pub const BLOCK_HANDLE_HIT_PX: f64 = 6.0;

/// Errors from editing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    UnknownBlock {
        block_id: BlockId,
    },
    UnknownSection {
        section_id: SectionId,
    },
    NotATextBlock {
        block_id: BlockId,
        block_type: BlockType,
    },
    /// Full-bleed sections size themselves from their content.
    FullBleedSection {
        section_id: SectionId,
    },
    NotFullBleed {
        section_id: SectionId,
    },
    LayerIndexOutOfRange {
        section_id: SectionId,
        index: usize,
        len: usize,
    },
    InvalidHeight {
        height: f64,
    },
    Document(DocumentError),
    Interaction(InteractionError),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBlock { block_id } => write!(f, "block {block_id} does not exist"),
            Self::UnknownSection { section_id } => {
                write!(f, "section {section_id} does not exist")
            }
            Self::NotATextBlock {
                block_id,
                block_type,
            } => write!(f, "block {block_id} is a {block_type} block, not text"),
            Self::FullBleedSection { section_id } => {
                write!(f, "section {section_id} is sized by its full-bleed document")
            }
            Self::NotFullBleed { section_id } => {
                write!(f, "section {section_id} has no full-bleed document")
            }
            Self::LayerIndexOutOfRange {
                section_id,
                index,
                len,
            } => write!(
                f,
                "layer index {index} out of range for section {section_id} with {len} blocks"
            ),
            Self::InvalidHeight { height } => write!(f, "invalid section height {height}"),
            Self::Document(error) => write!(f, "document error: {error}"),
            Self::Interaction(error) => write!(f, "interaction error: {error}"),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(error) => Some(error),
            Self::Interaction(error) => Some(error),
            _ => None,
        }
    }
}

impl From<DocumentError> for EditError {
    fn from(error: DocumentError) -> Self {
        Self::Document(error)
    }
}

impl From<InteractionError> for EditError {
    fn from(error: InteractionError) -> Self {
        Self::Interaction(error)
    }
}

/// Transient feedback for an interaction in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPreview {
    /// Snapped canvas box of a dragged block over `section_id`.
    Move {
        block_id: BlockId,
        section_id: SectionId,
        rect: Rect,
        guides: Vec<GuideLine>,
    },
    /// Canvas box of a block being resized.
    Resize { block_id: BlockId, rect: Rect },
    /// Candidate section height in pixels.
    SectionHeight { section_id: SectionId, height: f64 },
}

/// Arrow-key nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    const fn unit(self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }
}

/// Geometry captured when the machine arms.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Move {
        block_id: BlockId,
        section_id: SectionId,
        start: Rect,
    },
    Resize {
        block_id: BlockId,
        section_id: SectionId,
        handle: ResizeHandle,
        start: Rect,
        size: PercentSize,
    },
    SectionHeight {
        section_id: SectionId,
        start_height: f64,
    },
}

/// Editing session over one document.
pub struct CanvasEditor<H: EditorHost> {
    document: Document,
    host: H,
    config: EditorConfig,
    viewport: Viewport,
    ids: IdAllocator,
    selected: Option<BlockId>,
    machine: InteractionMachine,
    gesture: Option<Gesture>,
    preview: Option<InteractionPreview>,
    section_boxes: FxHashMap<SectionId, Rect>,
    intrinsic_sizes: FxHashMap<BlockId, Size>,
}

impl<H: EditorHost + fmt::Debug> fmt::Debug for CanvasEditor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasEditor")
            .field("viewport", &self.viewport)
            .field("selected", &self.selected)
            .field("state", &self.machine.state())
            .field("sections", &self.document.sections.len())
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl<H: EditorHost> CanvasEditor<H> {
    /// Start a session with default configuration at the desktop viewport.
    pub fn new(document: Document, host: H) -> Result<Self, EditError> {
        Self::with_config(document, host, EditorConfig::default())
    }

    /// Start a session with an explicit configuration.
    ///
    /// The configuration is clamped through [`EditorConfig::validated`].
    pub fn with_config(
        document: Document,
        host: H,
        config: EditorConfig,
    ) -> Result<Self, EditError> {
        document.validate()?;
        let config = config.validated();
        let ids = IdAllocator::for_document(&document)?;
        let machine = InteractionMachine::new(config.drag_threshold_px)?;
        Ok(Self {
            document,
            host,
            config,
            viewport: Viewport::Desktop,
            ids,
            selected: None,
            machine,
            gesture: None,
            preview: None,
            section_boxes: FxHashMap::default(),
            intrinsic_sizes: FxHashMap::default(),
        })
    }

    // --- accessors ------------------------------------------------------

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// End the session, returning the document and host.
    #[must_use]
    pub fn into_parts(self) -> (Document, H) {
        (self.document, self.host)
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the configuration; takes effect for the next interaction.
    pub fn set_config(&mut self, config: EditorConfig) -> Result<(), EditError> {
        let config = config.validated();
        self.machine.set_drag_threshold(config.drag_threshold_px)?;
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Switch the editing viewport. Any active interaction is canceled.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            self.cancel(CancelReason::Programmatic);
            self.viewport = viewport;
        }
    }

    #[must_use]
    pub const fn selected_block_id(&self) -> Option<BlockId> {
        self.selected
    }

    /// Select a block (or clear the selection with `None`).
    pub fn select(&mut self, block_id: Option<BlockId>) -> Result<(), EditError> {
        if let Some(block_id) = block_id
            && self.document.block(block_id).is_none()
        {
            return Err(EditError::UnknownBlock { block_id });
        }
        self.selected = block_id;
        Ok(())
    }

    #[must_use]
    pub fn interaction_state(&self) -> InteractionState {
        self.machine.state()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&InteractionPreview> {
        self.preview.as_ref()
    }

    /// Alignment guides of the current drag, if any.
    #[must_use]
    pub fn guides(&self) -> &[GuideLine] {
        match &self.preview {
            Some(InteractionPreview::Move { guides, .. }) => guides,
            _ => &[],
        }
    }

    // --- measurement ----------------------------------------------------

    /// Record the measured canvas box of a section.
    pub fn set_section_box(&mut self, section_id: SectionId, rect: Rect) -> Result<(), EditError> {
        self.require_section(section_id)?;
        self.section_boxes.insert(section_id, rect);
        Ok(())
    }

    #[must_use]
    pub fn section_box(&self, section_id: SectionId) -> Option<Rect> {
        self.section_boxes.get(&section_id).copied()
    }

    /// Record the measured content size of a block, used for `auto`
    /// dimensions.
    pub fn set_intrinsic_size(&mut self, block_id: BlockId, size: Size) -> Result<(), EditError> {
        self.require_block(block_id)?;
        self.intrinsic_sizes.insert(block_id, size);
        Ok(())
    }

    fn intrinsic(&self, block_id: BlockId) -> Size {
        self.intrinsic_sizes
            .get(&block_id)
            .copied()
            .unwrap_or(Size::ZERO)
    }

    /// Canvas box of a block at the current viewport.
    #[must_use]
    pub fn block_box(&self, block_id: BlockId) -> Option<Rect> {
        let (section_id, _) = self.document.locate(block_id)?;
        let section_box = self.section_boxes.get(&section_id)?;
        let block = self.document.block(block_id)?;
        Some(self.rect_of(block, section_box))
    }

    fn rect_of(&self, block: &Block, section_box: &Rect) -> Rect {
        let geometry = resolve(block, self.viewport);
        block_rect(
            geometry.position,
            geometry.size,
            section_box,
            self.intrinsic(block.id),
        )
    }

    // --- hit testing ----------------------------------------------------

    /// Section whose measured box contains `point`.
    #[must_use]
    pub fn section_at(&self, point: Point) -> Option<SectionId> {
        self.document
            .sections
            .iter()
            .map(|section| section.id)
            .find(|id| {
                self.section_boxes
                    .get(id)
                    .is_some_and(|rect| rect.contains(point))
            })
    }

    fn within_bounds(&self, point: Point) -> bool {
        self.section_boxes.values().any(|rect| rect.contains(point))
    }

    fn handle_at(&self, block_id: BlockId, point: Point) -> Option<ResizeHandle> {
        let block = self.document.block(block_id)?;
        if block.locked || !is_visible(block, self.viewport) {
            return None;
        }
        let rect = self.block_box(block_id)?;
        let h = BLOCK_HANDLE_HIT_PX;
        let corner = Rect::new(rect.right() - h, rect.bottom() - h, h * 2.0, h * 2.0);
        let right = Rect::new(rect.right() - h, rect.y, h * 2.0, rect.height);
        let bottom = Rect::new(rect.x, rect.bottom() - h, rect.width, h * 2.0);
        if corner.contains(point) {
            Some(ResizeHandle::BottomRight)
        } else if right.contains(point) {
            Some(ResizeHandle::Right)
        } else if bottom.contains(point) {
            Some(ResizeHandle::Bottom)
        } else {
            None
        }
    }

    /// What a press at `point` would grab.
    ///
    /// Priority: resize grips of the selected block, then section bottom
    /// handles, then the top-most visible block under the pointer.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<InteractionTarget> {
        if let Some(selected) = self.selected
            && let Some(handle) = self.handle_at(selected, point)
        {
            return Some(InteractionTarget::block_resize(selected, handle));
        }

        for section in &self.document.sections {
            if let Some(section_box) = self.section_boxes.get(&section.id)
                && hits_resize_handle(section_box, point)
                && is_resizable(self.document.blocks(section.id))
            {
                return Some(InteractionTarget::section_resize(section.id));
            }
        }

        let section_id = self.section_at(point)?;
        let section_box = self.section_boxes.get(&section_id)?;
        paint_order(self.document.blocks(section_id), self.viewport)
            .into_iter()
            .rev()
            .find(|block| self.rect_of(block, section_box).contains(point))
            .map(|block| InteractionTarget::block(block.id))
    }

    // --- pointer input --------------------------------------------------

    /// Feed one pointer event.
    ///
    /// Returns the machine transition, or `None` when the event was not an
    /// interaction input (hover, secondary buttons, presses on empty canvas).
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
    ) -> Result<Option<InteractionTransition>, EditError> {
        match event.kind {
            PointerEventKind::Down(PointerButton::Primary) => Ok(self.pointer_down(event)),
            PointerEventKind::Down(_)
            | PointerEventKind::Up(PointerButton::Secondary | PointerButton::Middle) => Ok(None),
            PointerEventKind::Move => self.pointer_move(event),
            PointerEventKind::Up(PointerButton::Primary) => self.pointer_up(event),
            PointerEventKind::Cancel => Ok(self.cancel(CancelReason::PointerCancel)),
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> Option<InteractionTransition> {
        if let Some(active) = self.machine.state().target() {
            return Some(self.machine.apply(InteractionInput::PointerDown {
                target: active,
                pointer_id: event.pointer_id,
                position: event.position,
                locked: false,
            }));
        }

        let Some(target) = self.hit_test(event.position) else {
            self.selected = None;
            return None;
        };

        let mut locked = false;
        if let Some(block_id) = target.block_id() {
            self.selected = Some(block_id);
            locked = self
                .document
                .block(block_id)
                .is_some_and(|block| block.locked);
        }

        let transition = self.machine.apply(InteractionInput::PointerDown {
            target,
            pointer_id: event.pointer_id,
            position: event.position,
            locked,
        });
        if matches!(transition.effect, InteractionEffect::Armed { .. }) {
            self.gesture = self.capture_gesture(target);
        }
        tracing::debug!(
            target: LOG_TARGET,
            transition_id = transition.transition_id,
            grabbed = ?target,
            locked = locked,
            "pointer down"
        );
        Some(transition)
    }

    fn capture_gesture(&self, target: InteractionTarget) -> Option<Gesture> {
        match target {
            InteractionTarget::Block { block_id } => {
                let (section_id, _) = self.document.locate(block_id)?;
                Some(Gesture::Move {
                    block_id,
                    section_id,
                    start: self.block_box(block_id)?,
                })
            }
            InteractionTarget::BlockResize { block_id, handle } => {
                let (section_id, _) = self.document.locate(block_id)?;
                let block = self.document.block(block_id)?;
                Some(Gesture::Resize {
                    block_id,
                    section_id,
                    handle,
                    start: self.block_box(block_id)?,
                    size: resolve(block, self.viewport).size,
                })
            }
            InteractionTarget::SectionResize { section_id } => {
                let section = self.document.section(section_id)?;
                Some(Gesture::SectionHeight {
                    section_id,
                    start_height: resolve_section_height(section, self.viewport),
                })
            }
        }
    }

    fn pointer_move(
        &mut self,
        event: &PointerEvent,
    ) -> Result<Option<InteractionTransition>, EditError> {
        if !self.machine.is_active() {
            return Ok(None);
        }

        let own_pointer = self.machine.state().pointer_id() == Some(event.pointer_id);
        if own_pointer
            && matches!(self.gesture, Some(Gesture::Move { .. }))
            && !self.within_bounds(event.position)
        {
            return Ok(self.cancel(CancelReason::LeftBounds));
        }

        let transition = self.machine.apply(InteractionInput::PointerMove {
            pointer_id: event.pointer_id,
            position: event.position,
        });
        if let InteractionEffect::Started {
            total_dx,
            total_dy,
            current,
            ..
        }
        | InteractionEffect::Updated {
            total_dx,
            total_dy,
            current,
            ..
        } = transition.effect
            && let Some(gesture) = self.gesture
        {
            let preview = self.preview_for(gesture, total_dx, total_dy, current, event.modifiers);
            if let InteractionPreview::SectionHeight { section_id, height } = preview {
                self.host
                    .on_section_resize(section_id, height, false, self.viewport);
            }
            self.preview = Some(preview);
        }
        Ok(Some(transition))
    }

    fn pointer_up(
        &mut self,
        event: &PointerEvent,
    ) -> Result<Option<InteractionTransition>, EditError> {
        if !self.machine.is_active() {
            return Ok(None);
        }
        let own_pointer = self.machine.state().pointer_id() == Some(event.pointer_id);
        if own_pointer
            && matches!(self.gesture, Some(Gesture::Move { .. }))
            && !self.within_bounds(event.position)
        {
            return Ok(self.cancel(CancelReason::LeftBounds));
        }
        let transition = self.machine.apply(InteractionInput::PointerUp {
            pointer_id: event.pointer_id,
            position: event.position,
        });
        match transition.effect {
            InteractionEffect::Selected { target, .. } => {
                self.end_gesture();
                tracing::debug!(
                    target: LOG_TARGET,
                    grabbed = ?target,
                    "click selected without moving"
                );
            }
            InteractionEffect::Committed {
                total_dx,
                total_dy,
                end,
                ..
            } => {
                let gesture = self.gesture;
                self.end_gesture();
                if let Some(gesture) = gesture {
                    let preview =
                        self.preview_for(gesture, total_dx, total_dy, end, event.modifiers);
                    self.commit(gesture, preview, end)?;
                }
            }
            _ => {}
        }
        Ok(Some(transition))
    }

    /// Abort the active interaction, discarding its preview.
    pub fn cancel(&mut self, reason: CancelReason) -> Option<InteractionTransition> {
        if !self.machine.is_active() {
            return None;
        }
        let transition = self.machine.apply(InteractionInput::Cancel { reason });
        if let Some(Gesture::SectionHeight {
            section_id,
            start_height,
        }) = self.gesture
            && self.preview.is_some()
        {
            self.host
                .on_section_resize(section_id, start_height, false, self.viewport);
        }
        self.end_gesture();
        tracing::debug!(
            target: LOG_TARGET,
            transition_id = transition.transition_id,
            reason = ?reason,
            "interaction canceled"
        );
        Some(transition)
    }

    fn end_gesture(&mut self) {
        self.gesture = None;
        self.preview = None;
    }

    fn preview_for(
        &self,
        gesture: Gesture,
        total_dx: f64,
        total_dy: f64,
        pointer: Point,
        modifiers: Modifiers,
    ) -> InteractionPreview {
        match gesture {
            Gesture::Move {
                block_id,
                section_id,
                start,
            } => {
                let (dx, dy) = if modifiers.contains(Modifiers::SHIFT) {
                    if total_dx.abs() >= total_dy.abs() {
                        (total_dx, 0.0)
                    } else {
                        (0.0, total_dy)
                    }
                } else {
                    (total_dx, total_dy)
                };
                let candidate = start.translate(dx, dy);
                let over = self.section_at(pointer).unwrap_or(section_id);
                let threshold = self
                    .config
                    .effective_snap_threshold()
                    .filter(|_| !modifiers.contains(Modifiers::ALT));
                match (threshold, self.section_boxes.get(&over)) {
                    (Some(threshold), Some(section_box)) => {
                        let siblings = self.snap_siblings(over, block_id, section_box);
                        let snapped = compute_snap(candidate, &siblings, section_box, threshold);
                        InteractionPreview::Move {
                            block_id,
                            section_id: over,
                            rect: snapped.rect,
                            guides: snapped.guides,
                        }
                    }
                    _ => InteractionPreview::Move {
                        block_id,
                        section_id: over,
                        rect: candidate,
                        guides: Vec::new(),
                    },
                }
            }
            Gesture::Resize {
                block_id,
                handle,
                start,
                size,
                ..
            } => {
                let min = self.config.min_block_size_px;
                let width = if handle.resizes_width() {
                    (start.width + total_dx).max(min)
                } else {
                    start.width
                };
                let height = if handle.resizes_height() && !size.height.is_auto() {
                    (start.height + total_dy).max(min)
                } else {
                    start.height
                };
                InteractionPreview::Resize {
                    block_id,
                    rect: Rect::new(start.x, start.y, width, height),
                }
            }
            Gesture::SectionHeight {
                section_id,
                start_height,
            } => InteractionPreview::SectionHeight {
                section_id,
                height: candidate_height(
                    start_height,
                    total_dy,
                    self.config.min_section_height_px,
                ),
            },
        }
    }

    fn snap_siblings(
        &self,
        section_id: SectionId,
        exclude: BlockId,
        section_box: &Rect,
    ) -> Vec<SnapSibling> {
        self.document
            .blocks(section_id)
            .iter()
            .filter(|block| block.id != exclude)
            .map(|block| SnapSibling {
                rect: self.rect_of(block, section_box),
                visible: is_visible(block, self.viewport),
            })
            .collect()
    }

    fn commit(
        &mut self,
        gesture: Gesture,
        preview: InteractionPreview,
        end: Point,
    ) -> Result<(), EditError> {
        match (gesture, preview) {
            (
                Gesture::Move {
                    block_id,
                    section_id: origin,
                    ..
                },
                InteractionPreview::Move { rect, .. },
            ) => {
                let destination = self
                    .section_at(end)
                    .filter(|id| *id != origin)
                    .unwrap_or(origin);
                let Some(section_box) = self.section_boxes.get(&destination).copied() else {
                    return Err(EditError::UnknownSection {
                        section_id: destination,
                    });
                };
                self.warn_if_degenerate(destination, &section_box);
                let local = rect.relative_to(&section_box);
                let position = position_to_percent(local.origin(), section_box.size());
                if destination == origin {
                    self.update_block(block_id, BlockPatch::position(position))
                } else {
                    self.move_block(block_id, destination, position)
                }
            }
            (
                Gesture::Resize {
                    block_id,
                    section_id,
                    handle,
                    size,
                    ..
                },
                InteractionPreview::Resize { rect, .. },
            ) => {
                let Some(section_box) = self.section_boxes.get(&section_id).copied() else {
                    return Err(EditError::UnknownSection { section_id });
                };
                self.warn_if_degenerate(section_id, &section_box);
                let converted = percent_size_for(&rect, section_box.size(), size.height.is_auto());
                let new_size = PercentSize::new(
                    if handle.resizes_width() {
                        converted.width
                    } else {
                        size.width
                    },
                    if handle.resizes_height() {
                        converted.height
                    } else {
                        size.height
                    },
                );
                self.update_block(block_id, BlockPatch::size(new_size))
            }
            (_, InteractionPreview::SectionHeight { section_id, height }) => {
                self.commit_section_height(section_id, height)
            }
            (gesture, preview) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    gesture = ?gesture,
                    preview = ?preview,
                    "gesture and preview disagree; nothing committed"
                );
                Ok(())
            }
        }
    }

    fn warn_if_degenerate(&self, section_id: SectionId, section_box: &Rect) {
        if section_box.is_empty() {
            tracing::warn!(
                target: LOG_TARGET,
                section_id = section_id.get(),
                width = section_box.width,
                height = section_box.height,
                "committing against a degenerate section box"
            );
        }
    }

    // --- document operations --------------------------------------------

    fn require_block(&self, block_id: BlockId) -> Result<&Block, EditError> {
        self.document
            .block(block_id)
            .ok_or(EditError::UnknownBlock { block_id })
    }

    fn require_section(&self, section_id: SectionId) -> Result<(), EditError> {
        match self.document.section(section_id) {
            Some(_) => Ok(()),
            None => Err(EditError::UnknownSection { section_id }),
        }
    }

    /// Apply `patch` at the current viewport and report it to the host.
    pub fn update_block(&mut self, block_id: BlockId, patch: BlockPatch) -> Result<(), EditError> {
        let viewport = self.viewport;
        let _span = tracing::debug_span!(
            "canvas.commit",
            block_id = block_id.get(),
            viewport = %viewport
        )
        .entered();

        let block = self
            .document
            .block_mut(block_id)
            .ok_or(EditError::UnknownBlock { block_id })?;
        patch.apply(block, viewport);
        tracing::debug!(
            target: LOG_TARGET,
            block_id = block_id.get(),
            viewport = %viewport,
            position = patch.position.is_some(),
            size = patch.size.is_some(),
            "block updated"
        );
        self.host.on_block_change(block_id, &patch, viewport);
        Ok(())
    }

    /// Move a block to the end of another section's list at `position`.
    ///
    /// Percentages are relative to the owning section, so the base position
    /// is always rewritten. An existing override at the current viewport is
    /// rewritten too and reported through `on_block_change`.
    pub fn move_block(
        &mut self,
        block_id: BlockId,
        section_id: SectionId,
        position: PercentPosition,
    ) -> Result<(), EditError> {
        self.require_section(section_id)?;
        let viewport = self.viewport;
        let _span = tracing::debug_span!(
            "canvas.move",
            block_id = block_id.get(),
            section_id = section_id.get(),
            viewport = %viewport
        )
        .entered();

        let (origin, mut block) = self
            .document
            .remove_block(block_id)
            .ok_or(EditError::UnknownBlock { block_id })?;
        block.position = position;
        let override_patch = (!viewport.is_base()
            && block
                .layouts
                .get(&viewport)
                .is_some_and(|layout| layout.position.is_some()))
        .then(|| BlockPatch::position(position));
        if let Some(patch) = &override_patch {
            patch.apply(&mut block, viewport);
        }
        self.document.append_block(section_id, block)?;
        tracing::debug!(
            target: LOG_TARGET,
            block_id = block_id.get(),
            from = origin.get(),
            to = section_id.get(),
            x = position.x,
            y = position.y,
            "block moved across sections"
        );
        self.host.on_block_move(block_id, section_id, position);
        if let Some(patch) = override_patch {
            self.host.on_block_change(block_id, &patch, viewport);
        }
        Ok(())
    }

    /// Move the selected block by the configured nudge step.
    ///
    /// Returns the new position, or `None` when nothing moved (no selection,
    /// locked block, or unmeasured section).
    pub fn nudge(
        &mut self,
        direction: NudgeDirection,
        large: bool,
    ) -> Result<Option<PercentPosition>, EditError> {
        let Some(block_id) = self.selected else {
            return Ok(None);
        };
        let block = self.require_block(block_id)?;
        if block.locked {
            return Ok(None);
        }
        let Some((section_id, _)) = self.document.locate(block_id) else {
            return Err(EditError::UnknownBlock { block_id });
        };
        let Some(section_box) = self
            .section_boxes
            .get(&section_id)
            .copied()
            .filter(|rect| !rect.is_empty())
        else {
            tracing::warn!(
                target: LOG_TARGET,
                block_id = block_id.get(),
                section_id = section_id.get(),
                "nudge skipped: section has no measured box"
            );
            return Ok(None);
        };

        let step = if large {
            self.config.nudge_large_step_px
        } else {
            self.config.nudge_step_px
        };
        let (ux, uy) = direction.unit();
        let rect = self.rect_of(block, &section_box).translate(ux * step, uy * step);
        let local = rect.relative_to(&section_box);
        let position = position_to_percent(local.origin(), section_box.size());
        self.update_block(block_id, BlockPatch::position(position))?;
        Ok(Some(position))
    }

    // --- section container ----------------------------------------------

    /// Set a section's height at the current viewport and report it as final.
    pub fn resize_section(&mut self, section_id: SectionId, height: f64) -> Result<(), EditError> {
        self.require_section(section_id)?;
        if !is_resizable(self.document.blocks(section_id)) {
            return Err(EditError::FullBleedSection { section_id });
        }
        if !height.is_finite() {
            return Err(EditError::InvalidHeight { height });
        }
        self.commit_section_height(section_id, height.max(self.config.min_section_height_px))
    }

    fn commit_section_height(
        &mut self,
        section_id: SectionId,
        height: f64,
    ) -> Result<(), EditError> {
        let viewport = self.viewport;
        let section = self
            .document
            .section_mut(section_id)
            .ok_or(EditError::UnknownSection { section_id })?;
        set_height(section, height, viewport);
        tracing::debug!(
            target: LOG_TARGET,
            section_id = section_id.get(),
            height = height,
            viewport = %viewport,
            "section height committed"
        );
        self.host.on_section_resize(section_id, height, true, viewport);
        Ok(())
    }

    /// Content height reported by a full-bleed embedded document renderer.
    ///
    /// Unchanged heights are not re-reported.
    pub fn report_content_height(
        &mut self,
        section_id: SectionId,
        height: f64,
    ) -> Result<(), EditError> {
        self.require_section(section_id)?;
        if !has_full_bleed(self.document.blocks(section_id)) {
            return Err(EditError::NotFullBleed { section_id });
        }
        if !height.is_finite() || height < 0.0 {
            return Err(EditError::InvalidHeight { height });
        }
        let height = height.max(self.config.min_section_height_px);
        let current = self
            .document
            .section(section_id)
            .map(|section| resolve_section_height(section, self.viewport));
        if current == Some(height) {
            return Ok(());
        }
        self.commit_section_height(section_id, height)
    }

    /// Whether the section currently offers a manual resize handle.
    pub fn section_resizable(&self, section_id: SectionId) -> Result<bool, EditError> {
        self.require_section(section_id)?;
        Ok(is_resizable(self.document.blocks(section_id)))
    }

    /// Background paint layers of a section, bottom first.
    pub fn background_layers(
        &self,
        section_id: SectionId,
    ) -> Result<Vec<BackgroundLayer>, EditError> {
        self.document
            .section(section_id)
            .map(|section| background_layers(&section.background))
            .ok_or(EditError::UnknownSection { section_id })
    }

    /// Render a section through `registry`, in paint order.
    ///
    /// Returns an empty list when the section has no measured box yet.
    pub fn render_section<E>(
        &self,
        registry: &RendererRegistry<E>,
        section_id: SectionId,
    ) -> Result<Vec<PlacedElement<E>>, EditError> {
        self.require_section(section_id)?;
        let Some(section_box) = self.section_boxes.get(&section_id) else {
            return Ok(Vec::new());
        };
        Ok(registry.render_section(
            self.document.blocks(section_id),
            self.viewport,
            section_box,
            |block_id| self.intrinsic(block_id),
        ))
    }

    // --- layers panel ---------------------------------------------------

    /// Layer rows for a section, top-most first.
    pub fn layer_entries(&self, section_id: SectionId) -> Result<Vec<LayerEntry>, EditError> {
        self.require_section(section_id)?;
        Ok(layer_entries(
            self.document.blocks(section_id),
            self.viewport,
            self.selected,
        ))
    }

    /// Move the row at panel index `from` to `to` and renumber the section.
    pub fn reorder_layers(
        &mut self,
        section_id: SectionId,
        from: usize,
        to: usize,
    ) -> Result<(), EditError> {
        self.require_section(section_id)?;
        let blocks = self.document.blocks(section_id);
        let len = blocks.len();
        let Some(assignments) = reorder_assignments(blocks, from, to) else {
            return Err(EditError::LayerIndexOutOfRange {
                section_id,
                index: if from >= len { from } else { to },
                len,
            });
        };

        if let Some(list) = self.document.blocks.get_mut(&section_id) {
            for block in list.iter_mut() {
                if let Some((_, z_index)) = assignments.iter().find(|(id, _)| *id == block.id) {
                    block.z_index = *z_index;
                }
            }
        }
        tracing::debug!(
            target: LOG_TARGET,
            section_id = section_id.get(),
            from = from,
            to = to,
            blocks = len,
            "layers reordered"
        );
        for (block_id, z_index) in assignments {
            self.host
                .on_block_change(block_id, &BlockPatch::z_index(z_index), self.viewport);
        }
        Ok(())
    }

    /// Show or hide a block at the current viewport.
    pub fn set_visibility(&mut self, block_id: BlockId, visible: bool) -> Result<(), EditError> {
        self.update_block(block_id, BlockPatch::visible(visible))
    }

    /// Flip visibility at the current viewport; returns the new value.
    pub fn toggle_visibility(&mut self, block_id: BlockId) -> Result<bool, EditError> {
        let visible = !is_visible(self.require_block(block_id)?, self.viewport);
        self.set_visibility(block_id, visible)?;
        Ok(visible)
    }

    pub fn set_locked(&mut self, block_id: BlockId, locked: bool) -> Result<(), EditError> {
        self.update_block(block_id, BlockPatch::locked(locked))
    }

    /// Flip the lock; returns the new value.
    pub fn toggle_lock(&mut self, block_id: BlockId) -> Result<bool, EditError> {
        let locked = !self.require_block(block_id)?.locked;
        self.set_locked(block_id, locked)?;
        Ok(locked)
    }

    /// Replace the text of a text block.
    pub fn edit_text(
        &mut self,
        block_id: BlockId,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        let block = self.require_block(block_id)?;
        if block.block_type() != BlockType::Text {
            return Err(EditError::NotATextBlock {
                block_id,
                block_type: block.block_type(),
            });
        }
        let content = BlockContent::Text(TextContent { text: text.into() });
        self.update_block(block_id, BlockPatch::content(content))
    }

    /// Remove a block, clearing the selection if it was selected.
    pub fn delete_block(&mut self, block_id: BlockId) -> Result<Block, EditError> {
        if self
            .machine
            .state()
            .target()
            .and_then(InteractionTarget::block_id)
            == Some(block_id)
        {
            self.cancel(CancelReason::Programmatic);
        }
        let (section_id, block) = self
            .document
            .remove_block(block_id)
            .ok_or(EditError::UnknownBlock { block_id })?;
        if self.selected == Some(block_id) {
            self.selected = None;
        }
        self.intrinsic_sizes.remove(&block_id);
        tracing::debug!(
            target: LOG_TARGET,
            block_id = block_id.get(),
            section_id = section_id.get(),
            "block deleted"
        );
        self.host.on_block_delete(block_id);
        Ok(block)
    }

    /// Delete the selected block, if any.
    pub fn delete_selected(&mut self) -> Result<Option<Block>, EditError> {
        match self.selected {
            Some(block_id) => self.delete_block(block_id).map(Some),
            None => Ok(None),
        }
    }

    // --- palette --------------------------------------------------------

    fn top_z(&self, section_id: SectionId) -> i32 {
        self.document
            .max_z_index(section_id)
            .map_or(0, |z| z.saturating_add(1))
    }

    fn append_new(&mut self, section_id: SectionId, block: Block) -> Result<BlockId, EditError> {
        let block_id = block.id;
        self.document.append_block(section_id, block)?;
        self.selected = Some(block_id);
        if let Some(block) = self.document.block(block_id) {
            tracing::debug!(
                target: LOG_TARGET,
                block_id = block_id.get(),
                section_id = section_id.get(),
                block_type = %block.block_type(),
                "block created"
            );
            self.host.on_block_create(section_id, block);
        }
        Ok(block_id)
    }

    /// Insert a new block from the palette on top of a section.
    pub fn insert_block(
        &mut self,
        section_id: SectionId,
        block_type: BlockType,
        position: PercentPosition,
    ) -> Result<BlockId, EditError> {
        self.require_section(section_id)?;
        let block_id = self.ids.allocate_block()?;
        let z_index = self.top_z(section_id);
        let block = template(block_type).instantiate(block_id, position, z_index);
        self.append_new(section_id, block)
    }

    /// Copy a block into its own section, offset and stacked on top.
    pub fn duplicate_block(&mut self, block_id: BlockId) -> Result<BlockId, EditError> {
        let Some((section_id, _)) = self.document.locate(block_id) else {
            return Err(EditError::UnknownBlock { block_id });
        };
        let new_id = self.ids.allocate_block()?;
        let z_index = self.top_z(section_id);
        let source = self.require_block(block_id)?;
        let copy = duplicate(source, new_id, self.config.duplicate_offset_pct, z_index);
        self.append_new(section_id, copy)
    }
}

/// Size a block would have if resized to `rect` against `section`.
///
/// Exposed for hosts that implement their own resize UI.
#[must_use]
pub fn percent_size_for(rect: &Rect, section: Size, keep_auto_height: bool) -> PercentSize {
    let pixels = PixelSize::new(
        Length::Value(rect.width),
        if keep_auto_height {
            Length::Auto
        } else {
            Length::Value(rect.height)
        },
    );
    to_percent(Point::ORIGIN, pixels, section).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Section;
    use crate::host::{HostCall, HostLog};

    fn sid(raw: u64) -> SectionId {
        SectionId::new(raw).expect("non-zero")
    }

    fn bid(raw: u64) -> BlockId {
        BlockId::new(raw).expect("non-zero")
    }

    fn shape(raw: u64, x: f64, y: f64, z: i32) -> Block {
        Block::new(bid(raw), BlockContent::default_for(BlockType::Shape))
            .with_position(x, y)
            .with_size(PercentSize::fixed(10.0, 10.0))
            .with_z_index(z)
    }

    /// One 1000x500 section at the canvas origin holding two shapes.
    fn editor() -> CanvasEditor<HostLog> {
        let mut document = Document::default();
        document
            .push_section(Section::new(sid(1), "Hero", 500.0))
            .expect("section");
        document
            .append_block(sid(1), shape(1, 10.0, 10.0, 0))
            .expect("block 1");
        document
            .append_block(sid(1), shape(2, 60.0, 60.0, 1))
            .expect("block 2");
        let mut editor = CanvasEditor::new(document, HostLog::new()).expect("valid document");
        editor
            .set_section_box(sid(1), Rect::new(0.0, 0.0, 1000.0, 500.0))
            .expect("known section");
        editor
    }

    #[test]
    fn click_selects_without_host_calls() {
        let mut editor = editor();
        editor
            .handle_pointer(&PointerEvent::down(1, 120.0, 70.0))
            .expect("down");
        editor
            .handle_pointer(&PointerEvent::moved(1, 122.0, 72.0))
            .expect("move");
        editor
            .handle_pointer(&PointerEvent::up(1, 122.0, 72.0))
            .expect("up");
        assert_eq!(editor.selected_block_id(), Some(bid(1)));
        assert!(editor.host().is_empty());
        assert_eq!(
            editor.document().block(bid(1)).map(|b| b.position),
            Some(PercentPosition::new(10.0, 10.0))
        );
    }

    #[test]
    fn press_on_empty_canvas_clears_selection() {
        let mut editor = editor();
        editor.select(Some(bid(2))).expect("exists");
        let transition = editor
            .handle_pointer(&PointerEvent::down(1, 400.0, 20.0))
            .expect("down");
        assert!(transition.is_none());
        assert_eq!(editor.selected_block_id(), None);
    }

    #[test]
    fn drag_commits_position_on_release() {
        let mut editor = editor();
        editor
            .set_config(EditorConfig {
                snapping_enabled: false,
                ..EditorConfig::default()
            })
            .expect("valid config");
        editor.handle_pointer(&PointerEvent::down(1, 110.0, 60.0)).expect("down");
        editor.handle_pointer(&PointerEvent::moved(1, 160.0, 60.0)).expect("move");
        assert!(matches!(
            editor.preview(),
            Some(InteractionPreview::Move { rect, .. }) if rect.x == 150.0
        ));
        editor.handle_pointer(&PointerEvent::up(1, 210.0, 110.0)).expect("up");

        assert_eq!(
            editor.document().block(bid(1)).map(|b| b.position),
            Some(PercentPosition::new(20.0, 20.0))
        );
        assert_eq!(editor.host().len(), 1);
        assert!(editor.preview().is_none());
    }

    #[test]
    fn shift_locks_dominant_axis() {
        let mut editor = editor();
        editor
            .set_config(EditorConfig {
                snapping_enabled: false,
                ..EditorConfig::default()
            })
            .expect("valid config");
        editor.handle_pointer(&PointerEvent::down(1, 110.0, 60.0)).expect("down");
        editor
            .handle_pointer(&PointerEvent::up(1, 210.0, 80.0).with_modifiers(Modifiers::SHIFT))
            .expect("up without move");
        // Released while armed: a click, nothing committed.
        assert!(editor.host().is_empty());

        editor.handle_pointer(&PointerEvent::down(1, 110.0, 60.0)).expect("down");
        editor.handle_pointer(&PointerEvent::moved(1, 210.0, 80.0)).expect("move");
        editor
            .handle_pointer(&PointerEvent::up(1, 210.0, 80.0).with_modifiers(Modifiers::SHIFT))
            .expect("up");
        assert_eq!(
            editor.document().block(bid(1)).map(|b| b.position),
            Some(PercentPosition::new(20.0, 10.0))
        );
    }

    #[test]
    fn locked_block_selects_but_does_not_move() {
        let mut editor = editor();
        editor.set_locked(bid(1), true).expect("lock");
        editor.host_mut().drain();

        editor.handle_pointer(&PointerEvent::down(1, 110.0, 60.0)).expect("down");
        assert_eq!(editor.selected_block_id(), Some(bid(1)));
        let moved = editor
            .handle_pointer(&PointerEvent::moved(1, 300.0, 300.0))
            .expect("move");
        assert!(moved.is_none());
        editor.handle_pointer(&PointerEvent::up(1, 300.0, 300.0)).expect("up");
        assert!(editor.host().is_empty());
    }

    #[test]
    fn leaving_bounds_cancels_drag() {
        let mut editor = editor();
        editor.handle_pointer(&PointerEvent::down(1, 110.0, 60.0)).expect("down");
        editor.handle_pointer(&PointerEvent::moved(1, 150.0, 60.0)).expect("move");
        let transition = editor
            .handle_pointer(&PointerEvent::moved(1, 1500.0, 60.0))
            .expect("move out")
            .expect("transition");
        assert!(matches!(
            transition.effect,
            InteractionEffect::Canceled {
                reason: CancelReason::LeftBounds,
                ..
            }
        ));
        assert!(editor.preview().is_none());
        assert!(editor.guides().is_empty());
        editor.handle_pointer(&PointerEvent::up(1, 1500.0, 60.0)).expect("up");
        assert!(editor.host().is_empty());
    }

    #[test]
    fn resize_right_handle_changes_width_only() {
        let mut editor = editor();
        editor.select(Some(bid(1))).expect("exists");
        // Block 1 spans 100..200 x 50..100; grab the right edge.
        editor.handle_pointer(&PointerEvent::down(1, 200.0, 75.0)).expect("down");
        assert!(matches!(
            editor.interaction_state(),
            InteractionState::Armed {
                target: InteractionTarget::BlockResize {
                    handle: ResizeHandle::Right,
                    ..
                },
                ..
            }
        ));
        editor.handle_pointer(&PointerEvent::moved(1, 300.0, 140.0)).expect("move");
        editor.handle_pointer(&PointerEvent::up(1, 300.0, 140.0)).expect("up");
        let block = editor.document().block(bid(1)).expect("block");
        assert_eq!(block.size, PercentSize::fixed(20.0, 10.0));
        assert_eq!(block.position, PercentPosition::new(10.0, 10.0));
    }

    #[test]
    fn resize_enforces_minimum_size() {
        let mut editor = editor();
        editor.select(Some(bid(1))).expect("exists");
        editor.handle_pointer(&PointerEvent::down(1, 200.0, 100.0)).expect("down");
        editor.handle_pointer(&PointerEvent::moved(1, 0.0, 0.0)).expect("move");
        assert!(matches!(
            editor.preview(),
            Some(InteractionPreview::Resize { rect, .. })
                if rect.width == 10.0 && rect.height == 10.0
        ));
    }

    #[test]
    fn section_handle_reports_previews_then_final() {
        let mut editor = editor();
        editor.handle_pointer(&PointerEvent::down(1, 500.0, 500.0)).expect("down");
        editor.handle_pointer(&PointerEvent::moved(1, 500.0, 560.0)).expect("move");
        editor.handle_pointer(&PointerEvent::moved(1, 500.0, 580.0)).expect("move");
        editor.handle_pointer(&PointerEvent::up(1, 500.0, 600.0)).expect("up");

        let calls = editor.host().calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(
            calls[0],
            HostCall::SectionResize { height, is_final: false, .. } if height == 560.0
        ));
        assert!(matches!(
            calls[2],
            HostCall::SectionResize { height, is_final: true, .. } if height == 600.0
        ));
        assert_eq!(editor.document().section(sid(1)).map(|s| s.height), Some(600.0));
    }

    #[test]
    fn section_height_clamps_and_targets_viewport() {
        let mut editor = editor();
        editor.set_viewport(Viewport::Mobile);
        editor.handle_pointer(&PointerEvent::down(1, 500.0, 500.0)).expect("down");
        editor.handle_pointer(&PointerEvent::moved(1, 500.0, -200.0)).expect("move");
        editor.handle_pointer(&PointerEvent::up(1, 500.0, -200.0)).expect("up");
        let section = editor.document().section(sid(1)).expect("section");
        assert_eq!(section.height, 500.0);
        assert_eq!(section.heights.get(&Viewport::Mobile), Some(&40.0));
    }

    #[test]
    fn nudge_moves_selected_block() {
        let mut editor = editor();
        assert_eq!(editor.nudge(NudgeDirection::Right, false).expect("ok"), None);
        editor.select(Some(bid(1))).expect("exists");
        let moved = editor.nudge(NudgeDirection::Right, true).expect("ok");
        assert_eq!(moved, Some(PercentPosition::new(11.0, 10.0)));
        let moved = editor.nudge(NudgeDirection::Up, false).expect("ok");
        assert_eq!(moved, Some(PercentPosition::new(11.0, 9.8)));
    }

    #[test]
    fn edit_text_rejects_other_types() {
        let mut editor = editor();
        let err = editor.edit_text(bid(1), "hi").expect_err("shape is not text");
        assert_eq!(
            err,
            EditError::NotATextBlock {
                block_id: bid(1),
                block_type: BlockType::Shape
            }
        );
        let text = editor
            .insert_block(sid(1), BlockType::Text, PercentPosition::new(5.0, 5.0))
            .expect("insert");
        editor.edit_text(text, "<p>Hello</p>").expect("text edit");
        assert_eq!(
            editor.document().block(text).and_then(|b| b.content.text()),
            Some("<p>Hello</p>")
        );
    }

    #[test]
    fn delete_clears_selection() {
        let mut editor = editor();
        editor.select(Some(bid(2))).expect("exists");
        editor.delete_selected().expect("delete");
        assert_eq!(editor.selected_block_id(), None);
        assert!(editor.document().block(bid(2)).is_none());
        assert_eq!(
            editor.host().calls(),
            &[HostCall::BlockDelete { block_id: bid(2) }]
        );
        assert!(matches!(
            editor.delete_block(bid(2)),
            Err(EditError::UnknownBlock { .. })
        ));
    }

    #[test]
    fn lock_toggle_writes_base_at_any_viewport() {
        let mut editor = editor();
        editor.set_viewport(Viewport::Tablet);
        assert_eq!(editor.toggle_lock(bid(1)), Ok(true));

        let (document, host) = editor.into_parts();
        let block = document.block(bid(1)).expect("block");
        assert!(block.locked);
        assert!(block.layouts.is_empty());
        assert_eq!(
            host.calls(),
            &[HostCall::BlockChange {
                block_id: bid(1),
                patch: BlockPatch::locked(true),
                viewport: Viewport::Tablet,
            }]
        );
    }

    #[test]
    fn insert_and_duplicate_stack_on_top() {
        let mut editor = editor();
        let inserted = editor
            .insert_block(sid(1), BlockType::Image, PercentPosition::new(30.0, 30.0))
            .expect("insert");
        assert_eq!(inserted, bid(3));
        assert_eq!(editor.selected_block_id(), Some(inserted));
        assert_eq!(editor.document().block(inserted).map(|b| b.z_index), Some(2));

        let copy = editor.duplicate_block(inserted).expect("duplicate");
        let copied = editor.document().block(copy).expect("copy exists");
        assert_eq!(copied.z_index, 3);
        assert_eq!(copied.position, PercentPosition::new(32.0, 32.0));
        assert_eq!(editor.selected_block_id(), Some(copy));
        assert!(matches!(editor.host().calls()[1], HostCall::BlockCreate { .. }));
    }

    #[test]
    fn full_bleed_sections_follow_content_height() {
        let mut editor = editor();
        let doc = editor
            .insert_block(sid(1), BlockType::EmbeddedDocument, PercentPosition::default())
            .expect("insert");
        editor
            .update_block(
                doc,
                BlockPatch::content(BlockContent::EmbeddedDocument(
                    crate::content::EmbeddedDocumentContent {
                        full_bleed: true,
                        ..Default::default()
                    },
                )),
            )
            .expect("mark full bleed");

        assert_eq!(editor.section_resizable(sid(1)), Ok(false));
        assert_eq!(
            editor.resize_section(sid(1), 900.0),
            Err(EditError::FullBleedSection { section_id: sid(1) })
        );
        assert_eq!(editor.hit_test(Point::new(500.0, 500.0)), None);

        editor.host_mut().drain();
        editor.report_content_height(sid(1), 2400.0).expect("report");
        editor.report_content_height(sid(1), 2400.0).expect("repeat");
        assert_eq!(editor.host().len(), 1);
        assert_eq!(editor.document().section(sid(1)).map(|s| s.height), Some(2400.0));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut editor = editor();
        assert!(matches!(
            editor.set_section_box(sid(9), Rect::default()),
            Err(EditError::UnknownSection { .. })
        ));
        assert!(matches!(
            editor.select(Some(bid(9))),
            Err(EditError::UnknownBlock { .. })
        ));
        assert!(matches!(
            editor.reorder_layers(sid(1), 5, 0),
            Err(EditError::LayerIndexOutOfRange { index: 5, len: 2, .. })
        ));
    }

    #[test]
    fn percent_size_helper_keeps_auto_height() {
        let rect = Rect::new(0.0, 0.0, 250.0, 80.0);
        let size = percent_size_for(&rect, Size::new(500.0, 400.0), true);
        assert_eq!(size, PercentSize::new(Length::Value(50.0), Length::Auto));
    }
}
