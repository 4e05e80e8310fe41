#![forbid(unsafe_code)]

//! Responsive free-form canvas layout for proposal documents.
//!
//! # Role in Vellum
//! `vellum-canvas` owns the document model and everything that edits it:
//! per-viewport geometry resolution, percent/pixel conversion, alignment
//! snapping, the pointer interaction lifecycle, the layers panel, the block
//! palette, and the section container rules. Drawing and persistence belong
//! to the host, which plugs in through [`render::RendererRegistry`] and
//! [`host::EditorHost`].
//!
//! # Primary responsibilities
//! - **Document**: sections, block lists, theme, and stable ids.
//! - **Resolve**: merge desktop base geometry with tablet/mobile overrides.
//! - **Editor**: hit testing, drag/resize previews with snapping, and
//!   viewport-aware commits reported to the host.
//!
//! # How it fits in the system
//! Hosts measure section boxes and intrinsic block sizes, feed them to a
//! [`editor::CanvasEditor`] together with pointer events from
//! `vellum-core`, and render whatever [`editor::CanvasEditor::render_section`]
//! hands back.

pub mod config;
pub mod content;
pub mod coords;
pub mod document;
pub mod editor;
pub mod host;
pub mod id;
pub mod interaction;
pub mod layers;
pub mod palette;
pub mod patch;
pub mod render;
pub mod resolve;
pub mod section;
pub mod snap;

pub use config::{ConfigError, EditorConfig};
pub use content::{BlockContent, BlockType};
pub use document::{
    Block, Document, DocumentError, Length, PercentPosition, PercentSize, Section, Styles, Theme,
    Viewport,
};
pub use editor::{CanvasEditor, EditError, InteractionPreview, NudgeDirection};
pub use host::{EditorHost, HostCall, HostLog};
pub use id::{BlockId, SectionId};
pub use interaction::{
    CancelReason, InteractionEffect, InteractionMachine, InteractionState, InteractionTarget,
    ResizeHandle,
};
pub use patch::BlockPatch;
pub use render::{PlacedElement, RenderBlock, RendererRegistry};
pub use resolve::{ResolvedGeometry, resolve};
pub use snap::{GuideLine, SnapResult, compute_snap};
