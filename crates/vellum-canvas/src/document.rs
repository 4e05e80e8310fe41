//! Canonical proposal document schema and validation.
//!
//! A [`Document`] is the root aggregate the editor session owns: ordered
//! [`Section`]s, a map from section id to that section's ordered [`Block`]
//! list, and a global [`Theme`].
//!
//! # Invariants
//!
//! 1. Every block belongs to exactly one section's list.
//! 2. Block ids are unique across the document.
//! 3. Every key of `blocks` names a section in `sections`.
//! 4. Block coordinates are percentages of the owning section's box.
//!
//! [`Document::validate`] checks 1-3 and reports the first violation.
//!
//! # Failure Modes
//!
//! Missing geometry on a block deserializes to defaults (`{0%, 0%}`,
//! `{auto, auto}`, visible) instead of failing the whole document.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{BlockContent, BlockType};
use crate::id::{BlockId, SectionId};

/// Editing viewport. Desktop values are the base every other viewport
/// falls back to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    /// All viewports, widest first.
    pub const ALL: [Viewport; 3] = [Self::Desktop, Self::Tablet, Self::Mobile];

    /// Whether writes for this viewport go to base fields.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Desktop)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dimension of a block's size: a concrete value or intrinsic (`auto`).
///
/// The unit depends on context: percent of the section box on persisted
/// geometry, pixels after conversion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    #[default]
    Auto,
    Value(f64),
}

impl Length {
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The concrete value, if any.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Value(v) => Some(v),
        }
    }
}

#[derive(Serialize, Deserialize)]
enum AutoKeyword {
    #[serde(rename = "auto")]
    Auto,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Keyword(AutoKeyword),
    Value(f64),
}

impl From<LengthRepr> for Length {
    fn from(repr: LengthRepr) -> Self {
        match repr {
            LengthRepr::Keyword(AutoKeyword::Auto) => Self::Auto,
            LengthRepr::Value(v) => Self::Value(v),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(length: Length) -> Self {
        match length {
            Length::Auto => Self::Keyword(AutoKeyword::Auto),
            Length::Value(v) => Self::Value(v),
        }
    }
}

/// Block origin as percentages of the owning section's box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPosition {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl PercentPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Block size as percentages of the owning section's box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentSize {
    #[serde(default)]
    pub width: Length,
    #[serde(default)]
    pub height: Length,
}

impl PercentSize {
    #[must_use]
    pub const fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    /// Both dimensions fixed.
    #[must_use]
    pub const fn fixed(width: f64, height: f64) -> Self {
        Self::new(Length::Value(width), Length::Value(height))
    }
}

/// Free-form style dictionary (colors, spacing, border, background...).
pub type Styles = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    #[default]
    FadeIn,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    ZoomIn,
}

/// Entrance animation played when the block scrolls into view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    #[serde(rename = "type", default)]
    pub kind: AnimationKind,
    #[serde(default)]
    pub duration_ms: u32,
    #[serde(default)]
    pub delay_ms: u32,
}

/// Partial geometry override for one viewport. Absent keys fall back to the
/// block's base values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PercentPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PercentSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

impl LayoutOverride {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.size.is_none()
            && self.visible.is_none()
            && self.styles.is_none()
    }
}

fn default_visible() -> bool {
    true
}

/// A positioned, typed content element inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub content: BlockContent,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub position: PercentPosition,
    #[serde(default)]
    pub size: PercentSize,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layouts: BTreeMap<Viewport, LayoutOverride>,
}

impl Block {
    /// A visible, unlocked block at the section origin with `auto` size.
    #[must_use]
    pub fn new(id: BlockId, content: BlockContent) -> Self {
        Self {
            id,
            content,
            styles: Styles::new(),
            position: PercentPosition::default(),
            size: PercentSize::default(),
            z_index: 0,
            locked: false,
            visible: true,
            animation: None,
            layouts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.content.block_type()
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = PercentPosition::new(x, y);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: PercentSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The override slot for a non-base viewport, created on demand.
    pub fn layout_mut(&mut self, viewport: Viewport) -> &mut LayoutOverride {
        self.layouts.entry(viewport).or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundRepeat {
    #[default]
    NoRepeat,
    Repeat,
    RepeatX,
    RepeatY,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub url: String,
    #[serde(default)]
    pub repeat: BackgroundRepeat,
    /// CSS background-position, e.g. `"center"` or `"50% 20%"`.
    #[serde(default = "default_background_position")]
    pub position: String,
    #[serde(default)]
    pub size: BackgroundSize,
}

fn default_background_position() -> String {
    "center".into()
}

fn default_opacity() -> f64 {
    1.0
}

/// Section background: solid color, optional image, and a tint overlay
/// painted above the image and below the blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBackground {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<BackgroundImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_color: Option<String>,
    #[serde(default)]
    pub overlay_opacity: f64,
}

impl Default for SectionBackground {
    fn default() -> Self {
        Self {
            color: None,
            opacity: default_opacity(),
            image: None,
            overlay_color: None,
            overlay_opacity: 0.0,
        }
    }
}

/// A vertically stacked container on the canvas.
///
/// The section's ordered block list lives in [`Document::blocks`]; use
/// [`Document::block_ids`] for the id view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub background: SectionBackground,
    /// Desktop height in pixels.
    pub height: f64,
    /// Per-viewport height overrides in pixels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub heights: BTreeMap<Viewport, f64>,
}

impl Section {
    #[must_use]
    pub fn new(id: SectionId, name: impl Into<String>, height: f64) -> Self {
        Self {
            id,
            name: name.into(),
            background: SectionBackground::default(),
            height,
            heights: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
}

impl Default for FontPairing {
    fn default() -> Self {
        Self {
            heading: "Playfair Display".into(),
            body: "Inter".into(),
        }
    }
}

/// Global document theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub font_pairing: FontPairing,
    pub accent_color: String,
    pub heading_color: String,
    pub text_color: String,
    pub background_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_pairing: FontPairing::default(),
            accent_color: "#b08d57".into(),
            heading_color: "#1f1f1f".into(),
            text_color: "#3d3d3d".into(),
            background_color: "#ffffff".into(),
        }
    }
}

/// Root aggregate: sections, their block lists, and the theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub blocks: BTreeMap<SectionId, Vec<Block>>,
    #[serde(default)]
    pub theme: Theme,
}

impl Document {
    /// Append a section (and an empty block list for it).
    pub fn push_section(&mut self, section: Section) -> Result<(), DocumentError> {
        if self.section(section.id).is_some() {
            return Err(DocumentError::DuplicateSectionId {
                section_id: section.id,
            });
        }
        self.blocks.entry(section.id).or_default();
        self.sections.push(section);
        Ok(())
    }

    #[must_use]
    pub fn section(&self, section_id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: SectionId) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|section| section.id == section_id)
    }

    /// Blocks of a section in document (list) order.
    #[must_use]
    pub fn blocks(&self, section_id: SectionId) -> &[Block] {
        self.blocks
            .get(&section_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ordered block ids of a section.
    #[must_use]
    pub fn block_ids(&self, section_id: SectionId) -> Vec<BlockId> {
        self.blocks(section_id).iter().map(|block| block.id).collect()
    }

    /// All blocks in section order, then list order.
    pub fn blocks_iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values().flatten()
    }

    /// Find the owning section and list index of a block.
    #[must_use]
    pub fn locate(&self, block_id: BlockId) -> Option<(SectionId, usize)> {
        self.blocks.iter().find_map(|(section_id, blocks)| {
            blocks
                .iter()
                .position(|block| block.id == block_id)
                .map(|index| (*section_id, index))
        })
    }

    #[must_use]
    pub fn block(&self, block_id: BlockId) -> Option<&Block> {
        let (section_id, index) = self.locate(block_id)?;
        self.blocks.get(&section_id)?.get(index)
    }

    pub fn block_mut(&mut self, block_id: BlockId) -> Option<&mut Block> {
        let (section_id, index) = self.locate(block_id)?;
        self.blocks.get_mut(&section_id)?.get_mut(index)
    }

    /// Highest `z_index` in a section, if it has any blocks.
    #[must_use]
    pub fn max_z_index(&self, section_id: SectionId) -> Option<i32> {
        self.blocks(section_id).iter().map(|block| block.z_index).max()
    }

    /// Append a block to a section's list.
    pub fn append_block(&mut self, section_id: SectionId, block: Block) -> Result<(), DocumentError> {
        if self.section(section_id).is_none() {
            return Err(DocumentError::UnknownSection { section_id });
        }
        if self.locate(block.id).is_some() {
            return Err(DocumentError::DuplicateBlockId { block_id: block.id });
        }
        self.blocks.entry(section_id).or_default().push(block);
        Ok(())
    }

    /// Remove a block from whichever section owns it.
    pub fn remove_block(&mut self, block_id: BlockId) -> Option<(SectionId, Block)> {
        let (section_id, index) = self.locate(block_id)?;
        let block = self.blocks.get_mut(&section_id)?.remove(index);
        Some((section_id, block))
    }

    /// Validate the structural invariants.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut section_ids = BTreeSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id) {
                return Err(DocumentError::DuplicateSectionId {
                    section_id: section.id,
                });
            }
            if !section.height.is_finite() || section.height < 0.0 {
                return Err(DocumentError::InvalidSectionHeight {
                    section_id: section.id,
                    height: section.height,
                });
            }
        }

        let mut block_ids = BTreeSet::new();
        for (section_id, blocks) in &self.blocks {
            if !section_ids.contains(section_id) {
                return Err(DocumentError::OrphanBlockList {
                    section_id: *section_id,
                });
            }
            for block in blocks {
                if !block_ids.insert(block.id) {
                    return Err(DocumentError::DuplicateBlockId { block_id: block.id });
                }
            }
        }
        Ok(())
    }
}

/// Validation errors for document construction and mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    ZeroBlockId,
    ZeroSectionId,
    IdOverflow,
    DuplicateBlockId { block_id: BlockId },
    DuplicateSectionId { section_id: SectionId },
    UnknownSection { section_id: SectionId },
    OrphanBlockList { section_id: SectionId },
    InvalidSectionHeight { section_id: SectionId, height: f64 },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBlockId => write!(f, "block id 0 is invalid"),
            Self::ZeroSectionId => write!(f, "section id 0 is invalid"),
            Self::IdOverflow => write!(f, "id space exhausted"),
            Self::DuplicateBlockId { block_id } => {
                write!(f, "block id {block_id} appears more than once")
            }
            Self::DuplicateSectionId { section_id } => {
                write!(f, "section id {section_id} appears more than once")
            }
            Self::UnknownSection { section_id } => {
                write!(f, "section {section_id} does not exist")
            }
            Self::OrphanBlockList { section_id } => {
                write!(f, "block list keyed by missing section {section_id}")
            }
            Self::InvalidSectionHeight { section_id, height } => {
                write!(f, "section {section_id} has invalid height {height}")
            }
        }
    }
}

impl std::error::Error for DocumentError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextContent;

    fn sid(raw: u64) -> SectionId {
        SectionId::new(raw).expect("non-zero")
    }

    fn bid(raw: u64) -> BlockId {
        BlockId::new(raw).expect("non-zero")
    }

    fn text(id: u64) -> Block {
        Block::new(
            bid(id),
            BlockContent::Text(TextContent {
                text: format!("block {id}"),
            }),
        )
    }

    fn two_sections() -> Document {
        let mut doc = Document::default();
        doc.push_section(Section::new(sid(1), "Intro", 600.0))
            .expect("fresh id");
        doc.push_section(Section::new(sid(2), "Pricing", 400.0))
            .expect("fresh id");
        doc
    }

    #[test]
    fn missing_geometry_defaults() {
        let json = r#"{ "id": 3, "type": "text", "content": { "text": "hi" } }"#;
        let block: Block = serde_json::from_str(json).expect("valid block");
        assert_eq!(block.position, PercentPosition::new(0.0, 0.0));
        assert_eq!(block.size, PercentSize::new(Length::Auto, Length::Auto));
        assert!(block.visible);
        assert!(!block.locked);
        assert_eq!(block.z_index, 0);
        assert_eq!(block.block_type(), BlockType::Text);
    }

    #[test]
    fn length_accepts_auto_keyword_and_numbers() {
        let size: PercentSize =
            serde_json::from_str(r#"{ "width": 40.5, "height": "auto" }"#).expect("valid size");
        assert_eq!(size, PercentSize::new(Length::Value(40.5), Length::Auto));
        let json = serde_json::to_value(size).expect("serialize");
        assert_eq!(json, serde_json::json!({ "width": 40.5, "height": "auto" }));
    }

    #[test]
    fn block_serializes_with_camel_case_and_layouts() {
        let mut block = text(9).with_z_index(4);
        block.layout_mut(Viewport::Mobile).visible = Some(false);
        let json = serde_json::to_value(&block).expect("serialize");
        assert_eq!(json["zIndex"], 4);
        assert_eq!(json["type"], "text");
        assert_eq!(json["layouts"]["mobile"]["visible"], false);
        let back: Block = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, block);
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut doc = two_sections();
        doc.append_block(sid(1), text(1)).expect("append");
        doc.append_block(sid(2), text(2)).expect("append");
        let json = serde_json::to_string(&doc).expect("serialize");
        let back: Document = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, doc);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn zero_ids_fail_to_load() {
        let json = r#"{ "id": 0, "type": "text", "content": { "text": "hi" } }"#;
        let err = serde_json::from_str::<Block>(json).expect_err("block id 0");
        assert!(err.to_string().contains("block id 0 is invalid"));

        let mut json = serde_json::to_value(two_sections()).expect("serialize");
        json["sections"][0]["id"] = serde_json::json!(0);
        let err = serde_json::from_value::<Document>(json).expect_err("section id 0");
        assert!(err.to_string().contains("section id 0 is invalid"));
    }

    #[test]
    fn locate_and_remove() {
        let mut doc = two_sections();
        doc.append_block(sid(1), text(1)).expect("append");
        doc.append_block(sid(2), text(2)).expect("append");
        doc.append_block(sid(2), text(3)).expect("append");
        assert_eq!(doc.locate(bid(3)), Some((sid(2), 1)));
        let (from, removed) = doc.remove_block(bid(2)).expect("present");
        assert_eq!(from, sid(2));
        assert_eq!(removed.id, bid(2));
        assert_eq!(doc.block_ids(sid(2)), vec![bid(3)]);
        assert!(doc.remove_block(bid(2)).is_none());
    }

    #[test]
    fn duplicate_block_ids_are_rejected() {
        let mut doc = two_sections();
        doc.append_block(sid(1), text(1)).expect("append");
        assert_eq!(
            doc.append_block(sid(2), text(1)),
            Err(DocumentError::DuplicateBlockId { block_id: bid(1) })
        );
        doc.blocks.get_mut(&sid(2)).expect("list").push(text(1));
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicateBlockId { block_id: bid(1) })
        );
    }

    #[test]
    fn orphan_block_lists_are_rejected() {
        let mut doc = two_sections();
        doc.blocks.insert(sid(9), vec![text(1)]);
        assert_eq!(
            doc.validate(),
            Err(DocumentError::OrphanBlockList { section_id: sid(9) })
        );
    }

    #[test]
    fn append_to_unknown_section_fails() {
        let mut doc = two_sections();
        assert_eq!(
            doc.append_block(sid(5), text(1)),
            Err(DocumentError::UnknownSection { section_id: sid(5) })
        );
    }

    #[test]
    fn max_z_index_ignores_other_sections() {
        let mut doc = two_sections();
        doc.append_block(sid(1), text(1).with_z_index(7)).expect("append");
        doc.append_block(sid(2), text(2).with_z_index(2)).expect("append");
        assert_eq!(doc.max_z_index(sid(2)), Some(2));
        assert_eq!(doc.max_z_index(sid(1)), Some(7));
    }
}
