//! Block palette: default templates and duplication.

use serde_json::json;

use crate::content::{BlockContent, BlockType};
use crate::document::{Block, Length, PercentPosition, PercentSize, Styles};
use crate::id::BlockId;

/// Starting content, size, and styles for a new block of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTemplate {
    pub content: BlockContent,
    pub size: PercentSize,
    pub styles: Styles,
}

impl BlockTemplate {
    /// Materialize the template as a block.
    #[must_use]
    pub fn instantiate(self, id: BlockId, position: PercentPosition, z_index: i32) -> Block {
        let mut block = Block::new(id, self.content)
            .with_size(self.size)
            .with_z_index(z_index);
        block.position = clamp_position(position);
        block.styles = self.styles;
        block
    }
}

fn styles<const N: usize>(entries: [(&str, serde_json::Value); N]) -> Styles {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn width_auto(width: f64) -> PercentSize {
    PercentSize::new(Length::Value(width), Length::Auto)
}

/// Default template for `block_type`.
#[must_use]
pub fn template(block_type: BlockType) -> BlockTemplate {
    let (size, styles) = match block_type {
        BlockType::Text => (width_auto(40.0), styles([("fontSize", json!(16))])),
        BlockType::Image => (PercentSize::fixed(40.0, 30.0), Styles::new()),
        BlockType::EmbeddedDocument => (width_auto(100.0), Styles::new()),
        BlockType::Button => (
            width_auto(20.0),
            styles([("borderRadius", json!(4)), ("padding", json!("12px 24px"))]),
        ),
        BlockType::Divider => (width_auto(80.0), styles([("color", json!("#d9d9d9"))])),
        BlockType::Spacer => (PercentSize::fixed(100.0, 10.0), Styles::new()),
        BlockType::Cover => (PercentSize::fixed(100.0, 100.0), Styles::new()),
        BlockType::Testimonial => (width_auto(50.0), styles([("fontStyle", json!("italic"))])),
        BlockType::Faq | BlockType::CallToAction => (width_auto(60.0), Styles::new()),
        BlockType::SocialLinks => (width_auto(30.0), Styles::new()),
        BlockType::PricingPackages => (width_auto(80.0), Styles::new()),
        BlockType::Shape => (
            PercentSize::fixed(20.0, 20.0),
            styles([("backgroundColor", json!("#e8e2d8"))]),
        ),
        BlockType::Icon => (width_auto(6.0), styles([("fontSize", json!(32))])),
        BlockType::Box => (
            PercentSize::fixed(30.0, 30.0),
            styles([
                ("backgroundColor", json!("#f5f5f5")),
                ("borderRadius", json!(8)),
            ]),
        ),
    };
    BlockTemplate {
        content: BlockContent::default_for(block_type),
        size,
        styles,
    }
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn clamp_position(position: PercentPosition) -> PercentPosition {
    PercentPosition::new(clamp_pct(position.x), clamp_pct(position.y))
}

fn offset(position: PercentPosition, offset_pct: f64) -> PercentPosition {
    clamp_position(PercentPosition::new(
        position.x + offset_pct,
        position.y + offset_pct,
    ))
}

/// Copy of `source` under a new id, nudged by `offset_pct` on both axes.
///
/// Per-viewport position overrides shift by the same amount so the copy is
/// visibly offset at every breakpoint.
#[must_use]
pub fn duplicate(source: &Block, id: BlockId, offset_pct: f64, z_index: i32) -> Block {
    let mut copy = source.clone();
    copy.id = id;
    copy.z_index = z_index;
    copy.position = offset(source.position, offset_pct);
    for layout in copy.layouts.values_mut() {
        if let Some(position) = layout.position.as_mut() {
            *position = offset(*position, offset_pct);
        }
    }
    copy
}
