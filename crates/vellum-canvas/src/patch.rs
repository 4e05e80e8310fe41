//! Viewport-aware block updates.
//!
//! A [`BlockPatch`] carries whole-field replacements. Geometry keys
//! (`position`, `size`, `visible`, `styles`) land on the base fields when the
//! viewport is desktop and in `layouts[viewport]` otherwise; every other key
//! always writes the base field. The same patch value is handed to the host
//! so the mutation path stays auditable.

use serde::{Deserialize, Deserializer, Serialize};

use crate::content::BlockContent;
use crate::document::{Animation, Block, PercentPosition, PercentSize, Styles, Viewport};

/// Whole-field replacements for one block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PercentPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PercentSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
    /// `Some(None)` clears the animation; on the wire that is an explicit
    /// `null`, while an absent key leaves it untouched.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub animation: Option<Option<Animation>>,
}

/// Any present value, `null` included, becomes `Some`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl BlockPatch {
    #[must_use]
    pub fn position(position: PercentPosition) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn size(size: PercentSize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn z_index(z_index: i32) -> Self {
        Self {
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn content(content: BlockContent) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to `block` for `viewport`.
    ///
    /// A `content` replacement whose type differs from the block's current
    /// type is ignored; a block never changes type in place.
    pub fn apply(&self, block: &mut Block, viewport: Viewport) {
        if viewport.is_base() {
            if let Some(position) = self.position {
                block.position = position;
            }
            if let Some(size) = self.size {
                block.size = size;
            }
            if let Some(visible) = self.visible {
                block.visible = visible;
            }
            if let Some(styles) = &self.styles {
                block.styles = styles.clone();
            }
        } else if self.position.is_some()
            || self.size.is_some()
            || self.visible.is_some()
            || self.styles.is_some()
        {
            let layout = block.layout_mut(viewport);
            if let Some(position) = self.position {
                layout.position = Some(position);
            }
            if let Some(size) = self.size {
                layout.size = Some(size);
            }
            if let Some(visible) = self.visible {
                layout.visible = Some(visible);
            }
            if let Some(styles) = &self.styles {
                layout.styles = Some(styles.clone());
            }
        }

        if let Some(z_index) = self.z_index {
            block.z_index = z_index;
        }
        if let Some(locked) = self.locked {
            block.locked = locked;
        }
        if let Some(content) = &self.content
            && content.block_type() == block.block_type()
        {
            block.content = content.clone();
        }
        if let Some(animation) = self.animation {
            block.animation = animation;
        }
    }
}
