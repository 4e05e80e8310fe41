//! Stable identifiers for sections and blocks.
//!
//! `0` is reserved/invalid so IDs are always non-zero. IDs serialize as bare
//! integers so documents stay readable when the host stores them as JSON, and
//! a `0` in loaded data fails deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentError};

/// Stable identifier for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SectionId(u64);

/// Stable identifier for a block. Unique across the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BlockId(u64);

macro_rules! impl_id {
    ($name:ident, $zero:ident, $overflow:ident) => {
        impl $name {
            /// Lowest valid ID.
            pub const MIN: Self = Self(1);

            /// Create a new ID, rejecting 0.
            pub fn new(raw: u64) -> Result<Self, DocumentError> {
                if raw == 0 {
                    return Err(DocumentError::$zero);
                }
                Ok(Self(raw))
            }

            /// Get the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Return the next ID, or an error on overflow.
            pub fn checked_next(self) -> Result<Self, DocumentError> {
                let Some(next) = self.0.checked_add(1) else {
                    return Err(DocumentError::$overflow);
                };
                Self::new(next)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = DocumentError;

            fn try_from(raw: u64) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::MIN
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(SectionId, ZeroSectionId, IdOverflow);
impl_id!(BlockId, ZeroBlockId, IdOverflow);

/// Deterministic allocator for new block IDs.
///
/// Seeded past the highest ID present in a document so freshly minted IDs
/// never collide with loaded ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_block: BlockId,
}

impl IdAllocator {
    /// Create an allocator that will not reuse any ID present in `document`.
    pub fn for_document(document: &Document) -> Result<Self, DocumentError> {
        let next_block = match document.blocks_iter().map(|block| block.id).max() {
            Some(max) => max.checked_next()?,
            None => BlockId::MIN,
        };
        Ok(Self { next_block })
    }

    /// Allocate the next block ID and advance.
    pub fn allocate_block(&mut self) -> Result<BlockId, DocumentError> {
        let current = self.next_block;
        self.next_block = self.next_block.checked_next()?;
        Ok(current)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_block: BlockId::MIN,
        }
    }
}
