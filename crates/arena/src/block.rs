//! crates/arena/src/block.rs
//!
//! Block handles: value-type views into an [`Arena`](crate::Arena).

use std::ops::Range;

/// A `(offset, length)` view into the arena, tagged with the arena
/// generation it was carved from.
///
/// Blocks are `Copy` and never own their bytes. Resolve them with
/// [`Arena::bytes`](crate::Arena::bytes) while the producing cycle is still
/// running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    offset: usize,
    len: usize,
    generation: u64,
}

impl Block {
    pub(crate) const fn new(offset: usize, len: usize, generation: u64) -> Self {
        Self {
            offset,
            len,
            generation,
        }
    }

    /// Offset of the first byte within the arena region.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes in the block.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-length block.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset one past the last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Arena generation this block belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}
