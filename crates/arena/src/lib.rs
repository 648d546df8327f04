#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `arena` provides the single memory region that backs every byte block the
//! harness handles during one request/response cycle. Blocks read from child
//! pipes, blocks decoded from a script, and the intermediate buffers produced
//! by normalization are all carved out of the same [`Arena`] by bumping a
//! `head` cursor. Nothing is ever freed individually: the orchestrator calls
//! [`Arena::reset`] once per cycle and the whole region becomes available
//! again.
//!
//! # Design
//!
//! The arena owns a fixed, pre-sized `Box<[u8]>`. The three cursors of the
//! classic bump allocator map onto it as follows:
//!
//! - `base` is offset `0`,
//! - `head` is [`Arena::head`], the next free offset,
//! - `tail` is [`Arena::capacity`], the capacity bound.
//!
//! A [`Block`] is a plain `(offset, length, generation)` value. It does not
//! borrow the arena, so the orchestrator can hold several blocks while it
//! keeps appending new ones. Access goes through [`Arena::bytes`], which
//! checks (in debug builds) that the block belongs to the current generation.
//! Every [`Arena::reset`] bumps the generation, so a block that survives a
//! reset is caught instead of silently reading bytes of the next cycle.
//!
//! # Invariants
//!
//! - `0 <= head <= capacity` at all times.
//! - Allocation never moves existing bytes; a [`Block`] stays valid until the
//!   next [`Arena::reset`] (or a [`Arena::truncate_to`] below its end).
//! - Overflow is reported as [`ArenaError::Exhausted`]; the arena never grows
//!   and never overwrites live data.
//!
//! # Examples
//!
//! ```
//! use arena::Arena;
//!
//! let mut arena = Arena::with_capacity(64);
//! let ping = arena.push(b"PING")?;
//! let pong = arena.push(b"PONG")?;
//!
//! assert_eq!(arena.bytes(ping), b"PING");
//! assert_eq!(arena.bytes(pong), b"PONG");
//! assert_eq!(arena.head(), 8);
//!
//! arena.reset();
//! assert_eq!(arena.head(), 0);
//! assert!(!arena.is_live(ping));
//! # Ok::<(), arena::ArenaError>(())
//! ```

mod block;
mod error;

pub use block::Block;
pub use error::{ArenaError, ArenaResult};

/// Default arena capacity (1 MiB), matching the harness `-m` default.
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// Bump allocator over one contiguous byte region.
///
/// See the [crate documentation](crate) for the lifetime rules of the blocks
/// it hands out.
#[derive(Debug)]
pub struct Arena {
    region: Box<[u8]>,
    head: usize,
    generation: u64,
}

impl Arena {
    /// Allocates a zeroed region of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            region: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            generation: 0,
        }
    }

    /// Total size of the region (the `tail` bound).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Offset of the next free byte.
    #[must_use]
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Bytes still available before the arena is exhausted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.region.len() - self.head
    }

    /// Current generation; incremented by every [`reset`](Self::reset).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Reserves the next `len` bytes, advances `head` and returns the new
    /// block together with a mutable view of its storage.
    pub fn alloc_into_head(&mut self, len: usize) -> ArenaResult<(Block, &mut [u8])> {
        self.ensure(len)?;
        let start = self.head;
        self.head += len;
        let block = Block::new(start, len, self.generation);
        Ok((block, &mut self.region[start..start + len]))
    }

    /// Copies `bytes` to the head of the arena.
    pub fn push(&mut self, bytes: &[u8]) -> ArenaResult<Block> {
        let (block, storage) = self.alloc_into_head(bytes.len())?;
        storage.copy_from_slice(bytes);
        Ok(block)
    }

    /// Unallocated storage between `head` and the capacity bound.
    ///
    /// Readers fill a prefix of this slice and then call
    /// [`commit`](Self::commit) with the number of bytes written.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.region[self.head..]
    }

    /// Advances `head` over `len` bytes previously written through
    /// [`spare_mut`](Self::spare_mut).
    pub fn commit(&mut self, len: usize) -> ArenaResult<()> {
        self.ensure(len)?;
        self.head += len;
        Ok(())
    }

    /// Returns the block spanning `start..head`.
    ///
    /// Used by readers that append in several steps: remember
    /// [`head`](Self::head) before the first write, then close the block once
    /// the data is complete.
    #[must_use]
    pub fn block_since(&self, start: usize) -> Block {
        debug_assert!(start <= self.head, "block start past arena head");
        Block::new(start, self.head - start, self.generation)
    }

    /// Releases every byte at or beyond `offset`.
    ///
    /// Blocks extending past `offset` must not be read afterwards. The
    /// session codec uses this to hand back bytes it scanned past a sentinel
    /// once they have been moved to its stash.
    pub fn truncate_to(&mut self, offset: usize) {
        debug_assert!(offset <= self.head, "truncate past arena head");
        self.head = offset.min(self.head);
    }

    /// Returns the bytes of `block`.
    ///
    /// In debug builds this panics when `block` was produced before the last
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn bytes(&self, block: Block) -> &[u8] {
        debug_assert!(
            self.is_live(block),
            "block {block:?} used after arena reset (generation {})",
            self.generation
        );
        &self.region[block.range()]
    }

    /// Reports whether `block` belongs to the current generation and lies
    /// below `head`.
    #[must_use]
    pub fn is_live(&self, block: Block) -> bool {
        block.generation() == self.generation && block.end() <= self.head
    }

    /// Rewinds `head` to the base of the region and invalidates all blocks.
    pub fn reset(&mut self) {
        tracing::trace!(target: "bat::arena", used = self.head, "arena reset");
        self.head = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    fn ensure(&self, len: usize) -> ArenaResult<()> {
        if len > self.remaining() {
            return Err(ArenaError::Exhausted {
                requested: len,
                remaining: self.remaining(),
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_without_overlap() {
        let mut arena = Arena::with_capacity(16);
        let a = arena.push(b"abc").unwrap();
        let b = arena.push(b"defg").unwrap();

        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 3);
        assert_eq!(arena.bytes(a), b"abc");
        assert_eq!(arena.bytes(b), b"defg");
        assert_eq!(arena.remaining(), 9);
    }

    #[test]
    fn overflow_is_reported_and_head_unchanged() {
        let mut arena = Arena::with_capacity(4);
        arena.push(b"abc").unwrap();

        let err = arena.push(b"de").unwrap_err();
        assert_eq!(
            err,
            ArenaError::Exhausted {
                requested: 2,
                remaining: 1,
                capacity: 4
            }
        );
        assert_eq!(arena.head(), 3);
    }

    #[test]
    fn exact_fit_is_allowed() {
        let mut arena = Arena::with_capacity(4);
        arena.push(b"abcd").unwrap();
        assert_eq!(arena.remaining(), 0);
        assert!(arena.spare_mut().is_empty());
    }

    #[test]
    fn spare_and_commit_build_a_block() {
        let mut arena = Arena::with_capacity(8);
        let start = arena.head();
        arena.spare_mut()[..2].copy_from_slice(b"hi");
        arena.commit(2).unwrap();
        arena.spare_mut()[..1].copy_from_slice(b"!");
        arena.commit(1).unwrap();

        let block = arena.block_since(start);
        assert_eq!(arena.bytes(block), b"hi!");
    }

    #[test]
    fn commit_beyond_capacity_fails() {
        let mut arena = Arena::with_capacity(2);
        assert!(arena.commit(3).is_err());
    }

    #[test]
    fn reset_invalidates_blocks() {
        let mut arena = Arena::with_capacity(8);
        let block = arena.push(b"old").unwrap();
        assert!(arena.is_live(block));

        arena.reset();
        assert!(!arena.is_live(block));
        assert_eq!(arena.generation(), 1);

        let fresh = arena.push(b"new").unwrap();
        assert_eq!(fresh.offset(), block.offset());
        assert!(arena.is_live(fresh));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "used after arena reset")]
    fn stale_block_access_panics_in_debug() {
        let mut arena = Arena::with_capacity(8);
        let block = arena.push(b"old").unwrap();
        arena.reset();
        let _ = arena.bytes(block);
    }

    #[test]
    fn truncate_releases_tail() {
        let mut arena = Arena::with_capacity(8);
        let keep = arena.push(b"ab").unwrap();
        arena.push(b"cdef").unwrap();
        arena.truncate_to(keep.end());

        assert_eq!(arena.head(), 2);
        let xy = arena.push(b"xy").unwrap();
        assert_eq!(arena.bytes(xy), b"xy");
    }

    #[test]
    fn empty_block_is_live_and_empty() {
        let mut arena = Arena::with_capacity(4);
        let empty = arena.push(b"").unwrap();
        assert!(empty.is_empty());
        assert!(arena.is_live(empty));
        assert_eq!(arena.bytes(empty), b"");
    }

    #[test]
    fn default_capacity_is_one_megabyte() {
        assert_eq!(Arena::default().capacity(), 1 << 20);
    }
}
