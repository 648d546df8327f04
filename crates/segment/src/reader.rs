//! crates/segment/src/reader.rs
//!
//! Reads one silence-delimited block into an arena.

use std::io;

use arena::{Arena, ArenaError, Block};

use crate::error::SegmentResult;
use crate::readiness::Readable;
use crate::state::{ReadEvent, ReadState, SegmentEnd};
use crate::timeouts::Timeouts;

/// One block read from a live stream and the reason it ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Bytes of the block, stored in the arena passed to the reader.
    pub block: Block,
    /// Why reading stopped.
    pub end: SegmentEnd,
}

impl Segment {
    /// Returns `true` when the stream produced no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// Returns `true` when the stream reached end-of-file.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.end, SegmentEnd::Closed)
    }
}

/// Applies the sure/settle timeouts to a [`Readable`] source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockReader {
    timeouts: Timeouts,
}

impl BlockReader {
    /// Creates a reader with the given timeouts.
    #[must_use]
    pub const fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }

    /// Timeouts applied by this reader.
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Reads one block from `source` into the head of `arena`.
    ///
    /// The returned block is contiguous and may be empty. Bytes are appended
    /// with as many reads as the source needs; each wait after the first byte
    /// uses the settle timeout.
    ///
    /// A block may fill the arena exactly. The arena counts as exhausted only
    /// when the source still has bytes once no room is left.
    pub fn read_block<R>(&self, source: &mut R, arena: &mut Arena) -> SegmentResult<Segment>
    where
        R: Readable + ?Sized,
    {
        let start = arena.head();
        let mut state = ReadState::WaitingForFirstByte;

        while let Some(wait) = state.wait(&self.timeouts) {
            let event = if source.wait_readable(wait)? {
                let capacity = arena.capacity();
                let spare = arena.spare_mut();
                if spare.is_empty() {
                    // a full arena is fine as long as nothing more arrives
                    match source.read(&mut [0u8; 1]) {
                        Ok(0) => ReadEvent::Eof,
                        Ok(_) => {
                            return Err(ArenaError::Exhausted {
                                requested: 1,
                                remaining: 0,
                                capacity,
                            }
                            .into());
                        }
                        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                        Err(err) => return Err(err.into()),
                    }
                } else {
                    match source.read(spare) {
                        Ok(0) => ReadEvent::Eof,
                        Ok(n) => {
                            arena.commit(n)?;
                            ReadEvent::Data(n)
                        }
                        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                        Err(err) => return Err(err.into()),
                    }
                }
            } else {
                ReadEvent::TimedOut
            };
            tracing::trace!(target: "bat::segment", ?state, ?event, "step");
            state = state.step(event);
        }

        let block = arena.block_since(start);
        let end = state.end().unwrap_or(SegmentEnd::Closed);
        tracing::debug!(target: "bat::segment", len = block.len(), ?end, "block read");
        Ok(Segment { block, end })
    }
}
