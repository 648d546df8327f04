//! crates/codec/src/reader.rs
//!
//! Sentinel-framed decoding with a carry-over stash.

use std::io::{self, Read};

use arena::{Arena, ArenaError, Block};
use memchr::memmem;

use crate::error::CodecResult;
use crate::separators::Separators;
use crate::{CHUNK_SIZE, SessionRecord};

/// Decodes session records from a script stream into an arena.
#[derive(Debug)]
pub struct SessionReader<R> {
    inner: R,
    separators: Separators,
    stash: Vec<u8>,
    eof: bool,
    records: u64,
}

/// Result of scanning for one sentinel.
struct Scan {
    block: Block,
    found: bool,
}

impl<R: Read> SessionReader<R> {
    /// Wraps `inner`, expecting records framed by `separators`.
    pub fn new(inner: R, separators: Separators) -> Self {
        Self {
            inner,
            separators,
            stash: Vec::with_capacity(2 * CHUNK_SIZE),
            eof: false,
            records: 0,
        }
    }

    /// Number of records decoded so far.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Decodes the next record, or returns `None` at end of stream.
    ///
    /// Both blocks live in `arena` until its next reset. Bytes before the
    /// first request sentinel are discarded with a warning; a stream that
    /// ends between the two sentinels of a record yields an empty response.
    pub fn read_record(&mut self, arena: &mut Arena) -> CodecResult<Option<SessionRecord>> {
        let request_sep = self.separators.request().to_vec();
        let response_sep = self.separators.response().to_vec();

        let preamble = self.read_until(&request_sep, arena)?;
        arena.truncate_to(preamble.block.offset());
        if !preamble.block.is_empty() {
            tracing::warn!(
                target: "bat::codec",
                bytes = preamble.block.len(),
                "ignoring data outside of a request sentinel"
            );
        }
        if !preamble.found {
            return Ok(None);
        }
        self.consume_sentinel(request_sep.len());

        let request = self.read_until(&response_sep, arena)?;
        let response = if request.found {
            self.consume_sentinel(response_sep.len());
            self.read_until(&request_sep, arena)?.block
        } else {
            tracing::warn!(
                target: "bat::codec",
                record = self.records + 1,
                "session ended before the response sentinel; using an empty response"
            );
            arena.block_since(arena.head())
        };

        self.records += 1;
        tracing::trace!(
            target: "bat::codec",
            record = self.records,
            request = request.block.len(),
            response = response.len(),
            "record read"
        );
        Ok(Some(SessionRecord {
            request: request.block,
            response,
        }))
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Appends bytes to the arena until `delim` is found or the stream ends.
    ///
    /// On success the returned block stops right before `delim`; the
    /// sentinel and anything after it move to the stash.
    fn read_until(&mut self, delim: &[u8], arena: &mut Arena) -> CodecResult<Scan> {
        let start = arena.head();
        arena.push(&self.stash)?;
        self.stash.clear();

        let finder = memmem::Finder::new(delim);
        let mut scanned = start;
        loop {
            let head = arena.head();
            let window = arena.bytes(arena.block_since(scanned));
            if let Some(pos) = finder.find(window) {
                let at = scanned + pos;
                self.stash
                    .extend_from_slice(arena.bytes(arena.block_since(at)));
                arena.truncate_to(at);
                return Ok(Scan {
                    block: arena.block_since(start),
                    found: true,
                });
            }
            if self.eof {
                return Ok(Scan {
                    block: arena.block_since(start),
                    found: false,
                });
            }

            scanned = head.saturating_sub(delim.len() - 1).max(start);
            self.fill(arena)?;
        }
    }

    /// Reads one chunk from the stream into the arena head.
    fn fill(&mut self, arena: &mut Arena) -> CodecResult<()> {
        let capacity = arena.capacity();
        let spare = arena.spare_mut();
        if spare.is_empty() {
            return Err(ArenaError::Exhausted {
                requested: 1,
                remaining: 0,
                capacity,
            }
            .into());
        }
        let take = spare.len().min(CHUNK_SIZE);
        loop {
            match self.inner.read(&mut spare[..take]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    arena.commit(n)?;
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn consume_sentinel(&mut self, len: usize) {
        debug_assert!(self.stash.len() >= len, "stash does not start with a sentinel");
        self.stash.drain(..len.min(self.stash.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn decode(reader: &mut SessionReader<impl Read>, arena: &mut Arena) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut out = Vec::new();
        while let Some(record) = reader.read_record(arena).unwrap() {
            out.push((
                arena.bytes(record.request).to_vec(),
                arena.bytes(record.response).to_vec(),
            ));
        }
        out
    }

    #[test]
    fn sentinels_split_across_reads_are_found() {
        let data = b"~>hello<~world~>again<~there";
        for step in 1..=4 {
            let mut arena = Arena::with_capacity(128);
            let mut reader = SessionReader::new(Trickle { data, step }, Separators::default());
            let records = decode(&mut reader, &mut arena);
            assert_eq!(
                records,
                vec![
                    (b"hello".to_vec(), b"world".to_vec()),
                    (b"again".to_vec(), b"there".to_vec()),
                ],
                "step {step}"
            );
        }
    }

    #[test]
    fn empty_blocks_are_not_end_of_stream() {
        let mut arena = Arena::with_capacity(64);
        let mut reader = SessionReader::new(&b"~><~~><~~>x<~"[..], Separators::default());
        let records = decode(&mut reader, &mut arena);
        assert_eq!(
            records,
            vec![
                (Vec::new(), Vec::new()),
                (Vec::new(), Vec::new()),
                (b"x".to_vec(), Vec::new()),
            ]
        );
        assert_eq!(reader.records(), 3);
    }

    #[test]
    fn preamble_is_discarded() {
        let mut arena = Arena::with_capacity(64);
        let mut reader = SessionReader::new(&b"junk~>a<~b"[..], Separators::default());
        let record = reader.read_record(&mut arena).unwrap().unwrap();
        assert_eq!(arena.bytes(record.request), b"a");
        assert_eq!(record.request.offset(), 0);
    }

    #[test]
    fn missing_response_sentinel_yields_empty_response() {
        let mut arena = Arena::with_capacity(64);
        let mut reader = SessionReader::new(&b"~>only request"[..], Separators::default());
        let record = reader.read_record(&mut arena).unwrap().unwrap();
        assert_eq!(arena.bytes(record.request), b"only request");
        assert!(record.response.is_empty());
        assert!(reader.read_record(&mut arena).unwrap().is_none());
    }

    #[test]
    fn empty_stream_has_no_records() {
        let mut arena = Arena::with_capacity(16);
        let mut reader = SessionReader::new(io::empty(), Separators::default());
        assert!(reader.read_record(&mut arena).unwrap().is_none());
        assert_eq!(arena.head(), 0);
    }

    #[test]
    fn blocks_stay_valid_while_reading_the_next_field() {
        let mut arena = Arena::with_capacity(64);
        let mut reader = SessionReader::new(&b"~>ab<~cd~>ef<~gh"[..], Separators::default());
        let first = reader.read_record(&mut arena).unwrap().unwrap();
        let second = reader.read_record(&mut arena).unwrap().unwrap();
        assert_eq!(arena.bytes(first.request), b"ab");
        assert_eq!(arena.bytes(first.response), b"cd");
        assert_eq!(arena.bytes(second.request), b"ef");
        assert_eq!(arena.bytes(second.response), b"gh");
    }

    #[test]
    fn oversized_script_exhausts_arena() {
        let mut arena = Arena::with_capacity(8);
        let mut reader = SessionReader::new(&b"~>0123456789<~"[..], Separators::default());
        assert!(matches!(
            reader.read_record(&mut arena),
            Err(crate::CodecError::Arena(_))
        ));
    }
}
