#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `codec` reads and writes the session format shared by replay scripts and
//! recordings. A session is a flat sequence of records, each serialized as
//!
//! ```text
//! <request sentinel><request bytes><response sentinel><response bytes>
//! ```
//!
//! with `~>` and `<~` as the default sentinels. There are no length
//! prefixes, so a recording is itself a valid script.
//!
//! # Design
//!
//! [`SessionReader`] decodes straight into an [`Arena`](arena::Arena). It
//! reads the underlying stream in fixed-size chunks, scanning with
//! `memchr::memmem` after each chunk and re-checking the last
//! `sentinel.len() - 1` bytes of the previous chunk so a sentinel split
//! across two reads is still found. Bytes read past a sentinel are handed
//! back to the arena and kept in a small stash for the next call.
//!
//! [`SessionWriter`] emits one record per call and flushes, so a partially
//! recorded session is still replayable up to the last complete record.
//!
//! # Invariants
//!
//! - An empty request or response is a zero-length block, never end of
//!   stream.
//! - Payload bytes must not contain a sentinel; the format has no escaping.
//!
//! # Examples
//!
//! ```
//! use arena::Arena;
//! use codec::{SessionReader, SessionWriter, Separators};
//!
//! let mut recorded = Vec::new();
//! let mut writer = SessionWriter::new(&mut recorded, Separators::default());
//! writer.write_record(b"PING", b"PONG")?;
//! writer.write_record(b"", b"BYE")?;
//! assert_eq!(recorded, b"~>PING<~PONG~><~BYE");
//!
//! let mut arena = Arena::with_capacity(256);
//! let mut reader = SessionReader::new(recorded.as_slice(), Separators::default());
//! let first = reader.read_record(&mut arena)?.expect("first record");
//! assert_eq!(arena.bytes(first.request), b"PING");
//! assert_eq!(arena.bytes(first.response), b"PONG");
//! let second = reader.read_record(&mut arena)?.expect("second record");
//! assert!(second.request.is_empty());
//! assert!(reader.read_record(&mut arena)?.is_none());
//! # Ok::<(), codec::CodecError>(())
//! ```

mod error;
mod reader;
mod separators;
mod writer;

use arena::Block;

pub use error::{CodecError, CodecResult};
pub use reader::SessionReader;
pub use separators::Separators;
pub use writer::SessionWriter;

/// Size of each read issued against the underlying session stream.
pub const CHUNK_SIZE: usize = 4096;

/// One request/response pair decoded from a session stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    /// Request payload, without its sentinel.
    pub request: Block,
    /// Response payload, without its sentinel.
    pub response: Block,
}
