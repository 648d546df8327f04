#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `segment` turns a live, unframed byte stream into blocks. The programs
//! under test speak protocols the harness does not understand, so a block
//! boundary is inferred from silence: once bytes start arriving, the block
//! lasts until the stream stays quiet for longer than the *settle* timeout
//! or reaches end-of-stream.
//!
//! # Design
//!
//! [`BlockReader::read_block`] drives a small [`ReadState`] machine:
//!
//! | State                 | Wait applied        | Ready + bytes | Ready + EOF     | Timeout          |
//! |-----------------------|---------------------|---------------|-----------------|------------------|
//! | `WaitingForFirstByte` | [`Timeouts::sure`]   | `Draining`    | `Done(Closed)`  | `Done(Silent)`   |
//! | `Draining`            | [`Timeouts::settle`] | `Draining`    | `Done(Closed)`  | `Done(Settled)`  |
//!
//! Waiting is done with `poll(2)` through [`poll_readable`]; sources plug in
//! by implementing [`Readable`]. Bytes are read straight into the spare
//! region of an [`Arena`](arena::Arena), so a block is never copied.
//!
//! Recording therefore pays the settle delay for every block, while replay
//! from a script never waits on it.
//!
//! # Errors
//!
//! [`SegmentError::Io`] covers readiness-wait and read failures;
//! [`SegmentError::Arena`] is returned when bytes keep arriving after the
//! arena is full. A sure-timeout with no data is *not* an error: it yields an
//! empty block with [`SegmentEnd::Silent`].

mod error;
mod reader;
mod readiness;
mod state;
mod timeouts;

pub use error::{SegmentError, SegmentResult};
pub use reader::{BlockReader, Segment};
pub use readiness::{Readable, poll_readable};
pub use state::{ReadEvent, ReadState, SegmentEnd};
pub use timeouts::Timeouts;
