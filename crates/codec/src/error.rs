//! crates/codec/src/error.rs
//!
//! Error types for session framing.

use std::io;

use arena::ArenaError;
use thiserror::Error;

/// Result type for session codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while reading or writing session records.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying stream failed.
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),
    /// A decoded payload did not fit in the arena.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// A sentinel was configured as an empty byte sequence.
    #[error("{which} separator must not be empty")]
    EmptySeparator {
        /// `"request"` or `"response"`.
        which: &'static str,
    },
    /// Both sentinels are the same byte sequence.
    #[error("request and response separators must differ (both are {0:?})")]
    IdenticalSeparators(String),
}
