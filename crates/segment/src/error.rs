//! crates/segment/src/error.rs

use std::io;

use arena::ArenaError;
use thiserror::Error;

/// Result type for block segmentation.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors raised while reading a block from a live stream.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// Waiting for readiness or reading failed.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// Data was ready but the arena had no room left for it.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// A timeout string could not be parsed as non-negative seconds.
    #[error("invalid timeout '{0}': expected seconds such as 0.1 or 2.5")]
    InvalidTimeout(String),
}
