//! crates/segment/src/timeouts.rs
//!
//! The sure/settle timeout pair and its `sec.usec` parser.

use std::time::Duration;

use crate::error::{SegmentError, SegmentResult};

/// The two waits that delimit a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    /// Wait for the first byte of a block.
    pub sure: Duration,
    /// Maximum gap between bytes of the same block.
    pub settle: Duration,
}

impl Timeouts {
    /// Default wait for the first byte (1 s).
    pub const DEFAULT_SURE: Duration = Duration::from_secs(1);
    /// Default inter-byte gap (100 ms).
    pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

    /// Creates a timeout pair.
    #[must_use]
    pub const fn new(sure: Duration, settle: Duration) -> Self {
        Self { sure, settle }
    }

    /// Replaces the sure timeout.
    #[must_use]
    pub const fn with_sure(mut self, sure: Duration) -> Self {
        self.sure = sure;
        self
    }

    /// Replaces the settle timeout.
    #[must_use]
    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Parses a `sec.usec` decimal such as `"0.25"`, `"1"` or `"2.000500"`.
    pub fn parse_duration(text: &str) -> SegmentResult<Duration> {
        let trimmed = text.trim();
        let seconds: f64 = trimmed
            .parse()
            .map_err(|_| SegmentError::InvalidTimeout(text.to_owned()))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(SegmentError::InvalidTimeout(text.to_owned()));
        }
        Duration::try_from_secs_f64(seconds).map_err(|_| SegmentError::InvalidTimeout(text.to_owned()))
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SURE, Self::DEFAULT_SETTLE)
    }
}
