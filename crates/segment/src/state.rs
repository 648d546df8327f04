//! crates/segment/src/state.rs
//!
//! The two-tier timeout state machine, kept free of I/O so each transition
//! can be tested on its own.

use std::time::Duration;

use crate::timeouts::Timeouts;

/// Why a block ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentEnd {
    /// Data arrived, then the stream stayed quiet past the settle timeout.
    Settled,
    /// The stream reached end-of-file.
    Closed,
    /// Nothing arrived within the sure timeout.
    Silent,
}

/// Observation fed into [`ReadState::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadEvent {
    /// The readiness wait expired.
    TimedOut,
    /// A read returned this many (non-zero) bytes.
    Data(usize),
    /// A read returned zero bytes.
    Eof,
}

/// Progress of one block read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadState {
    /// No byte of the block has arrived yet.
    WaitingForFirstByte,
    /// At least one byte arrived; more may follow.
    Draining,
    /// The block is complete.
    Done(SegmentEnd),
}

impl ReadState {
    /// How long to wait for readiness in this state, or `None` once done.
    #[must_use]
    pub const fn wait(self, timeouts: &Timeouts) -> Option<Duration> {
        match self {
            Self::WaitingForFirstByte => Some(timeouts.sure),
            Self::Draining => Some(timeouts.settle),
            Self::Done(_) => None,
        }
    }

    /// Applies one observation.
    #[must_use]
    pub const fn step(self, event: ReadEvent) -> Self {
        match (self, event) {
            (Self::Done(end), _) => Self::Done(end),
            (_, ReadEvent::Data(_)) => Self::Draining,
            (_, ReadEvent::Eof) => Self::Done(SegmentEnd::Closed),
            (Self::WaitingForFirstByte, ReadEvent::TimedOut) => Self::Done(SegmentEnd::Silent),
            (Self::Draining, ReadEvent::TimedOut) => Self::Done(SegmentEnd::Settled),
        }
    }

    /// Returns the end reason once the machine has finished.
    #[must_use]
    pub const fn end(self) -> Option<SegmentEnd> {
        match self {
            Self::Done(end) => Some(end),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wait_uses_sure_timeout_then_settle() {
        let timeouts = Timeouts::new(Duration::from_secs(1), Duration::from_millis(100));
        let state = ReadState::WaitingForFirstByte;
        assert_eq!(state.wait(&timeouts), Some(Duration::from_secs(1)));

        let state = state.step(ReadEvent::Data(3));
        assert_eq!(state, ReadState::Draining);
        assert_eq!(state.wait(&timeouts), Some(Duration::from_millis(100)));
    }

    #[test]
    fn silence_before_any_byte_is_silent() {
        let state = ReadState::WaitingForFirstByte.step(ReadEvent::TimedOut);
        assert_eq!(state.end(), Some(SegmentEnd::Silent));
    }

    #[test]
    fn silence_after_data_settles() {
        let state = ReadState::WaitingForFirstByte
            .step(ReadEvent::Data(1))
            .step(ReadEvent::Data(7))
            .step(ReadEvent::TimedOut);
        assert_eq!(state.end(), Some(SegmentEnd::Settled));
    }

    #[test]
    fn eof_closes_in_either_phase() {
        assert_eq!(
            ReadState::WaitingForFirstByte.step(ReadEvent::Eof).end(),
            Some(SegmentEnd::Closed)
        );
        assert_eq!(
            ReadState::Draining.step(ReadEvent::Eof).end(),
            Some(SegmentEnd::Closed)
        );
    }

    #[test]
    fn done_is_absorbing() {
        let done = ReadState::Done(SegmentEnd::Settled);
        assert_eq!(done.step(ReadEvent::Data(4)), done);
        assert_eq!(done.wait(&Timeouts::default()), None);
    }
}
