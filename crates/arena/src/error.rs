//! crates/arena/src/error.rs
//!
//! Error types for arena allocation.

use thiserror::Error;

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Errors raised by [`Arena`](crate::Arena).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArenaError {
    /// An allocation would move `head` past the capacity bound.
    #[error("arena exhausted: requested {requested} bytes, {remaining} of {capacity} left")]
    Exhausted {
        /// Bytes requested by the failing call.
        requested: usize,
        /// Bytes that were still free.
        remaining: usize,
        /// Total arena capacity.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_names_sizes() {
        let err = ArenaError::Exhausted {
            requested: 10,
            remaining: 3,
            capacity: 64,
        };
        let text = err.to_string();
        assert!(text.contains("requested 10"));
        assert!(text.contains("3 of 64"));
    }
}
