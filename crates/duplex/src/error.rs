//! crates/duplex/src/error.rs
//!
//! Error types for spawning duplex children.

use std::io;

use thiserror::Error;

/// Result type for duplex process operations.
pub type DuplexResult<T> = Result<T, DuplexError>;

/// Errors that can occur while spawning or wiring a child process.
#[derive(Debug, Error)]
pub enum DuplexError {
    /// The command string contained no program name.
    #[error("empty command line")]
    EmptyCommand,
    /// Pipe creation or fork failed.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        /// Command as given by the user.
        command: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The child was spawned but one of its pipe ends is missing.
    #[error("child '{command}' has no {stream} pipe")]
    MissingPipe {
        /// Command as given by the user.
        command: String,
        /// Which standard stream was missing.
        stream: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn spawn_error_keeps_source() {
        let err = DuplexError::Spawn {
            command: "nope".to_owned(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("'nope'"));
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_pipe_names_stream() {
        let err = DuplexError::MissingPipe {
            command: "cat".to_owned(),
            stream: "stdout",
        };
        assert_eq!(err.to_string(), "child 'cat' has no stdout pipe");
    }
}
