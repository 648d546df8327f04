//! crates/harness/src/error.rs
//!
//! Fatal harness errors and their exit statuses.

use std::io;
use std::path::PathBuf;

use codec::CodecError;
use collapse::CollapseError;
use duplex::DuplexError;
use segment::SegmentError;
use thiserror::Error;

use crate::exit::ExitCode;

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Conditions that stop a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The configuration cannot drive a session.
    #[error("usage: {0}")]
    Usage(String),
    /// The rule file could not be loaded.
    #[error(transparent)]
    Rules(CollapseError),
    /// The script could not be opened.
    #[error("can't open script '{}': {source}", path.display())]
    ScriptOpen {
        /// Script path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The record sink could not be opened.
    #[error("can't open record '{}': {source}", path.display())]
    RecordOpen {
        /// Record path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Writing a record failed.
    #[error("recording failed: {0}")]
    RecordWrite(#[source] CodecError),
    /// Pipes or a process for the server could not be created.
    #[error("server: {0}")]
    ServerSpawn(#[source] DuplexError),
    /// Pipes or a process for the client could not be created.
    #[error("client: {0}")]
    ClientSpawn(#[source] DuplexError),
    /// A request could not be delivered to the server.
    #[error("server write fails: {0}")]
    ServerWrite(#[source] io::Error),
    /// Reading from a child failed.
    #[error(transparent)]
    Read(#[from] SegmentError),
    /// Decoding the script failed.
    #[error("script: {0}")]
    Script(#[source] CodecError),
    /// Writing results or diagnostics failed.
    #[error("output failed: {0}")]
    Output(#[source] io::Error),
}

impl HarnessError {
    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) => ExitCode::USAGE,
            Self::Rules(_) => ExitCode::RULES,
            Self::ScriptOpen { .. } => ExitCode::SCRIPT,
            Self::RecordOpen { .. } | Self::RecordWrite(_) => ExitCode::RECORD,
            Self::ServerSpawn(_) => ExitCode::SERVER_SPAWN,
            Self::ClientSpawn(_) => ExitCode::CLIENT_SPAWN,
            Self::ServerWrite(_) => ExitCode::SERVER_WRITE,
            Self::Read(SegmentError::Arena(_)) | Self::Script(CodecError::Arena(_)) => {
                ExitCode::ARENA_EXHAUSTED
            }
            Self::Read(SegmentError::InvalidTimeout(_)) => ExitCode::USAGE,
            Self::Read(_) | Self::Script(_) | Self::Output(_) => ExitCode::IO,
        }
    }
}
