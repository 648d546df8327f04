//! crates/harness/src/exit.rs
//!
//! Process exit statuses.

/// Exit status of a harness run.
///
/// Statuses `1..=239` count failed comparisons; the codes above that range
/// identify fatal errors so automation can tell "the program under test
/// misbehaved" from "the harness could not run".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExitCode(u8);

impl ExitCode {
    /// Every comparison passed.
    pub const SUCCESS: Self = Self(0);
    /// Largest status used for a failure count.
    pub const MAX_FAILURES: Self = Self(239);
    /// The arena ran out of space.
    pub const ARENA_EXHAUSTED: Self = Self(247);
    /// Reading a child, the script or writing results failed.
    pub const IO: Self = Self(248);
    /// The record sink could not be opened or written.
    pub const RECORD: Self = Self(249);
    /// The script could not be opened.
    pub const SCRIPT: Self = Self(250);
    /// Sending a request to the server failed.
    pub const SERVER_WRITE: Self = Self(251);
    /// Bad command line or nothing to drive.
    pub const USAGE: Self = Self(252);
    /// Pipes or a process for the server could not be created.
    pub const SERVER_SPAWN: Self = Self(253);
    /// Pipes or a process for the client could not be created.
    pub const CLIENT_SPAWN: Self = Self(254);
    /// The rule file could not be opened or read.
    pub const RULES: Self = Self(255);

    /// Status for a run with `failures` failed comparisons, saturating at
    /// [`MAX_FAILURES`](Self::MAX_FAILURES).
    #[must_use]
    pub fn from_failures(failures: u64) -> Self {
        let capped = failures.min(u64::from(Self::MAX_FAILURES.0));
        Self(u8::try_from(capped).unwrap_or(Self::MAX_FAILURES.0))
    }

    /// Numeric status.
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Returns `true` for [`SUCCESS`](Self::SUCCESS).
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        Self::from(code.0)
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.0)
    }
}
