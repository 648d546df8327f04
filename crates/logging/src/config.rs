//! crates/logging/src/config.rs
//! Verbosity levels selected by the command line.

use std::env;

use tracing::level_filters::LevelFilter;

/// Environment variable holding a filter directive that overrides the flags.
pub const LOG_ENV: &str = "BAT_LOG";

/// How much the harness reports on standard error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only.
    #[default]
    Quiet,
    /// Progress: process starts, rule loading, the final summary (`-v`).
    Verbose,
    /// Every state transition and read (`-V`).
    Trace,
}

impl Verbosity {
    /// Picks the level from the two command-line switches. `-V` wins.
    #[must_use]
    pub const fn from_flags(verbose: bool, trace: bool) -> Self {
        match (verbose, trace) {
            (_, true) => Self::Trace,
            (true, false) => Self::Verbose,
            (false, false) => Self::Quiet,
        }
    }

    /// Maximum `tracing` level shown at this verbosity.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::WARN,
            Self::Verbose => LevelFilter::INFO,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Verbosity plus an optional raw filter override.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerbosityConfig {
    /// Level chosen by the flags.
    pub verbosity: Verbosity,
    /// `EnvFilter` directive that replaces the level when present.
    pub directive: Option<String>,
}

impl VerbosityConfig {
    /// Configuration for `verbosity` with no override.
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            directive: None,
        }
    }

    /// Sets an explicit filter directive such as `bat::segment=trace`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    /// Picks up [`LOG_ENV`] when it is set and non-empty.
    #[must_use]
    pub fn with_env_override(self) -> Self {
        match env::var(LOG_ENV) {
            Ok(directive) if !directive.trim().is_empty() => self.with_directive(directive),
            _ => self,
        }
    }
}
