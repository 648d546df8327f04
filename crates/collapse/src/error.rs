//! crates/collapse/src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for rule loading.
pub type CollapseResult<T> = Result<T, CollapseError>;

/// Errors raised while building collapsible rules.
#[derive(Debug, Error)]
pub enum CollapseError {
    /// The rule file could not be opened.
    #[error("failed to open rule file '{}': {source}", path.display())]
    Open {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Reading the rule file failed part-way.
    #[error("failed to read rule file: {0}")]
    Io(#[from] io::Error),
    /// A pattern did not compile.
    #[error("rule '{name}' has an invalid pattern: {source}")]
    Pattern {
        /// Rule name.
        name: String,
        /// Compilation error from the regex engine.
        #[source]
        source: regex::Error,
    },
}
