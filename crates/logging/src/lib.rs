#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` maps the harness verbosity flags onto a `tracing` subscriber.
//! Every component logs through `tracing` macros under a `bat::*` target
//! (`bat::arena`, `bat::proc`, `bat::segment`, `bat::codec`,
//! `bat::collapse`, `bat::cycle`); this crate decides which of those events
//! reach the terminal.
//!
//! # Design
//!
//! - [`Verbosity`] is the level picked by the command line: warnings only by
//!   default, `-v` for progress, `-V` for a full trace.
//! - [`VerbosityConfig`] carries the level plus an optional raw filter
//!   directive taken from the `BAT_LOG` environment variable, which wins
//!   over the flags when it parses.
//! - [`init_tracing`] installs a formatter that writes to standard error, so
//!   standard output stays free for results and `-R` recordings.
//!
//! # Examples
//!
//! ```
//! use logging::{Verbosity, VerbosityConfig, build_filter};
//!
//! let config = VerbosityConfig::new(Verbosity::Verbose);
//! assert_eq!(build_filter(&config).to_string(), "info");
//! ```

mod config;
mod tracing_bridge;

pub use config::{LOG_ENV, Verbosity, VerbosityConfig};
pub use tracing_bridge::{build_filter, init_tracing};
