#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `harness` ties the components together into the replay-and-compare loop.
//! A [`Session`] is opened from a [`HarnessConfig`], then cycles through
//!
//! ```text
//! ReadScript -> ReadClient -> ExchangeWithServer -> WriteClient -> Record -> Reset
//! ```
//!
//! until the script is exhausted or, when relaying live traffic, until an
//! iteration moves no data in either direction.
//!
//! # Design
//!
//! - **Scripted replay.** Each script record is the reference pair. A
//!   client's request is compared against the scripted request; the
//!   server's reply against the scripted response. Each comparison prints
//!   `OK` or `FAIL`.
//! - **Live relay.** Without a script, the client's block is forwarded to
//!   the server and the reply forwarded back. Blocks are delimited by the
//!   sure/settle timeouts of [`segment`].
//! - **Recording.** The effective pair of every cycle (the client's block if
//!   a client runs, else the scripted request; likewise for the response) is
//!   appended to the record target, so a live recording can be replayed as
//!   a script later.
//!
//! Every block of a cycle lives in one arena that is reset at the end of the
//! cycle. A [`Report`] tallies comparisons; its [`ExitCode`] is the number of
//! failures, while fatal errors map to the distinct codes documented on
//! [`ExitCode`].
//!
//! # Limitations
//!
//! Children are never killed. A program that stalls is only noticed through
//! the sure timeout, and one that ignores end-of-file outlives the harness.

mod config;
mod error;
mod exit;
mod report;
mod session;

use std::io::Write;

pub use config::{HarnessConfig, RecordTarget};
pub use error::{HarnessError, HarnessResult};
pub use exit::ExitCode;
pub use report::Report;
pub use session::{CycleState, Session};

/// Opens a session for `config` and runs it to completion.
pub fn run<O, E>(config: HarnessConfig, out: &mut O, err: &mut E) -> HarnessResult<Report>
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    Session::open(config)?.run(out, err)
}
