#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `duplex` spawns the external programs the harness talks to. Each program
//! runs as a child process whose standard output is connected to a pipe the
//! harness reads ([`DuplexReader`]) and whose standard input is connected to a
//! pipe the harness writes ([`DuplexWriter`]). Standard error is inherited so
//! the child's own diagnostics reach the terminal untouched.
//!
//! # Design
//!
//! - [`CommandLine`] splits a command string on whitespace into a program and
//!   its arguments. There is no quoting or escaping: `"sh -c 'echo a'"`
//!   yields the four words `sh`, `-c`, `'echo`, `a'`. Commands that need
//!   shell syntax should point at a wrapper script.
//! - [`Environment`] makes the child's environment an explicit spawn
//!   parameter. The harness default is [`Environment::Cleared`] so runs are
//!   reproducible regardless of the caller's shell.
//! - [`DuplexProcess`] owns the child and both pipe ends. [`close`] drops the
//!   pipes exactly once; later calls are no-ops. The child is never killed:
//!   a stalled program is only ever observed through timeouts and EOF.
//!
//! # Errors
//!
//! Spawning fails with [`DuplexError::Spawn`] when the pipes cannot be
//! created or the fork fails. A program that cannot be executed (missing,
//! not executable, not a valid binary) is not an error for the caller: the
//! failure is logged and the process reads as end-of-file, while writes to
//! it fail with [`std::io::ErrorKind::BrokenPipe`]. See
//! [`DuplexProcess::exec_failed`].
//!
//! [`close`]: DuplexProcess::close

mod command;
mod error;
mod process;

pub use command::{CommandLine, Environment};
pub use error::{DuplexError, DuplexResult};
pub use process::{DuplexProcess, DuplexReader, DuplexWriter};
