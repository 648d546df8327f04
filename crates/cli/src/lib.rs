#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the thin command-line front end of the harness. It parses the
//! flags with `clap`, installs logging, hands a [`HarnessConfig`] to
//! [`harness::run`], and turns the outcome into a process exit status.
//!
//! # Design
//!
//! [`run`] takes the argument list and the two output streams explicitly so
//! tests can drive the whole front end in memory. It never panics: parse and
//! configuration errors are printed to `stderr` and reported as
//! [`ExitCode::USAGE`]; harness errors use their own
//! [`HarnessError::exit_code`](harness::HarnessError::exit_code).
//!
//! Running with no arguments at all prints the help text and succeeds.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["bat", "-h"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("Usage: bat"));
//! ```

mod arguments;

use std::ffi::OsString;
use std::io::Write;

use harness::{ExitCode, HarnessConfig};
use logging::{Verbosity, VerbosityConfig};

use crate::arguments::parse_args;

const HELP_TEXT: &str = concat!(
    "Usage: bat [OPTIONS]\n",
    "\n",
    "Blackbox replay-and-compare harness for programs that talk over pipes.\n",
    "Replays a script of request/response records against a server and/or a\n",
    "client, or relays live traffic between them, printing OK or FAIL for each\n",
    "comparison. The exit status is the number of failed comparisons.\n",
    "\n",
    "Options:\n",
    "  -S, --server CMD        Start CMD as the server (split on whitespace).\n",
    "  -C, --client CMD        Start CMD as the client (split on whitespace).\n",
    "  -s, --script FILE       Replay the records in FILE.\n",
    "  -R, --record-stdout     Record the session to standard output.\n",
    "  -r, --record FILE       Record the session to FILE.\n",
    "  -t, --settle SEC.USEC   Silence that ends a block (default 0.1).\n",
    "  -T, --sure SEC.USEC     Wait for the first byte of a block (default 1.0).\n",
    "  -m, --memory BYTES      Arena size (default 1048576).\n",
    "  -c, --collapse FILE     Collapsible rules, one '<name> <regex>' per line.\n",
    "  -d, --diff              Dump expected and received blocks on failure.\n",
    "  -v, --verbose           Report progress on standard error.\n",
    "  -V, --trace             Trace every step on standard error.\n",
    "  -h, --help              Show this help message and exit.\n",
    "      --request-separator BYTES   Request sentinel (default '~>').\n",
    "      --response-separator BYTES  Response sentinel (default '<~').\n",
    "      --inherit-env       Start children with this environment instead of\n",
    "                          an empty one.\n",
    "\n",
    "Record format: <request sentinel><request><response sentinel><response>...\n",
    "The BAT_LOG environment variable overrides -v/-V with a filter directive.\n",
);

/// Runs the front end and returns the process exit status.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let arguments: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if arguments.len() <= 1 {
        return print_help(stdout);
    }

    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return ExitCode::USAGE.into();
        }
    };
    if parsed.show_help {
        return print_help(stdout);
    }

    let verbosity = Verbosity::from_flags(parsed.verbose, parsed.trace);
    logging::init_tracing(&VerbosityConfig::new(verbosity).with_env_override());

    let config: HarnessConfig = match parsed.into_config() {
        Ok(config) => config,
        Err(error) => {
            let _ = writeln!(stderr, "bat: {error}");
            return error.exit_code().into();
        }
    };

    match harness::run(config, stdout, stderr) {
        Ok(report) => report.exit_code().into(),
        Err(error) => {
            let _ = writeln!(stderr, "bat: {error}");
            error.exit_code().into()
        }
    }
}

fn print_help<W: Write>(stdout: &mut W) -> i32 {
    if stdout.write_all(HELP_TEXT.as_bytes()).is_err() {
        return ExitCode::IO.into();
    }
    0
}

/// Converts a status returned by [`run`] into an [`std::process::ExitCode`].
///
/// Statuses outside `0..=255`, negative ones included, become 255 so they
/// never read as success.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    std::process::ExitCode::from(u8::try_from(status).unwrap_or(u8::MAX))
}
