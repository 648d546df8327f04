//! crates/cli/src/arguments.rs
//!
//! Flag definitions and their translation into a [`HarnessConfig`].

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};
use codec::Separators;
use duplex::{CommandLine, Environment};
use harness::{HarnessConfig, HarnessError, HarnessResult, RecordTarget};
use segment::Timeouts;

/// Flags as given on the command line, before validation.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) server: Option<String>,
    pub(crate) client: Option<String>,
    pub(crate) script: Option<PathBuf>,
    pub(crate) record_stdout: bool,
    pub(crate) record: Option<PathBuf>,
    pub(crate) settle: Option<String>,
    pub(crate) sure: Option<String>,
    pub(crate) memory: Option<usize>,
    pub(crate) collapse: Option<PathBuf>,
    pub(crate) diff: bool,
    pub(crate) verbose: bool,
    pub(crate) trace: bool,
    pub(crate) request_separator: Option<String>,
    pub(crate) response_separator: Option<String>,
    pub(crate) inherit_env: bool,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("bat")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .short('S')
                .value_name("CMD")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("client")
                .long("client")
                .short('C')
                .value_name("CMD")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("script")
                .long("script")
                .short('s')
                .value_name("FILE")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("record-stdout")
                .long("record-stdout")
                .short('R')
                .conflicts_with("record")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("record")
                .long("record")
                .short('r')
                .value_name("FILE")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("settle")
                .long("settle")
                .short('t')
                .value_name("SEC.USEC")
                .allow_hyphen_values(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("sure")
                .long("sure")
                .short('T')
                .value_name("SEC.USEC")
                .allow_hyphen_values(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .short('m')
                .value_name("BYTES")
                .value_parser(value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("collapse")
                .long("collapse")
                .short('c')
                .value_name("FILE")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(Arg::new("diff").long("diff").short('d').action(ArgAction::SetTrue))
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("trace").long("trace").short('V').action(ArgAction::SetTrue))
        .arg(
            Arg::new("request-separator")
                .long("request-separator")
                .value_name("BYTES")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("response-separator")
                .long("response-separator")
                .value_name("BYTES")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("inherit-env")
                .long("inherit-env")
                .action(ArgAction::SetTrue),
        )
}

/// Parses `args` (program name first) into [`ParsedArgs`].
pub(crate) fn parse_args<I, S>(args: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut matches = clap_command().try_get_matches_from(args)?;
    let path = |value: Option<OsString>| value.map(PathBuf::from);

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        server: matches.remove_one::<String>("server"),
        client: matches.remove_one::<String>("client"),
        script: path(matches.remove_one::<OsString>("script")),
        record_stdout: matches.get_flag("record-stdout"),
        record: path(matches.remove_one::<OsString>("record")),
        settle: matches.remove_one::<String>("settle"),
        sure: matches.remove_one::<String>("sure"),
        memory: matches.remove_one::<usize>("memory"),
        collapse: path(matches.remove_one::<OsString>("collapse")),
        diff: matches.get_flag("diff"),
        verbose: matches.get_flag("verbose"),
        trace: matches.get_flag("trace"),
        request_separator: matches.remove_one::<String>("request-separator"),
        response_separator: matches.remove_one::<String>("response-separator"),
        inherit_env: matches.get_flag("inherit-env"),
    })
}

fn usage(message: impl std::fmt::Display) -> HarnessError {
    HarnessError::Usage(message.to_string())
}

fn timeout(flag: char, value: &str) -> HarnessResult<std::time::Duration> {
    Timeouts::parse_duration(value).map_err(|err| usage(format_args!("-{flag}: {err}")))
}

impl ParsedArgs {
    /// Turns the flags into a validated configuration.
    pub(crate) fn into_config(self) -> HarnessResult<HarnessConfig> {
        let mut config = HarnessConfig::new()
            .with_dump_diff(self.diff)
            .with_environment(if self.inherit_env {
                Environment::Inherited
            } else {
                Environment::Cleared
            });

        if let Some(server) = self.server.as_deref() {
            let command = CommandLine::parse(server).map_err(|err| usage(format_args!("-S: {err}")))?;
            config = config.with_server(command);
        }
        if let Some(client) = self.client.as_deref() {
            let command = CommandLine::parse(client).map_err(|err| usage(format_args!("-C: {err}")))?;
            config = config.with_client(command);
        }
        if let Some(script) = self.script {
            config = config.with_script(script);
        }
        if let Some(record) = self.record {
            config = config.with_record(RecordTarget::File(record));
        } else if self.record_stdout {
            config = config.with_record(RecordTarget::Stdout);
        }
        if let Some(settle) = self.settle.as_deref() {
            config = config.with_settle(timeout('t', settle)?);
        }
        if let Some(sure) = self.sure.as_deref() {
            config = config.with_sure(timeout('T', sure)?);
        }
        if let Some(memory) = self.memory {
            config = config.with_arena_capacity(memory);
        }
        if let Some(rules) = self.collapse {
            config = config.with_rules(rules);
        }
        if self.request_separator.is_some() || self.response_separator.is_some() {
            let request = self
                .request_separator
                .map_or_else(|| Separators::DEFAULT_REQUEST.to_vec(), String::into_bytes);
            let response = self
                .response_separator
                .map_or_else(|| Separators::DEFAULT_RESPONSE.to_vec(), String::into_bytes);
            config = config.with_separators(Separators::new(request, response).map_err(usage)?);
        }

        config.validate()?;
        Ok(config)
    }
}
