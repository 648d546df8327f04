//! crates/duplex/src/command.rs
//!
//! Command-line splitting and environment policy for spawned children.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;
use std::str::FromStr;

use crate::error::{DuplexError, DuplexResult};

/// Environment handed to a spawned child.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// Start the child with an empty environment.
    #[default]
    Cleared,
    /// Let the child inherit the harness environment.
    Inherited,
}

/// A program plus its argument list, split on whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Splits `line` on runs of whitespace.
    ///
    /// The first word names the program, the rest become its arguments.
    /// Quotes and backslashes have no special meaning.
    pub fn parse(line: &str) -> DuplexResult<Self> {
        let mut words = line.split_whitespace();
        let program = words.next().ok_or(DuplexError::EmptyCommand)?;
        Ok(Self {
            program: OsString::from(program),
            args: words.map(OsString::from).collect(),
        })
    }

    /// Program name or path.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments following the program.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub(crate) fn to_command(&self, environment: Environment) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if environment == Environment::Cleared {
            command.env_clear();
        }
        command
    }
}

impl FromStr for CommandLine {
    type Err = DuplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &CommandLine) -> Vec<String> {
        line.args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn splits_program_and_arguments() {
        let line = CommandLine::parse("cat -u").unwrap();
        assert_eq!(line.program(), "cat");
        assert_eq!(words(&line), vec!["-u"]);
    }

    #[test]
    fn collapses_repeated_whitespace() {
        let line = CommandLine::parse("  server\t--port   8080 \n").unwrap();
        assert_eq!(line.program(), "server");
        assert_eq!(words(&line), vec!["--port", "8080"]);
    }

    #[test]
    fn quotes_are_not_interpreted() {
        let line = CommandLine::parse("sh -c 'echo hi'").unwrap();
        assert_eq!(words(&line), vec!["-c", "'echo", "hi'"]);
    }

    #[test]
    fn blank_command_is_rejected() {
        assert!(matches!(
            CommandLine::parse("   "),
            Err(DuplexError::EmptyCommand)
        ));
    }

    #[test]
    fn display_rejoins_words() {
        let line: CommandLine = "echo  a   b".parse().unwrap();
        assert_eq!(line.to_string(), "echo a b");
    }

    #[test]
    fn cleared_is_the_default_environment() {
        assert_eq!(Environment::default(), Environment::Cleared);
    }
}
