//! crates/harness/src/config.rs
//!
//! The explicit context a session is built from.

use std::path::{Path, PathBuf};

use codec::Separators;
use duplex::{CommandLine, Environment};
use segment::Timeouts;

use crate::error::{HarnessError, HarnessResult};

/// Where exchanged records are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RecordTarget {
    /// Recording is off.
    #[default]
    None,
    /// Records go to standard output.
    Stdout,
    /// Records go to a file, truncated first.
    File(PathBuf),
}

impl RecordTarget {
    /// Returns `true` unless recording is off.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Everything a [`Session`](crate::Session) needs, gathered in one value.
///
/// Built with [`HarnessConfig::new`] and the `with_*` methods, then checked
/// with [`validate`](Self::validate).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use duplex::CommandLine;
/// use harness::HarnessConfig;
///
/// let config = HarnessConfig::new()
///     .with_server(CommandLine::parse("cat")?)
///     .with_script("session.bat")
///     .with_settle(Duration::from_millis(50));
/// assert!(config.validate().is_ok());
/// assert!(HarnessConfig::new().validate().is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    server: Option<CommandLine>,
    client: Option<CommandLine>,
    script: Option<PathBuf>,
    record: RecordTarget,
    rules: Option<PathBuf>,
    timeouts: Timeouts,
    arena_capacity: usize,
    separators: Separators,
    dump_diff: bool,
    environment: Environment,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HarnessConfig {
    /// Configuration with no processes, no script and default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self {
            server: None,
            client: None,
            script: None,
            record: RecordTarget::None,
            rules: None,
            timeouts: Timeouts::default(),
            arena_capacity: arena::DEFAULT_CAPACITY,
            separators: Separators::default(),
            dump_diff: false,
            environment: Environment::Cleared,
        }
    }

    /// Sets the server command.
    #[must_use]
    pub fn with_server(mut self, command: CommandLine) -> Self {
        self.server = Some(command);
        self
    }

    /// Sets the client command.
    #[must_use]
    pub fn with_client(mut self, command: CommandLine) -> Self {
        self.client = Some(command);
        self
    }

    /// Sets the script to replay.
    #[must_use]
    pub fn with_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.script = Some(path.into());
        self
    }

    /// Sets the record target.
    #[must_use]
    pub fn with_record(mut self, target: RecordTarget) -> Self {
        self.record = target;
        self
    }

    /// Sets the collapsible rule file.
    #[must_use]
    pub fn with_rules(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules = Some(path.into());
        self
    }

    /// Replaces both timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Sets the wait for the first byte of a block.
    #[must_use]
    pub const fn with_sure(mut self, sure: std::time::Duration) -> Self {
        self.timeouts = self.timeouts.with_sure(sure);
        self
    }

    /// Sets the inter-byte gap that ends a block.
    #[must_use]
    pub const fn with_settle(mut self, settle: std::time::Duration) -> Self {
        self.timeouts = self.timeouts.with_settle(settle);
        self
    }

    /// Sets the arena size in bytes.
    #[must_use]
    pub const fn with_arena_capacity(mut self, bytes: usize) -> Self {
        self.arena_capacity = bytes;
        self
    }

    /// Sets the record sentinels.
    #[must_use]
    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }

    /// Dumps normalized expected and received bytes on failure.
    #[must_use]
    pub const fn with_dump_diff(mut self, dump: bool) -> Self {
        self.dump_diff = dump;
        self
    }

    /// Sets the environment children are started with.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Server command, if any.
    #[must_use]
    pub const fn server(&self) -> Option<&CommandLine> {
        self.server.as_ref()
    }

    /// Client command, if any.
    #[must_use]
    pub const fn client(&self) -> Option<&CommandLine> {
        self.client.as_ref()
    }

    /// Script path, if any.
    #[must_use]
    pub fn script(&self) -> Option<&Path> {
        self.script.as_deref()
    }

    /// Record target.
    #[must_use]
    pub const fn record(&self) -> &RecordTarget {
        &self.record
    }

    /// Rule file path, if any.
    #[must_use]
    pub fn rules(&self) -> Option<&Path> {
        self.rules.as_deref()
    }

    /// Block timeouts.
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Arena size in bytes.
    #[must_use]
    pub const fn arena_capacity(&self) -> usize {
        self.arena_capacity
    }

    /// Record sentinels.
    #[must_use]
    pub const fn separators(&self) -> &Separators {
        &self.separators
    }

    /// Whether mismatches are dumped.
    #[must_use]
    pub const fn dump_diff(&self) -> bool {
        self.dump_diff
    }

    /// Environment given to children.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns `true` when a script drives the session.
    #[must_use]
    pub const fn is_scripted(&self) -> bool {
        self.script.is_some()
    }

    /// Checks that the configuration can drive a session.
    ///
    /// A session needs a script, or both a client and a server to relay
    /// between.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.script.is_none() && (self.client.is_none() || self.server.is_none()) {
            return Err(HarnessError::Usage(
                "need a script (-s) or both a client (-C) and a server (-S)".to_owned(),
            ));
        }
        if self.arena_capacity == 0 {
            return Err(HarnessError::Usage("arena size must be positive".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cat() -> CommandLine {
        CommandLine::parse("cat").unwrap()
    }

    #[test]
    fn defaults_follow_documented_values() {
        let config = HarnessConfig::default();
        assert_eq!(config.timeouts(), Timeouts::default());
        assert_eq!(config.arena_capacity(), 1 << 20);
        assert_eq!(config.separators(), &Separators::default());
        assert_eq!(config.environment(), Environment::Cleared);
        assert_eq!(config.record(), &RecordTarget::None);
        assert!(!config.dump_diff());
    }

    #[test]
    fn live_mode_needs_both_processes() {
        assert!(HarnessConfig::new().with_client(cat()).validate().is_err());
        assert!(HarnessConfig::new().with_server(cat()).validate().is_err());
        assert!(
            HarnessConfig::new()
                .with_client(cat())
                .with_server(cat())
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn script_alone_is_enough() {
        let config = HarnessConfig::new().with_script("x.bat");
        assert!(config.validate().is_ok());
        assert!(config.is_scripted());
    }

    #[test]
    fn zero_arena_is_rejected() {
        let config = HarnessConfig::new().with_script("x.bat").with_arena_capacity(0);
        assert!(matches!(config.validate(), Err(HarnessError::Usage(_))));
    }

    #[test]
    fn timeout_builders_touch_one_side() {
        let config = HarnessConfig::new()
            .with_sure(Duration::from_millis(400))
            .with_settle(Duration::from_millis(40));
        assert_eq!(config.timeouts().sure, Duration::from_millis(400));
        assert_eq!(config.timeouts().settle, Duration::from_millis(40));
    }

    #[test]
    fn record_target_enabled_flag() {
        assert!(!RecordTarget::None.is_enabled());
        assert!(RecordTarget::Stdout.is_enabled());
        assert!(RecordTarget::File(PathBuf::from("out.bat")).is_enabled());
    }
}
