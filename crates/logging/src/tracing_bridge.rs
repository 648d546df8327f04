//! crates/logging/src/tracing_bridge.rs
//! Installs the stderr subscriber for a [`VerbosityConfig`].

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::VerbosityConfig;

/// Builds the event filter for `config`.
///
/// A directive that fails to parse is ignored and the flag level is used.
#[must_use]
pub fn build_filter(config: &VerbosityConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(config.verbosity.level_filter().to_string());
    match config.directive.as_deref() {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

/// Installs a global subscriber that writes formatted events to stderr.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
pub fn init_tracing(config: &VerbosityConfig) -> bool {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .without_time();

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(layer)
        .try_init()
        .is_ok()
}
