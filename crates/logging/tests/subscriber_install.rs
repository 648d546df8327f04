//! Installing the global subscriber.
//!
//! Kept in its own test binary so no other test has installed a subscriber
//! first.

use logging::{Verbosity, VerbosityConfig, init_tracing};

#[test]
fn second_install_keeps_the_first_subscriber() {
    let config = VerbosityConfig::new(Verbosity::Trace);
    assert!(init_tracing(&config));
    tracing::trace!(target: "bat::cycle", "visible at trace level");
    assert!(!init_tracing(&VerbosityConfig::default()));
    assert!(tracing::enabled!(target: "bat::cycle", tracing::Level::TRACE));
}
