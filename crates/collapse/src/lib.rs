#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `collapse` decides whether two blocks are equivalent. Programs under test
//! often emit content that changes from run to run (timestamps, nonces,
//! padding), so both sides are first passed through an ordered list of
//! *collapsible rules*, regex substitutions loaded from a rule file, and
//! only then compared byte for byte.
//!
//! # Design
//!
//! - A [`Rule`] pairs a name with a compiled [`regex::bytes::Regex`]. The
//!   name doubles as the replacement template, so `$1` and `${group}`
//!   references expand to captured text.
//! - A [`RuleSet`] is parsed once from a rule file with one
//!   `<name> <pattern>` entry per line. Malformed lines are skipped and
//!   reported through [`RuleParseReport`].
//! - A [`Normalizer`] applies the rules in order. Each rule that matches
//!   writes its output into a fresh arena block; a rule without matches
//!   passes the current block through untouched and allocates nothing.
//! - [`Normalizer::compare`] normalizes both sides with the same rules and
//!   requires equal length and equal bytes. The [`Outcome`] keeps the
//!   normalized blocks so a caller can dump them on failure.
//!
//! # Errors
//!
//! Only opening or reading the rule file is fatal ([`CollapseError`]). A
//! substitution whose output does not fit in the arena is logged and the
//! rule is skipped for that block.
//!
//! # Examples
//!
//! ```
//! use arena::Arena;
//! use collapse::{Normalizer, Rule, RuleSet};
//!
//! let rules = RuleSet::from_rules(vec![Rule::new("TS", r"\d{10}")?]);
//! let mut normalizer = Normalizer::new(rules);
//! let mut arena = Arena::with_capacity(256);
//!
//! let expected = arena.push(b"time=TS")?;
//! let actual = arena.push(b"time=1700000000")?;
//! assert!(normalizer.compare(&mut arena, expected, actual).is_pass());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod compare;
mod error;
mod rule;
mod rules;

pub use compare::{Difference, Normalizer, Outcome};
pub use error::{CollapseError, CollapseResult};
pub use rule::Rule;
pub use rules::{RuleParseReport, RuleSet, SkipReason, SkippedLine};
