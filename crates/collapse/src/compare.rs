//! crates/collapse/src/compare.rs
//!
//! Rule application over arena blocks and the exact comparison that follows.

use arena::{Arena, Block};

use crate::rules::RuleSet;

/// How two normalized blocks differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difference {
    /// The blocks have different lengths; content is not inspected.
    Length {
        /// Length of the normalized expected block.
        expected: usize,
        /// Length of the normalized actual block.
        actual: usize,
    },
    /// Equal lengths, differing bytes starting at `offset`.
    Content {
        /// Offset of the first differing byte.
        offset: usize,
    },
}

/// Result of comparing a reference block with an observed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Normalized blocks are identical.
    Pass,
    /// Normalized blocks differ.
    Fail {
        /// Normalized reference block.
        expected: Block,
        /// Normalized observed block.
        actual: Block,
        /// Where the blocks first diverge.
        difference: Difference,
    },
}

impl Outcome {
    /// Returns `true` for [`Outcome::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Result word printed for this outcome.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "OK",
            Self::Fail { .. } => "FAIL",
        }
    }
}

/// Applies a [`RuleSet`] to arena blocks.
///
/// The normalizer keeps one scratch buffer that every substitution writes
/// into before the result is copied to the arena, so steady-state
/// normalization does not allocate on the heap.
#[derive(Debug, Default)]
pub struct Normalizer {
    rules: RuleSet,
    scratch: Vec<u8>,
}

impl Normalizer {
    /// Creates a normalizer over `rules`.
    #[must_use]
    pub const fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            scratch: Vec::new(),
        }
    }

    /// Rules applied by this normalizer.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Runs every rule in order and returns the final block.
    ///
    /// Each rule sees the output of the previous one. A rule with no matches
    /// returns its input block unchanged. If a rule's output does not fit in
    /// the arena the rule is skipped for this block with a warning.
    pub fn normalize(&mut self, arena: &mut Arena, block: Block) -> Block {
        let mut current = block;
        for rule in &self.rules {
            let count = rule.apply(arena.bytes(current), &mut self.scratch);
            if count == 0 {
                continue;
            }
            match arena.push(&self.scratch) {
                Ok(next) => {
                    tracing::trace!(
                        target: "bat::collapse",
                        rule = rule.name(),
                        count,
                        before = current.len(),
                        after = next.len(),
                        "substituted"
                    );
                    current = next;
                }
                Err(err) => {
                    tracing::warn!(
                        target: "bat::collapse",
                        rule = rule.name(),
                        error = %err,
                        "substitution skipped"
                    );
                }
            }
        }
        current
    }

    /// Normalizes both blocks and compares them exactly.
    pub fn compare(&mut self, arena: &mut Arena, expected: Block, actual: Block) -> Outcome {
        let expected = self.normalize(arena, expected);
        let actual = self.normalize(arena, actual);
        match first_difference(arena.bytes(expected), arena.bytes(actual)) {
            None => Outcome::Pass,
            Some(difference) => {
                tracing::debug!(target: "bat::collapse", ?difference, "blocks differ");
                Outcome::Fail {
                    expected,
                    actual,
                    difference,
                }
            }
        }
    }
}

fn first_difference(expected: &[u8], actual: &[u8]) -> Option<Difference> {
    if expected.len() != actual.len() {
        return Some(Difference::Length {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .map(|offset| Difference::Content { offset })
}
