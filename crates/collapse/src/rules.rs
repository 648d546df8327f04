//! crates/collapse/src/rules.rs
//!
//! Ordered rule lists and the rule file parser.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CollapseError, CollapseResult};
use crate::rule::Rule;

/// Ordered, immutable list of collapsible rules.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

/// Why a rule file line was not turned into a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No space separates the name from the pattern.
    MissingSeparator,
    /// Nothing follows the separating space.
    EmptyPattern,
    /// The line is not valid UTF-8.
    InvalidUtf8,
    /// The pattern failed to compile.
    InvalidPattern(String),
}

/// A rule file line that was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// One-based line number.
    pub line: usize,
    /// Reason the line was skipped.
    pub reason: SkipReason,
}

/// Summary of a rule file parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleParseReport {
    /// Number of rules accepted.
    pub accepted: usize,
    /// Lines that were ignored, in file order.
    pub skipped: Vec<SkippedLine>,
}

impl RuleParseReport {
    /// Returns `true` when every non-blank line became a rule.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl RuleSet {
    /// Creates an empty rule set; normalization is then the identity.
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Wraps already compiled rules, keeping their order.
    #[must_use]
    pub const fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Loads rules from the file at `path`.
    pub fn from_path(path: &Path) -> CollapseResult<(Self, RuleParseReport)> {
        let file = File::open(path).map_err(|source| CollapseError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file))
    }

    /// Parses `<name> <pattern>` lines.
    ///
    /// Blank lines are ignored. The name ends at the first space; further
    /// spaces before the pattern are skipped and a trailing `\n` or `\r\n` is
    /// removed. Lines that cannot be turned into a rule are logged, recorded
    /// in the report and skipped.
    pub fn parse<R: BufRead>(mut reader: R) -> CollapseResult<(Self, RuleParseReport)> {
        let mut rules = Vec::new();
        let mut report = RuleParseReport::default();
        let mut buf = Vec::new();
        let mut number = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            number += 1;

            let line = strip_line_ending(&buf);
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Ok(rule) => {
                    tracing::debug!(
                        target: "bat::collapse",
                        line = number,
                        name = rule.name(),
                        pattern = rule.pattern(),
                        "rule loaded"
                    );
                    rules.push(rule);
                }
                Err(reason) => {
                    tracing::warn!(target: "bat::collapse", line = number, ?reason, "skipping rule");
                    report.skipped.push(SkippedLine {
                        line: number,
                        reason,
                    });
                }
            }
        }

        report.accepted = rules.len();
        tracing::info!(
            target: "bat::collapse",
            accepted = report.accepted,
            skipped = report.skipped.len(),
            "collapsible rules loaded"
        );
        Ok((Self { rules }, report))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rules in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn parse_line(line: &[u8]) -> Result<Rule, SkipReason> {
    let text = std::str::from_utf8(line).map_err(|_| SkipReason::InvalidUtf8)?;
    let (name, pattern) = text.split_once(' ').ok_or(SkipReason::MissingSeparator)?;
    let pattern = pattern.trim_start_matches(' ');
    if pattern.is_empty() {
        return Err(SkipReason::EmptyPattern);
    }
    Rule::new(name, pattern).map_err(|err| match err {
        CollapseError::Pattern { source, .. } => SkipReason::InvalidPattern(source.to_string()),
        other => SkipReason::InvalidPattern(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (RuleSet, RuleParseReport) {
        RuleSet::parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn parses_name_and_pattern() {
        let (rules, report) = parse("TS \\d{10}\nNONCE [0-9a-f]{16}\n");
        assert!(report.is_clean());
        assert_eq!(report.accepted, 2);
        let names: Vec<_> = rules.iter().map(Rule::name).collect();
        assert_eq!(names, ["TS", "NONCE"]);
        assert_eq!(rules.iter().next().unwrap().pattern(), "\\d{10}");
    }

    #[test]
    fn extra_spaces_before_pattern_are_skipped() {
        let (rules, _) = parse("TS    \\d+ x\r\n");
        assert_eq!(rules.iter().next().unwrap().pattern(), "\\d+ x");
    }

    #[test]
    fn blank_lines_are_ignored_silently() {
        let (rules, report) = parse("\n\r\nA a\n\n");
        assert_eq!(rules.len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn bad_lines_are_reported_and_skipped() {
        let (rules, report) = parse("NOSPACE\nEMPTY \nBAD (\nOK x\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(
            report.skipped[0],
            SkippedLine {
                line: 1,
                reason: SkipReason::MissingSeparator
            }
        );
        assert_eq!(report.skipped[1].reason, SkipReason::EmptyPattern);
        assert_eq!(report.skipped[2].line, 3);
        assert!(matches!(report.skipped[2].reason, SkipReason::InvalidPattern(_)));
    }

    #[test]
    fn last_line_without_newline_is_parsed() {
        let (rules, _) = parse("A a\nB b");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let (rules, report) = RuleSet::parse(&b"A \xff\xfe\nB b\n"[..]).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::InvalidUtf8);
    }
}
