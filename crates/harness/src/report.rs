//! crates/harness/src/report.rs

use crate::exit::ExitCode;

/// Tally of a finished (or running) session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Cycles completed.
    pub cycles: u64,
    /// Comparisons performed.
    pub comparisons: u64,
    /// Comparisons that failed.
    pub failures: u64,
    /// Records written to the record target.
    pub recorded: u64,
}

impl Report {
    /// Counts one comparison.
    pub const fn note(&mut self, passed: bool) {
        self.comparisons += 1;
        if !passed {
            self.failures += 1;
        }
    }

    /// Returns `true` when no comparison failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failures == 0
    }

    /// Exit status for this tally.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_failures(self.failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_drive_exit_code() {
        let mut report = Report::default();
        report.note(true);
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), ExitCode::SUCCESS);

        report.note(false);
        report.note(false);
        assert_eq!(report.comparisons, 3);
        assert_eq!(report.failures, 2);
        assert_eq!(report.exit_code().code(), 2);
    }
}
