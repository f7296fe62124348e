use std::path::PathBuf;

use cucumber::writer;

/// Summary handle produced by the scenario engine for one run.
///
/// The counts are the engine's own statistics, passed through without
/// interpretation. The surrounding harness decides what to do with a failed
/// run; typically it exits non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub passed_steps: usize,
    pub failed_steps: usize,
    pub skipped_steps: usize,
    pub retried_steps: usize,
    pub parsing_errors: usize,
    pub hook_errors: usize,
    /// Path of the Cucumber-JSON report, when one was requested.
    pub report: Option<PathBuf>,
}

impl RunOutcome {
    pub(crate) fn from_stats<W, S>(stats: &S, report: Option<PathBuf>) -> Self
    where
        S: writer::Stats<W>,
    {
        Self {
            passed_steps: stats.passed_steps(),
            failed_steps: stats.failed_steps(),
            skipped_steps: stats.skipped_steps(),
            retried_steps: stats.retried_steps(),
            parsing_errors: stats.parsing_errors(),
            hook_errors: stats.hook_errors(),
            report,
        }
    }

    /// Whether the engine recorded any failure: a failed step, a resource
    /// that did not parse, or a hook error.
    pub fn has_failures(&self) -> bool {
        self.failed_steps > 0 || self.parsing_errors > 0 || self.hook_errors > 0
    }
}
