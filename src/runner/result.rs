//! Build results and scenario verdicts.

use std::fmt;

use tracing::info;

use crate::cluster::{BuildRecord, StartedBuild};
use crate::error::AssertionError;
use crate::status::BuildPhase;

/// The outcome of starting a build and waiting for it to finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// The build as reported by `start-build`.
    pub started: StartedBuild,
    /// The build's status once it reached a terminal phase.
    pub record: BuildRecord,
    /// Build logs captured after completion, if they could be fetched.
    pub logs: Option<String>,
}

impl BuildResult {
    /// The build's resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.started.name
    }

    /// Assert the build finished in the `Failed` phase.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::NotFailed` naming the observed phase.
    pub fn assert_failure(&self) -> Result<(), AssertionError> {
        if self.record.phase == BuildPhase::Failed {
            Ok(())
        } else {
            Err(AssertionError::NotFailed {
                build: self.name().to_owned(),
                phase: self.record.phase.to_string(),
            })
        }
    }

    /// Emit the captured start-build output and build logs.
    pub fn dump_logs(&self) {
        let build = self.name();
        for line in self.started.stdout.lines() {
            info!(target: "buildprobe::logs", build, stream = "start-build stdout", "{line}");
        }
        for line in self.started.stderr.lines() {
            info!(target: "buildprobe::logs", build, stream = "start-build stderr", "{line}");
        }
        match self.logs {
            Some(ref logs) => {
                for line in logs.lines() {
                    info!(target: "buildprobe::logs", build, stream = "build", "{line}");
                }
            }
            None => info!(target: "buildprobe::logs", build, "no build logs captured"),
        }
    }
}

/// How far a scenario progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Nothing has been sent to the cluster yet.
    Pending,
    /// The fixture was created.
    Submitted,
    /// The build was started.
    Running,
    /// The build reached a terminal phase.
    Terminal,
    /// The status fields were checked.
    Asserted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Running => "running",
            Self::Terminal => "terminal",
            Self::Asserted => "asserted",
        };
        f.write_str(name)
    }
}

/// The result of running one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The build failed with the expected reason and message.
    Passed,
    /// The build did not fail as expected.
    Failed(AssertionError),
    /// An infrastructure error stopped the scenario before its assertions.
    Aborted(String),
}

/// Per-scenario report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// The scenario name.
    pub scenario: &'static str,
    /// The last stage the scenario reached.
    pub stage: Stage,
    /// The build name, once one was started.
    pub build: Option<String>,
    /// The verdict.
    pub verdict: Verdict,
}

impl ScenarioReport {
    /// Returns whether the scenario passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Passed)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            Verdict::Passed => write!(f, "PASS {}", self.scenario),
            Verdict::Failed(ref error) => write!(f, "FAIL {}: {error}", self.scenario),
            Verdict::Aborted(ref message) => {
                write!(f, "ABORT {} at {}: {message}", self.scenario, self.stage)
            }
        }
    }
}

/// Reports for every scenario in a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    /// Individual scenario reports.
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Number of scenarios that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|report| report.passed()).count()
    }

    /// Number of scenarios that failed or aborted.
    #[must_use]
    pub fn unsuccessful(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Returns whether every scenario passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(ScenarioReport::passed)
    }
}
