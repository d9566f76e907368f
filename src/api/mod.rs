//! Orchestration API for buildprobe commands.
//!
//! These functions hold the command logic behind the CLI so that embedders
//! and tests can drive it with any [`ClusterCli`]. They accept library-owned
//! types, never print, and never exit the process.

use tracing::{info, warn};

use crate::cluster::{Cluster, ClusterCli, DEFAULT_PROJECT_PREFIX, ProjectSession};
use crate::config::AppConfig;
use crate::error::Result;
use crate::runner::{RunSettings, ScenarioRunner, SuiteReport};
use crate::scenario::{self, Scenario};

/// Outcome of a buildprobe command.
///
/// The CLI adapter maps this to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Every selected scenario passed (exit code 0).
    Success,
    /// At least one scenario failed or aborted.
    ScenariosFailed {
        /// Number of unsuccessful scenarios.
        failed: usize,
    },
}

impl From<&SuiteReport> for CommandOutcome {
    fn from(report: &SuiteReport) -> Self {
        match report.unsuccessful() {
            0 => Self::Success,
            failed => Self::ScenariosFailed { failed },
        }
    }
}

/// Run the named scenarios, or all of them when `names` is empty.
///
/// Names and fixture paths are checked before anything touches the
/// cluster. The run uses the
/// configured namespace when one is set; otherwise it creates a fresh
/// project and deletes it afterwards unless `run.keep_namespace` is set.
/// Scenario failures are reported in the returned [`SuiteReport`] rather
/// than as errors.
///
/// # Errors
///
/// Returns `ScenarioError::UnknownScenario` for an unrecognised name,
/// `ScenarioError::FixtureNotFound` when a selected scenario's fixture is
/// missing, or `ClusterError` if the project cannot be created.
pub async fn run_scenarios<C: ClusterCli, S: AsRef<str>>(
    config: &AppConfig,
    cli: &C,
    names: &[S],
) -> Result<SuiteReport> {
    let selected = scenario::select(names)?;
    for entry in &selected {
        entry.resolve(&config.run.fixtures_dir)?;
    }
    let session =
        ProjectSession::acquire(cli, config.namespace.as_deref(), DEFAULT_PROJECT_PREFIX).await?;
    info!(
        namespace = session.namespace(),
        scenarios = selected.len(),
        "starting run"
    );

    let runner = ScenarioRunner::new(
        Cluster::new(cli, session.namespace()),
        RunSettings::from_config(config),
    );
    let report = runner.run_suite(&selected).await;

    let namespace = session.namespace().to_owned();
    if let Err(e) = session.release(cli, config.run.keep_namespace).await {
        warn!(namespace = %namespace, error = %e, "failed to clean up project");
    }
    Ok(report)
}

/// The scenarios available to `run`, in execution order.
#[must_use]
pub fn list_scenarios() -> Vec<Scenario> {
    scenario::scenarios()
}
