//! The scenario runner.
//!
//! For each scenario the runner waits for the builder service account,
//! submits the fixture, starts the build, waits for it to settle, and checks
//! the reported status. Steps up to and including the wait are
//! infrastructure: any error aborts the scenario without retry. The checks
//! that follow are the behaviour under test and produce
//! [`Verdict::Failed`] with the build logs dumped for diagnosis.
//!
//! Scenarios run strictly one after another and share nothing but the
//! namespace.

mod result;

use camino::Utf8PathBuf;
use tracing::{Instrument, error, info, info_span, warn};

use crate::cluster::{Cluster, ClusterCli, WaitPolicy, wait_for_build, wait_for_builder_account};
use crate::config::AppConfig;
use crate::error::{AssertionError, ProbeError, Result};
use crate::scenario::Scenario;

pub use result::{BuildResult, ScenarioReport, Stage, SuiteReport, Verdict};


/// Settings that shape every scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Directory fixtures are resolved against.
    pub fixtures_dir: Utf8PathBuf,
    /// Value passed as `--build-loglevel`.
    pub build_log_level: u8,
    /// Wait applied to each build.
    pub build_wait: WaitPolicy,
    /// Wait applied to the builder service account.
    pub account_wait: WaitPolicy,
}

impl RunSettings {
    /// Derive run settings from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fixtures_dir: config.run.fixtures_dir.clone(),
            build_log_level: config.run.build_log_level,
            build_wait: WaitPolicy::from_secs(
                config.wait.poll_interval_secs,
                config.wait.build_timeout_secs,
            ),
            account_wait: WaitPolicy::from_secs(
                config.wait.poll_interval_secs,
                config.wait.builder_account_timeout_secs,
            ),
        }
    }
}

/// Runs scenarios against one namespace.
pub struct ScenarioRunner<'a, C: ClusterCli> {
    cluster: Cluster<'a, C>,
    settings: RunSettings,
}

/// Progress tracker threaded through a single scenario.
struct Progress {
    stage: Stage,
    build: Option<String>,
}

impl Progress {
    fn advance(&mut self, stage: Stage) {
        self.stage = stage;
        info!(stage = %stage, "scenario advanced");
    }
}

impl<'a, C: ClusterCli> ScenarioRunner<'a, C> {
    /// Create a runner for the namespace the cluster is bound to.
    #[must_use]
    pub const fn new(cluster: Cluster<'a, C>, settings: RunSettings) -> Self {
        Self { cluster, settings }
    }

    /// Run scenarios sequentially and collect their reports.
    pub async fn run_suite(&self, scenarios: &[Scenario]) -> SuiteReport {
        let mut suite = SuiteReport::default();
        for scenario in scenarios {
            suite.reports.push(self.run_scenario(scenario).await);
        }
        info!(
            passed = suite.passed(),
            unsuccessful = suite.unsuccessful(),
            "suite finished"
        );
        suite
    }

    /// Run one scenario to a verdict.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioReport {
        let span = info_span!(
            "scenario",
            name = scenario.name,
            namespace = self.cluster.namespace()
        );
        let mut progress = Progress {
            stage: Stage::Pending,
            build: None,
        };

        let outcome = self
            .execute(scenario, &mut progress)
            .instrument(span.clone())
            .await;

        let _entered = span.enter();
        let verdict = match outcome {
            Ok(()) => {
                info!("scenario passed");
                Verdict::Passed
            }
            Err(ProbeError::Assertion(assertion)) => {
                error!(error = %assertion, "scenario failed");
                Verdict::Failed(assertion)
            }
            Err(other) => {
                error!(error = %other, stage = %progress.stage, "scenario aborted");
                Verdict::Aborted(other.to_string())
            }
        };

        ScenarioReport {
            scenario: scenario.name,
            stage: progress.stage,
            build: progress.build,
            verdict,
        }
    }

    async fn execute(&self, scenario: &Scenario, progress: &mut Progress) -> Result<()> {
        wait_for_builder_account(&self.cluster, &self.settings.account_wait).await?;
        let resolved = scenario.resolve(&self.settings.fixtures_dir)?;

        self.cluster.create_from_file(&resolved.fixture).await?;
        progress.advance(Stage::Submitted);

        let result = self
            .start_and_wait(scenario.build_config, &resolved.extra_args, progress)
            .await?;
        progress.advance(Stage::Terminal);

        if let Err(assertion) = result.assert_failure() {
            result.dump_logs();
            return Err(assertion.into());
        }

        let build = self.cluster.get_build(result.name()).await?;
        info!(build = %build.name, reason = %build.status_reason(), "build status fetched");
        let checked = check_status(scenario, &build.name, &build.reason, &build.message);
        progress.advance(Stage::Asserted);
        if let Err(assertion) = checked {
            result.dump_logs();
            return Err(assertion.into());
        }
        Ok(())
    }

    /// Start a build and block until it settles, capturing its logs.
    async fn start_and_wait(
        &self,
        build_config: &str,
        extra_args: &[String],
        progress: &mut Progress,
    ) -> Result<BuildResult> {
        let started = self
            .cluster
            .start_build(build_config, extra_args, self.settings.build_log_level)
            .await?;
        progress.build = Some(started.name.clone());
        progress.advance(Stage::Running);

        let record = wait_for_build(&self.cluster, &started.name, &self.settings.build_wait).await?;
        let logs = match self.cluster.build_logs(&started.name).await {
            Ok(logs) => Some(logs),
            Err(e) => {
                warn!(build = %started.name, error = %e, "could not fetch build logs");
                None
            }
        };

        Ok(BuildResult {
            started,
            record,
            logs,
        })
    }
}

/// Compare a build's reported status against the scenario's expectations.
///
/// # Errors
///
/// Returns `AssertionError::ReasonMismatch` or
/// `AssertionError::MessageMismatch`, checking the reason first.
pub fn check_status(
    scenario: &Scenario,
    build: &str,
    reason: &str,
    message: &str,
) -> std::result::Result<(), AssertionError> {
    let expected_reason = scenario.expected_reason.as_str();
    if reason != expected_reason {
        return Err(AssertionError::ReasonMismatch {
            build: build.to_owned(),
            expected: expected_reason.to_owned(),
            actual: reason.to_owned(),
        });
    }

    let expected_message = scenario.expected_message();
    if message != expected_message {
        return Err(AssertionError::MessageMismatch {
            build: build.to_owned(),
            expected: expected_message.to_owned(),
            actual: message.to_owned(),
        });
    }
    Ok(())
}
