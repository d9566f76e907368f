//! Given/when steps for build failure status scenarios.

use std::sync::{Arc, Mutex};

use buildprobe::api::run_scenarios;
use buildprobe::cluster::{CliFuture, CliOutput, ClusterCli};
use buildprobe::config::AppConfig;
use buildprobe::scenario::scenarios;
use buildprobe::status::StatusReason;
use camino::Utf8PathBuf;
use mockall::mock;
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;

use super::StepResult;
use super::state::{ClusterBehaviour, FailureStatusState};

mock! {
    ScriptedCli {}

    impl ClusterCli for ScriptedCli {
        fn invoke(&self, args: Vec<String>) -> CliFuture<'_>;
    }
}

type CallLog = Arc<Mutex<Vec<Vec<String>>>>;

#[given("a cluster where every build fails as its scenario expects")]
fn given_expected_failures(failure_status_state: &FailureStatusState) {
    failure_status_state
        .behaviour
        .set(ClusterBehaviour::FailAsExpected);
}

#[given("a cluster where every build completes")]
fn given_completing_builds(failure_status_state: &FailureStatusState) {
    failure_status_state.behaviour.set(ClusterBehaviour::Complete);
}

#[given("a cluster where every build fails with reason {reason}")]
fn given_failures_with_reason(failure_status_state: &FailureStatusState, reason: String) {
    failure_status_state
        .behaviour
        .set(ClusterBehaviour::FailWith(reason));
}

#[given("a cluster that rejects every fixture")]
fn given_rejected_fixtures(failure_status_state: &FailureStatusState) {
    failure_status_state
        .behaviour
        .set(ClusterBehaviour::RejectFixtures);
}

#[when("the {name} scenario is run")]
fn when_scenario_run(failure_status_state: &FailureStatusState, name: String) -> StepResult<()> {
    run_selected(failure_status_state, &[name])
}

#[when("every scenario is run")]
fn when_every_scenario_run(failure_status_state: &FailureStatusState) -> StepResult<()> {
    run_selected(failure_status_state, &[])
}

fn run_selected(failure_status_state: &FailureStatusState, names: &[String]) -> StepResult<()> {
    let behaviour = failure_status_state
        .behaviour
        .get()
        .ok_or_else(|| String::from("cluster behaviour should be configured"))?;
    let (fixtures, config) = fixture_config()?;
    let (cli, calls) = scripted_cli(behaviour);

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let report = runtime
        .block_on(run_scenarios(&config, &cli, names))
        .map_err(|e| format!("run failed: {e}"))?;
    drop(fixtures);

    let recorded = calls
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .clone();
    failure_status_state.report.set(report);
    failure_status_state.calls.set(recorded);
    Ok(())
}

fn fixture_config() -> StepResult<(TempDir, AppConfig)> {
    let dir = TempDir::new().map_err(|e| format!("failed to create temp dir: {e}"))?;
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf())
        .map_err(|e| format!("temp dir is not UTF-8: {e}"))?;
    for scenario in scenarios() {
        std::fs::write(root.join(scenario.fixture), "kind: List\n")
            .map_err(|e| format!("failed to write fixture: {e}"))?;
    }
    std::fs::create_dir(root.join("statusfail-assemble"))
        .map_err(|e| format!("failed to create source dir: {e}"))?;

    let mut config = AppConfig::default();
    config.run.fixtures_dir = root;
    config.wait.poll_interval_secs = 1;
    Ok((dir, config))
}

fn scripted_cli(behaviour: ClusterBehaviour) -> (MockScriptedCli, CallLog) {
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&calls);
    let mut cli = MockScriptedCli::new();
    cli.expect_invoke().returning(move |args| {
        recorder
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(args.clone());
        let output = respond(&behaviour, &args);
        Box::pin(async move { Ok(output) })
    });
    (cli, calls)
}

fn respond(behaviour: &ClusterBehaviour, args: &[String]) -> CliOutput {
    let verb = args.first().map(String::as_str);
    let object = args.get(1).map(String::as_str);
    match (verb, object) {
        (Some("create"), _) if *behaviour == ClusterBehaviour::RejectFixtures => {
            CliOutput::failure(1, "error: the server rejected the fixture")
        }
        (Some("new-project" | "delete" | "create"), _) => CliOutput::success(""),
        (Some("get"), Some("serviceaccount")) => {
            CliOutput::success(r#"{"imagePullSecrets":[{"name":"builder-dockercfg-x1"}]}"#)
        }
        (Some("start-build"), Some(build_config)) => {
            CliOutput::success(format!("build.build.openshift.io/{build_config}-1\n"))
        }
        (Some("get"), Some(resource)) => {
            build_status(behaviour, resource.trim_start_matches("build/"))
        }
        (Some("logs"), _) => CliOutput::success("error: build error: assemble failed\n"),
        _ => CliOutput::failure(2, "unexpected command"),
    }
}

fn build_status(behaviour: &ClusterBehaviour, name: &str) -> CliOutput {
    let expected = scenarios()
        .into_iter()
        .find(|scenario| name.starts_with(scenario.build_config))
        .map(|scenario| scenario.expected_reason);
    let (phase, reason) = match *behaviour {
        ClusterBehaviour::Complete => ("Complete", String::new()),
        ClusterBehaviour::FailWith(ref reason) => ("Failed", reason.clone()),
        _ => (
            "Failed",
            expected
                .map(|reason| reason.as_str().to_owned())
                .unwrap_or_default(),
        ),
    };
    let message = StatusReason::parse(&reason)
        .message()
        .unwrap_or_default()
        .to_owned();
    CliOutput::success(
        serde_json::json!({
            "metadata": { "name": name },
            "status": { "phase": phase, "reason": reason, "message": message },
        })
        .to_string(),
    )
}
