//! Assertion steps for build failure status behavioural tests.

use buildprobe::runner::{ScenarioReport, Verdict};
use buildprobe::scenario::scenarios;
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::FailureStatusState;

fn only_report(failure_status_state: &FailureStatusState) -> StepResult<ScenarioReport> {
    let report = failure_status_state
        .report
        .get()
        .ok_or_else(|| String::from("suite report should be set"))?;
    match report.reports.as_slice() {
        [single] => Ok(single.clone()),
        other => Err(format!("expected one scenario report, got {}", other.len())),
    }
}

#[then("the scenario passes")]
fn scenario_passes(failure_status_state: &FailureStatusState) -> StepResult<()> {
    let report = only_report(failure_status_state)?;
    if report.passed() {
        Ok(())
    } else {
        Err(format!("expected a pass, got: {report}"))
    }
}

#[then("the build was started with {flag}")]
fn build_started_with(failure_status_state: &FailureStatusState, flag: String) -> StepResult<()> {
    let calls = failure_status_state
        .calls
        .get()
        .ok_or_else(|| String::from("calls should be recorded"))?;
    let start = calls
        .iter()
        .find(|args| args.first().is_some_and(|verb| verb == "start-build"))
        .ok_or_else(|| String::from("start-build was never invoked"))?;
    if start.iter().any(|arg| arg.starts_with(&flag)) {
        Ok(())
    } else {
        Err(format!("start-build arguments {start:?} lack {flag}"))
    }
}

#[then("the scenario fails mentioning {text}")]
fn scenario_fails_mentioning(
    failure_status_state: &FailureStatusState,
    text: String,
) -> StepResult<()> {
    let report = only_report(failure_status_state)?;
    match report.verdict {
        Verdict::Failed(ref error) if error.to_string().contains(&text) => Ok(()),
        _ => Err(format!("expected a failure mentioning '{text}', got: {report}")),
    }
}

#[then("the scenario aborts at the {stage} stage")]
fn scenario_aborts_at(failure_status_state: &FailureStatusState, stage: String) -> StepResult<()> {
    let report = only_report(failure_status_state)?;
    match report.verdict {
        Verdict::Aborted(_) if report.stage.to_string() == stage => Ok(()),
        _ => Err(format!("expected an abort at {stage}, got: {report}")),
    }
}

#[then("{count} scenarios pass in table order")]
fn scenarios_pass_in_order(
    failure_status_state: &FailureStatusState,
    count: usize,
) -> StepResult<()> {
    let report = failure_status_state
        .report
        .get()
        .ok_or_else(|| String::from("suite report should be set"))?;
    if report.passed() != count {
        return Err(format!("expected {count} passes, got {}", report.passed()));
    }
    let ran: Vec<_> = report.reports.iter().map(|r| r.scenario).collect();
    let table: Vec<_> = scenarios().iter().map(|s| s.name).collect();
    if ran == table {
        Ok(())
    } else {
        Err(format!("expected order {table:?}, got {ran:?}"))
    }
}
