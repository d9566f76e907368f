//! Scenario state for build failure status behavioural tests.

use buildprobe::runner::SuiteReport;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// How the scripted cluster treats submitted work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ClusterBehaviour {
    /// Builds fail with the reason and message their scenario expects.
    FailAsExpected,
    /// Builds complete successfully.
    Complete,
    /// Builds fail with the given reason and its canonical message.
    FailWith(String),
    /// `create` exits non-zero.
    RejectFixtures,
}

#[derive(Default, ScenarioState)]
pub(crate) struct FailureStatusState {
    pub(crate) behaviour: Slot<ClusterBehaviour>,
    pub(crate) report: Slot<SuiteReport>,
    pub(crate) calls: Slot<Vec<Vec<String>>>,
}

#[fixture]
pub(crate) fn failure_status_state() -> FailureStatusState {
    let state = FailureStatusState::default();
    state.behaviour.set(ClusterBehaviour::FailAsExpected);
    state
}
