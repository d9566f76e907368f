//! Polling waits over cluster resources.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use super::{BuildRecord, Cluster, ClusterCli};
use crate::error::{ClusterError, Result};

/// How often to poll and how long to wait overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between successive polls.
    pub poll_interval: Duration,
    /// Deadline for the whole wait.
    pub timeout: Duration,
}

impl WaitPolicy {
    /// Build a policy from whole seconds.
    #[must_use]
    pub const fn from_secs(poll_interval_secs: u64, timeout_secs: u64) -> Self {
        Self {
            poll_interval: Duration::from_secs(poll_interval_secs),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn timed_out(what: String, policy: &WaitPolicy) -> ClusterError {
    ClusterError::Timeout {
        what,
        seconds: policy.timeout.as_secs(),
    }
}

/// Poll a build until it reaches a terminal phase.
///
/// # Errors
///
/// Returns `ClusterError::Timeout` if the build is still running when the
/// policy's deadline passes, or any error raised while fetching the build.
pub async fn wait_for_build<C: ClusterCli>(
    cluster: &Cluster<'_, C>,
    build: &str,
    policy: &WaitPolicy,
) -> Result<BuildRecord> {
    timeout(policy.timeout, poll_build(cluster, build, policy.poll_interval))
        .await
        .map_err(|_| timed_out(format!("build/{build}"), policy))?
}

async fn poll_build<C: ClusterCli>(
    cluster: &Cluster<'_, C>,
    build: &str,
    interval: Duration,
) -> Result<BuildRecord> {
    loop {
        let record = cluster.get_build(build).await?;
        if record.phase.is_terminal() {
            info!(build, phase = %record.phase, "build reached terminal phase");
            return Ok(record);
        }
        debug!(build, phase = %record.phase, "build still in progress");
        sleep(interval).await;
    }
}

/// Poll until the `builder` service account exists with pull secrets.
///
/// Builds cannot start until the account is provisioned, so every scenario
/// waits on it first.
///
/// # Errors
///
/// Returns `ClusterError::Timeout` if the account is not ready in time, or
/// any error raised while querying it.
pub async fn wait_for_builder_account<C: ClusterCli>(
    cluster: &Cluster<'_, C>,
    policy: &WaitPolicy,
) -> Result<()> {
    timeout(policy.timeout, poll_builder_account(cluster, policy.poll_interval))
        .await
        .map_err(|_| timed_out(String::from("serviceaccount/builder"), policy))?
}

async fn poll_builder_account<C: ClusterCli>(
    cluster: &Cluster<'_, C>,
    interval: Duration,
) -> Result<()> {
    while !cluster.builder_account_ready().await? {
        sleep(interval).await;
    }
    debug!(namespace = cluster.namespace(), "builder service account ready");
    Ok(())
}
