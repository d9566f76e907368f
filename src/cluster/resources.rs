//! Read-only views of cluster resources decoded from `oc ... -o json`.
//!
//! Only the fields the runner consumes are modelled; everything else in the
//! resource is ignored.

use serde::Deserialize;

use super::CliOutput;
use crate::status::{BuildPhase, StatusReason};

/// A build that `start-build` has just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedBuild {
    /// The build's resource name, e.g. `statusfail-pushtoregistry-1`.
    pub name: String,
    /// Standard output of the `start-build` invocation.
    pub stdout: String,
    /// Standard error of the `start-build` invocation.
    pub stderr: String,
}

impl StartedBuild {
    /// Extract the build name from `start-build -o name` output.
    ///
    /// The client prints `build/<name>`, or the fully qualified
    /// `build.build.openshift.io/<name>` on newer servers. The last non-empty
    /// line wins so that warnings printed ahead of it are skipped.
    pub(crate) fn from_output(output: &CliOutput) -> Option<Self> {
        let line = output
            .stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())?;
        let name = line.rsplit_once('/').map_or(line, |(_, name)| name);
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            stdout: output.stdout.clone(),
            stderr: output.stderr.clone(),
        })
    }
}

/// The status fields of a build relevant to failure reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    /// The build's resource name.
    pub name: String,
    /// The lifecycle phase.
    pub phase: BuildPhase,
    /// The raw `status.reason`, empty when unset.
    pub reason: String,
    /// The raw `status.message`, empty when unset.
    pub message: String,
}

impl BuildRecord {
    /// Decode a build from its JSON representation.
    pub(crate) fn from_json(json: &str) -> serde_json::Result<Self> {
        let build: BuildJson = serde_json::from_str(json)?;
        Ok(Self {
            name: build.metadata.name,
            phase: BuildPhase::parse(&build.status.phase),
            reason: build.status.reason,
            message: build.status.message,
        })
    }

    /// The reported reason as a taxonomy entry.
    #[must_use]
    pub fn status_reason(&self) -> StatusReason {
        StatusReason::parse(&self.reason)
    }
}

#[derive(Deserialize)]
struct BuildJson {
    metadata: MetadataJson,
    #[serde(default)]
    status: BuildStatusJson,
}

#[derive(Deserialize)]
struct MetadataJson {
    #[serde(default)]
    name: String,
}

#[derive(Default, Deserialize)]
struct BuildStatusJson {
    #[serde(default)]
    phase: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ServiceAccountJson {
    #[serde(default, rename = "imagePullSecrets")]
    image_pull_secrets: Vec<serde_json::Value>,
}

/// Returns whether a service account carries at least one image pull secret.
pub(crate) fn service_account_has_pull_secrets(json: &str) -> serde_json::Result<bool> {
    let account: ServiceAccountJson = serde_json::from_str(json)?;
    Ok(!account.image_pull_secrets.is_empty())
}
