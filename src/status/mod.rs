//! Build lifecycle phases and the failure reason taxonomy.
//!
//! Both are owned by the build system under test. The values here mirror what
//! the cluster reports in `status.phase`, `status.reason`, and
//! `status.message` so that scenarios can state their expectations as typed
//! values rather than loose strings.

use std::fmt;


/// Lifecycle phase reported for a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPhase {
    /// The build has been created but not yet scheduled.
    New,
    /// The build pod is waiting to start.
    Pending,
    /// The build pod is running.
    Running,
    /// The build finished successfully.
    Complete,
    /// The build finished unsuccessfully.
    Failed,
    /// The build could not be run because of a system error.
    Error,
    /// The build was cancelled.
    Cancelled,
    /// A phase this crate does not recognise.
    Unknown(String),
}

impl BuildPhase {
    /// Parse a phase from the string the cluster reports.
    ///
    /// An empty string maps to [`BuildPhase::New`], since freshly created
    /// builds may not carry a phase yet.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "New" => Self::New,
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Complete" => Self::Complete,
            "Failed" => Self::Failed,
            "Error" => Self::Error,
            "Cancelled" => Self::Cancelled,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Returns the phase as reported by the cluster.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Error => "Error",
            Self::Cancelled => "Cancelled",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns whether no further transition occurs from this phase.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Failed | Self::Error | Self::Cancelled
        )
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic reason a build failed, as reported in `status.reason`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReason {
    /// The post-commit hook exited non-zero.
    PostCommitHookFailed,
    /// The build input source could not be fetched.
    FetchSourceFailed,
    /// The builder image could not be pulled.
    PullBuilderImageFailed,
    /// The output image could not be pushed.
    PushImageToRegistryFailed,
    /// The source-to-image assemble script failed.
    AssembleFailed,
    /// A failure with no more specific classification.
    GenericBuildFailed,
    /// The Docker build strategy failed.
    DockerBuildFailed,
    /// The build did not complete and retrying timed out.
    ExceededRetryTimeout,
    /// The output image reference could not be resolved.
    InvalidOutputReference,
    /// The build pod could not be created.
    CannotCreateBuildPod,
    /// The build pod was deleted before the build completed.
    BuildPodDeleted,
    /// The push secret is missing.
    MissingPushSecret,
    /// A reason this crate does not recognise.
    Other(String),
}

/// Every recognised reason, excluding [`StatusReason::Other`].
const KNOWN_REASONS: &[StatusReason] = &[
    StatusReason::PostCommitHookFailed,
    StatusReason::FetchSourceFailed,
    StatusReason::PullBuilderImageFailed,
    StatusReason::PushImageToRegistryFailed,
    StatusReason::AssembleFailed,
    StatusReason::GenericBuildFailed,
    StatusReason::DockerBuildFailed,
    StatusReason::ExceededRetryTimeout,
    StatusReason::InvalidOutputReference,
    StatusReason::CannotCreateBuildPod,
    StatusReason::BuildPodDeleted,
    StatusReason::MissingPushSecret,
];

impl StatusReason {
    /// Parse a reason from the string the cluster reports.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        KNOWN_REASONS
            .iter()
            .find(|reason| reason.as_str() == raw)
            .map_or_else(|| Self::Other(raw.to_owned()), Clone::clone)
    }

    /// Returns the reason as reported by the cluster.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PostCommitHookFailed => "PostCommitHookFailed",
            Self::FetchSourceFailed => "FetchSourceFailed",
            Self::PullBuilderImageFailed => "PullBuilderImageFailed",
            Self::PushImageToRegistryFailed => "PushImageToRegistryFailed",
            Self::AssembleFailed => "AssembleFailed",
            Self::GenericBuildFailed => "GenericBuildFailed",
            Self::DockerBuildFailed => "DockerBuildFailed",
            Self::ExceededRetryTimeout => "ExceededRetryTimeout",
            Self::InvalidOutputReference => "InvalidOutputReference",
            Self::CannotCreateBuildPod => "CannotCreateBuildPod",
            Self::BuildPodDeleted => "BuildPodDeleted",
            Self::MissingPushSecret => "MissingPushSecret",
            Self::Other(raw) => raw,
        }
    }

    /// Returns the human-readable message the build system pairs with this
    /// reason, or `None` for unrecognised reasons.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        let text = match self {
            Self::PostCommitHookFailed => "Build failed because of post commit hook.",
            Self::FetchSourceFailed => "Failed to fetch the input source.",
            Self::PullBuilderImageFailed => "Failed pulling builder image.",
            Self::PushImageToRegistryFailed => "Failed to push the image to the registry.",
            Self::AssembleFailed => "Assemble script failed.",
            Self::GenericBuildFailed => "Generic Build failure - check logs for details.",
            Self::DockerBuildFailed => "Docker build strategy has failed.",
            Self::ExceededRetryTimeout => "Build did not complete and retrying timed out.",
            Self::InvalidOutputReference => "Output image could not be resolved.",
            Self::CannotCreateBuildPod => "Failed creating build pod.",
            Self::BuildPodDeleted => {
                "The pod for this build was deleted before the build completed."
            }
            Self::MissingPushSecret => "Missing push secret.",
            Self::Other(_) => return None,
        };
        Some(text)
    }
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
