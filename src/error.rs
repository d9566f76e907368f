//! Semantic error types for buildprobe.
//!
//! Errors split along the line the scenario runner cares about. Configuration,
//! scenario lookup, and cluster errors are infrastructure problems that abort a
//! scenario before the behaviour under test is observed. [`AssertionError`] is
//! the behaviour under test: the build reached the wrong terminal state or
//! reported the wrong status fields. Opaque `eyre::Report` values are reserved
//! for the binary boundary.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// An explicitly named configuration file does not exist.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// The configured path.
        path: Utf8PathBuf,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while resolving scenarios and their fixtures.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// No scenario with the requested name exists in the table.
    #[error("unknown scenario: {name}")]
    UnknownScenario {
        /// The requested scenario name.
        name: String,
    },

    /// A fixture file or directory referenced by a scenario does not exist.
    #[error("fixture not found: {path}")]
    FixtureNotFound {
        /// The resolved fixture path.
        path: Utf8PathBuf,
    },
}

/// Infrastructure errors raised while talking to the cluster through the CLI.
///
/// These abort the current scenario immediately and are never retried.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The CLI process could not be spawned or awaited.
    #[error("failed to invoke '{program}': {message}")]
    InvocationFailed {
        /// The program that was invoked.
        program: String,
        /// A description of the spawn or wait failure.
        message: String,
    },

    /// The CLI exited with a non-zero status.
    #[error("'{command}' exited with status {code}: {stderr}")]
    CommandFailed {
        /// The rendered command line.
        command: String,
        /// The exit code, or -1 when the process was killed by a signal.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The CLI produced output that could not be interpreted.
    #[error("unexpected output from '{command}': {message}")]
    MalformedOutput {
        /// The rendered command line.
        command: String,
        /// A description of what was wrong with the output.
        message: String,
    },

    /// A wait for a cluster resource exceeded its deadline.
    #[error("timed out after {seconds} seconds waiting for {what}")]
    Timeout {
        /// What was being waited for.
        what: String,
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

/// Mismatches between the observed build and the scenario's expectations.
///
/// These are the subject of the test. The runner reports them with a full
/// build log dump.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    /// The build finished in a terminal state other than `Failed`.
    #[error("build '{build}' finished as {phase}, expected Failed")]
    NotFailed {
        /// The build name.
        build: String,
        /// The observed terminal phase.
        phase: String,
    },

    /// The reported status reason differs from the expected one.
    #[error("build '{build}' reported reason '{actual}', expected '{expected}'")]
    ReasonMismatch {
        /// The build name.
        build: String,
        /// The expected reason.
        expected: String,
        /// The observed reason.
        actual: String,
    },

    /// The reported status message differs from the expected one.
    #[error("build '{build}' reported message '{actual}', expected '{expected}'")]
    MessageMismatch {
        /// The build name.
        build: String,
        /// The expected message.
        expected: String,
        /// The observed message.
        actual: String,
    },
}

/// Top-level error type for buildprobe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while resolving scenarios.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// An error occurred while talking to the cluster.
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// The observed build did not match expectations.
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

/// A specialised `Result` type for buildprobe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
