//! Cluster access through the `oc` command-line client.
//!
//! All interaction with the build system goes through the CLI. The
//! [`ClusterCli`] trait is the seam: [`OcClient`] spawns the real binary,
//! tests substitute a mock. [`Cluster`] layers typed, namespaced operations
//! on top of any client, and the `wait` helpers poll it until a resource
//! settles.

mod oc;
mod project;
mod resources;
mod wait;

use camino::Utf8Path;
use futures_util::future::BoxFuture;
use tracing::debug;

use crate::error::{ClusterError, Result};

pub use oc::{KubeconfigResolver, OcClient};
pub use project::{DEFAULT_PROJECT_PREFIX, ProjectSession};
pub use resources::{BuildRecord, StartedBuild};
pub use wait::{WaitPolicy, wait_for_build, wait_for_builder_account};


/// Captured result of one CLI invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CliOutput {
    /// Successful output carrying the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    #[must_use]
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns whether the process exited with status zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Boxed future returned by [`ClusterCli::invoke`].
pub type CliFuture<'a> = BoxFuture<'a, std::result::Result<CliOutput, ClusterError>>;

/// Behaviour required to run CLI commands against the cluster.
///
/// Implementations only fail when the process cannot be run at all. A
/// non-zero exit is reported through [`CliOutput::code`] so callers can
/// decide whether it is fatal.
pub trait ClusterCli: Send + Sync {
    /// Run the client with the given arguments and capture its output.
    fn invoke(&self, args: Vec<String>) -> CliFuture<'_>;
}

/// Render an argument list for error messages.
pub(crate) fn render_command(args: &[String]) -> String {
    let mut rendered = String::from("oc");
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Turn a non-zero exit into `ClusterError::CommandFailed` naming the full
/// command line.
pub(crate) fn ensure_success(
    args: &[String],
    output: CliOutput,
) -> std::result::Result<CliOutput, ClusterError> {
    if output.is_success() {
        Ok(output)
    } else {
        Err(ClusterError::CommandFailed {
            command: render_command(args),
            code: output.code.unwrap_or(-1),
            stderr: output.stderr.trim().to_owned(),
        })
    }
}

/// Namespaced build operations over a [`ClusterCli`].
pub struct Cluster<'a, C: ClusterCli> {
    cli: &'a C,
    namespace: String,
}

impl<'a, C: ClusterCli> Cluster<'a, C> {
    /// Bind a client to a namespace.
    #[must_use]
    pub fn new(cli: &'a C, namespace: impl Into<String>) -> Self {
        Self {
            cli,
            namespace: namespace.into(),
        }
    }

    /// The namespace every operation targets.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Run a namespaced command and return the raw output.
    async fn invoke(&self, args: &[&str]) -> Result<(Vec<String>, CliOutput)> {
        let mut full: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
        full.push(format!("--namespace={}", self.namespace));
        debug!(command = %render_command(&full), "invoking cluster client");
        let output = self.cli.invoke(full.clone()).await?;
        Ok((full, output))
    }

    /// Run a namespaced command, treating a non-zero exit as an error.
    ///
    /// Returns the full argument list alongside the output so callers can
    /// name the command in later errors.
    async fn run(&self, args: &[&str]) -> Result<(Vec<String>, CliOutput)> {
        let (full, output) = self.invoke(args).await?;
        let checked = ensure_success(&full, output)?;
        Ok((full, checked))
    }

    /// Create the resources defined in a fixture file.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError` if the client cannot be run or exits non-zero.
    pub async fn create_from_file(&self, path: &Utf8Path) -> Result<()> {
        self.run(&["create", "-f", path.as_str()]).await?;
        Ok(())
    }

    /// Start a build from a build configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::CommandFailed` if the build cannot be started
    /// and `ClusterError::MalformedOutput` if the client does not print the
    /// new build's name.
    pub async fn start_build(
        &self,
        build_config: &str,
        extra_args: &[String],
        log_level: u8,
    ) -> Result<StartedBuild> {
        let log_flag = format!("--build-loglevel={log_level}");
        let mut args = vec!["start-build", build_config, "-o", "name"];
        args.extend(extra_args.iter().map(String::as_str));
        args.push(&log_flag);

        let (full, output) = self.run(&args).await?;
        StartedBuild::from_output(&output).ok_or_else(|| {
            ClusterError::MalformedOutput {
                command: render_command(&full),
                message: String::from("no build name printed"),
            }
            .into()
        })
    }

    /// Fetch the current status of a build.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError` if the client fails or prints JSON that does
    /// not describe a build.
    pub async fn get_build(&self, name: &str) -> Result<BuildRecord> {
        let resource = format!("build/{name}");
        let (full, output) = self.run(&["get", &resource, "-o", "json"]).await?;
        BuildRecord::from_json(&output.stdout).map_err(|e| {
            ClusterError::MalformedOutput {
                command: render_command(&full),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Fetch the logs of a build.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError` if the client cannot be run or exits non-zero.
    pub async fn build_logs(&self, name: &str) -> Result<String> {
        let resource = format!("build/{name}");
        let (_, output) = self.run(&["logs", &resource]).await?;
        Ok(output.stdout)
    }

    /// Returns whether the `builder` service account exists and has been
    /// given image pull secrets.
    ///
    /// A non-zero exit from the client is read as "not there yet".
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InvocationFailed` if the client cannot be run
    /// and `ClusterError::MalformedOutput` if its JSON cannot be parsed.
    pub async fn builder_account_ready(&self) -> Result<bool> {
        let (full, output) = self
            .invoke(&["get", "serviceaccount", "builder", "-o", "json"])
            .await?;
        if !output.is_success() {
            debug!(stderr = %output.stderr.trim(), "builder service account not available yet");
            return Ok(false);
        }
        resources::service_account_has_pull_secrets(&output.stdout).map_err(|e| {
            ClusterError::MalformedOutput {
                command: render_command(&full),
                message: e.to_string(),
            }
            .into()
        })
    }
}
