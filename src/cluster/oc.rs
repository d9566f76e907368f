//! The process-backed [`ClusterCli`] implementation.

use std::process::Stdio;

use camino::Utf8PathBuf;
use tokio::process::Command;

use super::{CliFuture, CliOutput, ClusterCli};
use crate::error::ClusterError;

/// Environment variable consulted when no kubeconfig is configured.
const KUBECONFIG_ENV_VAR: &str = "KUBECONFIG";

/// Resolves the kubeconfig passed to the client.
///
/// Resolution order:
/// 1. The configured path (CLI, config file, or `BUILDPROBE_KUBECONFIG`)
/// 2. `KUBECONFIG`
/// 3. None, leaving the client to its own default
pub struct KubeconfigResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> KubeconfigResolver<'a, E> {
    /// Creates a resolver backed by the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolve the kubeconfig path, ignoring empty values.
    #[must_use]
    pub fn resolve(&self, configured: Option<&str>) -> Option<Utf8PathBuf> {
        configured
            .filter(|path| !path.is_empty())
            .map(Utf8PathBuf::from)
            .or_else(|| {
                self.env
                    .string(KUBECONFIG_ENV_VAR)
                    .filter(|value| !value.is_empty())
                    .map(Utf8PathBuf::from)
            })
    }
}

/// Runs the `oc` binary as a child process.
#[derive(Debug, Clone)]
pub struct OcClient {
    program: String,
    kubeconfig: Option<Utf8PathBuf>,
}

impl OcClient {
    /// Create a client for the given binary and optional kubeconfig.
    #[must_use]
    pub fn new(program: impl Into<String>, kubeconfig: Option<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            kubeconfig,
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(ref kubeconfig) = self.kubeconfig {
            command.arg(format!("--kubeconfig={kubeconfig}"));
        }
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl ClusterCli for OcClient {
    fn invoke(&self, args: Vec<String>) -> CliFuture<'_> {
        Box::pin(async move {
            let output = self.command(&args).output().await.map_err(|e| {
                ClusterError::InvocationFailed {
                    program: self.program.clone(),
                    message: e.to_string(),
                }
            })?;
            Ok(CliOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
