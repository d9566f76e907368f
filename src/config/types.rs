//! Configuration data types for buildprobe.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Client binary used when none is configured.
pub const DEFAULT_OC_BINARY: &str = "oc";

/// Highest value the build system accepts for `--build-loglevel`.
const MAX_BUILD_LOG_LEVEL: u8 = 10;

/// Scenario execution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory containing scenario fixtures.
    pub fixtures_dir: Utf8PathBuf,

    /// Verbosity passed to builds as `--build-loglevel`.
    pub build_log_level: u8,

    /// Keep a project created for the run instead of deleting it.
    pub keep_namespace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: Utf8PathBuf::from("testdata"),
            build_log_level: 5,
            keep_namespace: false,
        }
    }
}

/// Polling and timeout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Seconds between status polls.
    pub poll_interval_secs: u64,

    /// Seconds to wait for a build to reach a terminal phase.
    pub build_timeout_secs: u64,

    /// Seconds to wait for the `builder` service account.
    pub builder_account_timeout_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            build_timeout_secs: 1800,
            builder_account_timeout_secs: 120,
        }
    }
}

/// Root application configuration.
///
/// Loaded from configuration files, environment variables, and command-line
/// arguments with layered precedence (lowest to highest): defaults,
/// configuration file, environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `BUILDPROBE_CONFIG_PATH` environment variable
/// 2. `.buildprobe.toml` in the current working directory
/// 3. `.buildprobe.toml` in the home directory
/// 4. `~/.config/buildprobe/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "BUILDPROBE",
    post_merge_hook,
    discovery(
        app_name = "buildprobe",
        env_var = "BUILDPROBE_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".buildprobe.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The `oc` binary to invoke.
    pub oc_binary: Option<String>,

    /// Kubeconfig passed to every invocation.
    pub kubeconfig: Option<String>,

    /// Namespace to run scenarios in. A fresh project is created when unset.
    pub namespace: Option<String>,

    /// Scenario execution configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub run: RunConfig,

    /// Polling and timeout configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub wait: WaitConfig,
}

impl AppConfig {
    /// The client binary, falling back to [`DEFAULT_OC_BINARY`].
    #[must_use]
    pub fn oc_binary(&self) -> &str {
        self.oc_binary.as_deref().unwrap_or(DEFAULT_OC_BINARY)
    }

    /// Validate values the type system cannot rule out.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty `oc_binary`, a build
    /// log level above 10, or a zero poll interval or timeout.
    pub fn validate(&self) -> Result<()> {
        if self.oc_binary().trim().is_empty() {
            return Err(invalid("oc_binary", "cannot be empty"));
        }
        if self.run.build_log_level > MAX_BUILD_LOG_LEVEL {
            return Err(invalid(
                "run.build_log_level",
                &format!(
                    "must be between 0 and {MAX_BUILD_LOG_LEVEL}, got {}",
                    self.run.build_log_level
                ),
            ));
        }
        let durations = [
            ("wait.poll_interval_secs", self.wait.poll_interval_secs),
            ("wait.build_timeout_secs", self.wait.build_timeout_secs),
            (
                "wait.builder_account_timeout_secs",
                self.wait.builder_account_timeout_secs,
            ),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, value)| *value == 0) {
            return Err(invalid(field, "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::ProbeError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}

impl AppConfig {
    /// Treat blank strings from any layer as unset.
    pub(crate) fn normalise(&mut self) {
        for field in [&mut self.oc_binary, &mut self.kubeconfig, &mut self.namespace] {
            if field.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *field = None;
            }
        }
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        self.normalise();
        Ok(())
    }
}
