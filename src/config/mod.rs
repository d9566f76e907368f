//! Configuration system for buildprobe.
//!
//! This module provides the configuration structures and CLI definitions for
//! buildprobe. Layers are merged with `ortho_config`: command-line flags
//! override `BUILDPROBE_*` environment variables, which override the
//! configuration file, which overrides the defaults.
//!
//! The configuration file is expected at `~/.config/buildprobe/config.toml`
//! by default.
//!
//! # Example Configuration
//!
//! ```toml
//! oc_binary = "/usr/local/bin/oc"
//! kubeconfig = "/home/user/.kube/ci.config"
//!
//! [run]
//! fixtures_dir = "/srv/buildprobe/testdata"
//! build_log_level = 5
//! keep_namespace = false
//!
//! [wait]
//! poll_interval_secs = 5
//! build_timeout_secs = 1800
//! builder_account_timeout_secs = 120
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, RunArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{AppConfig, DEFAULT_OC_BINARY, RunConfig, WaitConfig};
