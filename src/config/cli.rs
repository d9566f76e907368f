//! Command-line argument definitions for buildprobe.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for buildprobe.
#[derive(Debug, Parser)]
#[command(name = "buildprobe")]
#[command(
    author,
    version,
    about = "Drive build failure scenarios against a cluster and check the reported status"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// The `oc` binary to invoke.
    #[arg(long, global = true)]
    pub oc_binary: Option<String>,

    /// Kubeconfig passed to every `oc` invocation.
    #[arg(long, global = true)]
    pub kubeconfig: Option<String>,

    /// Namespace to run in; a fresh project is created when omitted.
    #[arg(long, short = 'n', global = true)]
    pub namespace: Option<String>,

    /// Directory containing scenario fixtures.
    #[arg(long, global = true)]
    pub fixtures_dir: Option<Utf8PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run build failure scenarios.
    Run(RunArgs),

    /// List the available scenarios.
    List,
}

/// Arguments for the `run` subcommand.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Scenario to run; repeat to run several. Runs all when omitted.
    #[arg(long = "scenario", short = 's')]
    pub scenarios: Vec<String>,

    /// Keep a project created for this run instead of deleting it.
    #[arg(long)]
    pub keep_namespace: bool,
}
