//! `buildprobe` application entry point.
//!
//! Uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/buildprobe/config.toml` or path from `BUILDPROBE_CONFIG_PATH`)
//! 3. Environment variables (`BUILDPROBE_*`)
//! 4. Command-line arguments
//!
//! Diagnostics go to stderr through `tracing`, filtered by `RUST_LOG`.
//! Scenario reports go to stdout.

use std::process::ExitCode;

use buildprobe::api::{self, CommandOutcome};
use buildprobe::cluster::{KubeconfigResolver, OcClient};
use buildprobe::config::{AppConfig, Cli, Commands, load_config};
use buildprobe::error::Result as ProbeResult;
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application entry point.
///
/// Parses the CLI, loads configuration, and dispatches to the subcommand.
/// Exits non-zero when any scenario fails or aborts.
#[tokio::main]
async fn main() -> EyreResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli).map_err(Report::from)?;
    let outcome = run(&cli, &config).await.map_err(Report::from)?;

    Ok(match outcome {
        CommandOutcome::Success => ExitCode::SUCCESS,
        CommandOutcome::ScenariosFailed { .. } => ExitCode::FAILURE,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
async fn run(cli: &Cli, config: &AppConfig) -> ProbeResult<CommandOutcome> {
    match cli.command {
        Commands::Run(ref args) => run_scenarios(config, &args.scenarios).await,
        Commands::List => Ok(list_scenarios()),
    }
}

/// Run the selected scenarios and print one line per verdict.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn run_scenarios(config: &AppConfig, names: &[String]) -> ProbeResult<CommandOutcome> {
    let env = mockable::DefaultEnv::new();
    let kubeconfig = KubeconfigResolver::new(&env).resolve(config.kubeconfig.as_deref());
    let client = OcClient::new(config.oc_binary(), kubeconfig);

    let report = api::run_scenarios(config, &client, names).await?;
    for scenario in &report.reports {
        println!("{scenario}");
    }
    println!(
        "{} passed, {} failed",
        report.passed(),
        report.unsuccessful()
    );
    Ok(CommandOutcome::from(&report))
}

/// Print the scenario table.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn list_scenarios() -> CommandOutcome {
    for scenario in api::list_scenarios() {
        println!(
            "{:<20} {:<28} {}",
            scenario.name,
            scenario.expected_reason.as_str(),
            scenario.description
        );
    }
    CommandOutcome::Success
}
