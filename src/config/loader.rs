//! Configuration loading with layered precedence.
//!
//! This module loads configuration with the precedence order (lowest to
//! highest): application defaults, configuration file, environment variables,
//! command-line arguments.
//!
//! Layers are composed with `MergeComposer` by hand rather than through the
//! derived `load()`. The clap `Cli` owns subcommand dispatch and the
//! `--config` flag, so discovery must honour that path before falling back to
//! XDG locations, and typed environment variables are validated up front so
//! a bad value fails loudly instead of being skipped.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g.
//! `BUILDPROBE_RUN_KEEP_NAMESPACE=maybe`) return an error immediately. String
//! fields such as `BUILDPROBE_NAMESPACE` are always accepted.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli, Commands};
use crate::error::{ConfigError, Result};

// ============================================================================
// Environment Variable Specification Table
// ============================================================================

/// Names a configuration file explicitly, ahead of discovery.
const CONFIG_PATH_ENV_VAR: &str = "BUILDPROBE_CONFIG_PATH";

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `BUILDPROBE_NAMESPACE`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["wait", "poll_interval_secs"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
///
/// Adding or modifying environment variable mappings is a single-line change here.
/// The order doesn't matter as the table is processed in a single pass.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    // Top-level fields
    EnvVarSpec {
        env_var: "BUILDPROBE_OC_BINARY",
        path: &["oc_binary"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BUILDPROBE_KUBECONFIG",
        path: &["kubeconfig"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BUILDPROBE_NAMESPACE",
        path: &["namespace"],
        var_type: EnvVarType::String,
    },
    // Run fields
    EnvVarSpec {
        env_var: "BUILDPROBE_RUN_FIXTURES_DIR",
        path: &["run", "fixtures_dir"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "BUILDPROBE_RUN_BUILD_LOG_LEVEL",
        path: &["run", "build_log_level"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "BUILDPROBE_RUN_KEEP_NAMESPACE",
        path: &["run", "keep_namespace"],
        var_type: EnvVarType::Bool,
    },
    // Wait fields
    EnvVarSpec {
        env_var: "BUILDPROBE_WAIT_POLL_INTERVAL_SECS",
        path: &["wait", "poll_interval_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "BUILDPROBE_WAIT_BUILD_TIMEOUT_SECS",
        path: &["wait", "build_timeout_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "BUILDPROBE_WAIT_BUILDER_ACCOUNT_TIMEOUT_SECS",
        path: &["wait", "builder_account_timeout_secs"],
        var_type: EnvVarType::U64,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `BUILDPROBE_*` variable without keeping a
/// second list in sync with the loader.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Read a TOML configuration file into the composer's file layer.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_path());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;
    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Locate the configuration file: `--config` first, then
/// `BUILDPROBE_CONFIG_PATH`, then the discovery chain.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` when `--config` or
/// `BUILDPROBE_CONFIG_PATH` names a file that does not exist.
fn discover_config_file<E: mockable::Env>(cli: &Cli, env: &E) -> Result<Option<Utf8PathBuf>> {
    let explicit = cli.config.clone().or_else(|| {
        env.string(CONFIG_PATH_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(Utf8PathBuf::from)
    });
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound { path }.into());
        }
        return Ok(Some(path));
    }
    Ok(ConfigDiscovery::builder("buildprobe")
        .config_file_name("config.toml")
        .dotfile_name(".buildprobe.toml")
        .build()
        .candidates()
        .into_iter()
        .filter(|path| path.exists())
        .find_map(|path| Utf8PathBuf::try_from(path).ok()))
}

/// Load configuration with full layer precedence from the process
/// environment.
///
/// # Errors
///
/// See [`load_config_with_env`].
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration with full layer precedence.
///
/// Layers, lowest first:
/// 1. `AppConfig::default()`
/// 2. Configuration file (`--config`, `BUILDPROBE_CONFIG_PATH`, or discovery)
/// 3. `BUILDPROBE_*` environment variables
/// 4. Command-line arguments
///
/// The merged configuration is validated before it is returned.
///
/// # Errors
///
/// Returns `ConfigError` if an explicitly named configuration file is
/// missing, a configuration file is malformed, a typed
/// environment variable cannot be parsed, the layers do not merge into a
/// valid `AppConfig`, or validation fails.
pub fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(ref path) = discover_config_file(cli, env)? {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let mut config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.normalise();
    config.validate()?;
    Ok(config)
}

/// Collect `BUILDPROBE_*` variables listed in [`ENV_VAR_SPECS`] into a JSON
/// value shaped like `AppConfig`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable cannot be parsed.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        let json_value = parse_env_value(spec, raw_value)?;
        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

fn parse_env_value(spec: &EnvVarSpec, raw_value: String) -> Result<Value> {
    let invalid = |expected: &str, raw: &str| ConfigError::InvalidValue {
        field: spec.env_var.to_owned(),
        reason: format!("expected {expected}, got '{raw}'"),
    };
    match spec.var_type {
        EnvVarType::String => Ok(Value::String(raw_value)),
        EnvVarType::Bool => raw_value
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid("bool (true/false)", &raw_value).into()),
        EnvVarType::U64 => raw_value
            .parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid("unsigned integer", &raw_value).into()),
    }
}

/// Insert a value at a nested path, creating intermediate objects.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }
    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    let strings = [
        (&["oc_binary"][..], cli.oc_binary.clone()),
        (&["kubeconfig"][..], cli.kubeconfig.clone()),
        (&["namespace"][..], cli.namespace.clone()),
        (
            &["run", "fixtures_dir"][..],
            cli.fixtures_dir.as_ref().map(ToString::to_string),
        ),
    ];
    for (path, value) in strings {
        if let Some(text) = value {
            insert_at_path(&mut overrides, path, Value::String(text));
        }
    }

    if let Commands::Run(ref args) = cli.command {
        if args.keep_namespace {
            insert_at_path(&mut overrides, &["run", "keep_namespace"], Value::Bool(true));
        }
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
