//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::AppConfig;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        oc_binary = "/opt/oc/bin/oc"
        kubeconfig = "/home/ci/.kube/config"
        namespace = "statusfail"

        [run]
        fixtures_dir = "/srv/testdata"
        build_log_level = 7
        keep_namespace = true

        [wait]
        poll_interval_secs = 2
        build_timeout_secs = 600
        builder_account_timeout_secs = 60
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with the defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Creates a composer with defaults, file and environment layers.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;
    composer.push_file(
        json!({
            "namespace": "from-file",
            "oc_binary": "/file/oc",
            "run": { "build_log_level": 3 }
        }),
        None,
    );
    composer.push_environment(json!({
        "namespace": "from-env",
        "wait": { "poll_interval_secs": 9 }
    }));
    Ok(composer)
}
