//! Defaults and deserialisation tests for configuration types.

use camino::Utf8PathBuf;
use rstest::rstest;

use crate::config::tests::helpers::app_config_from_full_toml;
use crate::config::{AppConfig, DEFAULT_OC_BINARY, RunConfig, WaitConfig};

#[rstest]
fn run_config_defaults() {
    let config = RunConfig::default();
    assert_eq!(config.fixtures_dir, Utf8PathBuf::from("testdata"));
    assert_eq!(config.build_log_level, 5);
    assert!(!config.keep_namespace);
}

#[rstest]
fn wait_config_defaults() {
    let config = WaitConfig::default();
    assert_eq!(config.poll_interval_secs, 5);
    assert_eq!(config.build_timeout_secs, 1800);
    assert_eq!(config.builder_account_timeout_secs, 120);
}

#[rstest]
fn app_config_optional_fields_default_to_none() {
    let config = AppConfig::default();
    assert!(config.oc_binary.is_none());
    assert!(config.kubeconfig.is_none());
    assert!(config.namespace.is_none());
}

#[rstest]
fn oc_binary_falls_back_to_default() {
    assert_eq!(AppConfig::default().oc_binary(), DEFAULT_OC_BINARY);
}

#[rstest]
fn full_toml_populates_every_section(app_config_from_full_toml: AppConfig) {
    let config = app_config_from_full_toml;
    assert_eq!(config.oc_binary(), "/opt/oc/bin/oc");
    assert_eq!(config.kubeconfig.as_deref(), Some("/home/ci/.kube/config"));
    assert_eq!(config.namespace.as_deref(), Some("statusfail"));
    assert_eq!(config.run.fixtures_dir, Utf8PathBuf::from("/srv/testdata"));
    assert_eq!(config.run.build_log_level, 7);
    assert!(config.run.keep_namespace);
    assert_eq!(
        config.wait,
        WaitConfig {
            poll_interval_secs: 2,
            build_timeout_secs: 600,
            builder_account_timeout_secs: 60,
        }
    );
}

#[rstest]
fn partial_section_keeps_remaining_defaults() {
    let config: AppConfig = toml::from_str(
        r"
        [wait]
        build_timeout_secs = 60
        ",
    )
    .expect("TOML parsing should succeed");
    assert_eq!(config.wait.build_timeout_secs, 60);
    assert_eq!(config.wait.poll_interval_secs, 5);
    assert_eq!(config.run, RunConfig::default());
}
