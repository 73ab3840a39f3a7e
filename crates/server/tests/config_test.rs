//! # Configuration Tests
//!
//! This file contains tests for the configuration loading logic. Environment
//! variables are a shared, global resource, so every test runs serially.

use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;
use textcde_server::config::{get_config, ConfigError};

/// A helper function to clear all environment variables used by `get_config`.
/// This ensures a clean slate before each test runs.
fn clear_env_vars() {
    for var in [
        "PORT",
        "REGION",
        "AWS_DEFAULT_REGION",
        "SCRATCH_DIR",
        "SOURCE_SCHEME",
        "TEXTCDE_ANALYSIS__API_URL",
        "TEXTCDE_ANALYSIS__POLL_INTERVAL_MS",
        "TEXTCDE_STORE__PROVIDER",
        "TEST_ANALYSIS_URL",
        "TEST_UNSET_REGION",
        "TEST_UNSET_KEY",
    ] {
        env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_get_config_defaults_from_env_only() {
    clear_env_vars();
    env::set_var("TEXTCDE_ANALYSIS__API_URL", "http://analysis.local");

    let config = get_config(None).expect("Configuration should load successfully");

    assert_eq!(config.port, 9090);
    assert_eq!(config.source_scheme, "store");
    assert_eq!(config.store.provider, "local");
    assert_eq!(config.store.root, "data");
    assert_eq!(config.analysis.api_url, "http://analysis.local");
    assert_eq!(config.analysis.poll_interval_ms, 1000);
    assert!(config.region.is_none());

    clear_env_vars();
}

#[test]
#[serial]
fn test_get_config_from_file_with_substitution() {
    // --- 1. Arrange ---
    clear_env_vars();
    env::set_var("TEST_ANALYSIS_URL", "http://from-env:8080");
    let file = write_config(
        r#"
port: 7070
region: eu-west-1
source_scheme: s3
store:
  provider: http
  endpoint: http://store.local
analysis:
  api_url: ${TEST_ANALYSIS_URL}
  poll_interval_ms: 250
"#,
    );

    // --- 2. Act ---
    let config = get_config(file.path().to_str()).expect("Configuration should load");

    // --- 3. Assert ---
    assert_eq!(config.port, 7070);
    assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.source_scheme, "s3");
    assert_eq!(config.store.provider, "http");
    assert_eq!(config.store.endpoint.as_deref(), Some("http://store.local"));
    assert_eq!(config.analysis.api_url, "http://from-env:8080");
    assert_eq!(config.analysis.poll_interval_ms, 250);

    clear_env_vars();
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env_vars();
    let file = write_config(
        r#"
port: 7070
analysis:
  api_url: http://file.local
"#,
    );
    env::set_var("PORT", "9999");
    env::set_var("TEXTCDE_ANALYSIS__POLL_INTERVAL_MS", "50");

    let config = get_config(file.path().to_str()).expect("Configuration should load");

    assert_eq!(config.port, 9999);
    assert_eq!(config.analysis.api_url, "http://file.local");
    assert_eq!(config.analysis.poll_interval_ms, 50);

    clear_env_vars();
}

#[test]
#[serial]
fn test_region_falls_back_to_aws_default_region() {
    clear_env_vars();
    env::set_var("TEXTCDE_ANALYSIS__API_URL", "http://analysis.local");
    env::set_var("AWS_DEFAULT_REGION", "us-east-1");

    let config = get_config(None).expect("Configuration should load");

    assert_eq!(config.region.as_deref(), Some("us-east-1"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_unset_substitutions_become_none() {
    // --- 1. Arrange ---
    clear_env_vars();
    let file = write_config(
        r#"
region: ${TEST_UNSET_REGION}
store:
  api_key: "${TEST_UNSET_KEY}"
analysis:
  api_url: http://file.local
  api_key: ${TEST_UNSET_KEY}
"#,
    );
    env::set_var("AWS_DEFAULT_REGION", "ap-south-1");

    // --- 2. Act ---
    let config = get_config(file.path().to_str()).expect("Configuration should load");

    // --- 3. Assert ---
    assert_eq!(config.region.as_deref(), Some("ap-south-1"));
    assert!(config.store.api_key.is_none());
    assert!(config.analysis.api_key.is_none());

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_analysis_url_is_an_error() {
    clear_env_vars();

    let result = get_config(None);

    assert!(matches!(result, Err(ConfigError::General(_))));
}

#[test]
#[serial]
fn test_missing_override_file_is_not_found() {
    clear_env_vars();

    let result = get_config(Some("/definitely/not/here/config.yml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}
