//! # Application Configuration
//!
//! This module defines the configuration structure for the `textcde-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use textcde::constants::DEFAULT_SOURCE_SCHEME;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The deployment region, logged with every invocation. Loaded from `REGION`,
    /// falling back to `AWS_DEFAULT_REGION`.
    #[serde(default)]
    pub region: Option<String>,
    /// Parent directory of the per-invocation download directories.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Scheme of the source locator sent to the analysis service.
    #[serde(default = "default_source_scheme")]
    pub source_scheme: String,
    /// The blob store holding source documents and linearized artifacts.
    #[serde(default)]
    pub store: StoreConfig,
    /// The document analysis service.
    pub analysis: AnalysisConfig,
}

fn default_port() -> u16 {
    9090
}

fn default_scratch_dir() -> PathBuf {
    env::temp_dir()
}

fn default_source_scheme() -> String {
    DEFAULT_SOURCE_SCHEME.to_string()
}

/// Configuration for the blob store provider.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// The type of store ("local" or "http").
    #[serde(default = "default_store_provider")]
    pub provider: String,
    /// Root directory of a local store.
    #[serde(default = "default_store_root")]
    pub root: String,
    /// Base URL of an HTTP store.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_store_provider(),
            root: default_store_root(),
            endpoint: None,
            api_key: None,
        }
    }
}

fn default_store_provider() -> String {
    "local".to_string()
}

fn default_store_root() -> String {
    "data".to_string()
}

/// Configuration for the document analysis service client.
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Layer 1: `config.yml` beside the crate, or `config_path_override` (which
///   must exist). `${VAR}` references in the file are substituted.
/// - Layer 2: top-level keys like `port` and `region` from `PORT` and `REGION`.
/// - Layer 3: nested keys from `TEXTCDE_...` variables (e.g.
///   `TEXTCDE_ANALYSIS__API_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    let main_content = match config_path_override {
        Some(override_path) => Some(read_and_substitute(override_path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{override_path}'."))
        })?),
        None => {
            let default_path = format!("{base_path}/config.yml");
            let content = read_and_substitute(&default_path)?;
            if content.is_some() {
                info!("Loading configuration from '{default_path}'.");
            }
            content
        }
    };
    if let Some(content) = main_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("TEXTCDE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // `${VAR}` references to unset variables substitute as "".
    for value in [
        &mut config.region,
        &mut config.store.endpoint,
        &mut config.store.api_key,
        &mut config.analysis.api_key,
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *value = None;
        }
    }

    if config.region.is_none() {
        if let Ok(region) = env::var("AWS_DEFAULT_REGION") {
            if !region.is_empty() {
                config.region = Some(region);
            }
        }
    }

    Ok(config)
}
