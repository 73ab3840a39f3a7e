//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The store and analysis clients are created once
//! here and shared by every request through a single `Enricher`.

use crate::config::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use textcde::{
    providers::{
        analysis::HttpAnalysisClient,
        store::{HttpBlobStore, LocalBlobStore},
    },
    BlobStore, DocumentAnalyzer, Enricher, EnricherConfig,
};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    pub enricher: Arc<Enricher>,
}

/// Instantiates the blob store named by the `store` section of the config.
fn build_store(config: &AppConfig) -> anyhow::Result<Box<dyn BlobStore>> {
    let store: Box<dyn BlobStore> = match config.store.provider.as_str() {
        "local" => Box::new(LocalBlobStore::new(&config.store.root)),
        "http" => {
            let endpoint = config.store.endpoint.clone().ok_or_else(|| {
                anyhow::anyhow!("store.endpoint is required for the http store provider")
            })?;
            Box::new(HttpBlobStore::new(endpoint, config.store.api_key.clone())?)
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported store provider '{other}'"));
        }
    };
    Ok(store)
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let store = build_store(&config)?;
    let analyzer: Box<dyn DocumentAnalyzer> = Box::new(HttpAnalysisClient::new(
        config.analysis.api_url.clone(),
        config.analysis.api_key.clone(),
        Duration::from_millis(config.analysis.poll_interval_ms),
    )?);

    let enricher = Enricher::new(
        store,
        analyzer,
        EnricherConfig {
            scratch_dir: config.scratch_dir.clone(),
            source_scheme: config.source_scheme.clone(),
            ..Default::default()
        },
    );

    Ok(AppState {
        config: Arc::new(config),
        enricher: Arc::new(enricher),
    })
}
