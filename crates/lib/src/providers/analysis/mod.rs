pub mod http;

use crate::document::{AnalysisDocument, Page};
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{info, instrument};

pub use http::HttpAnalysisClient;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the analysis service: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize analysis service response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Analysis service returned an error: {0}")]
    Api(String),
    #[error("Analysis job '{job_id}' did not succeed: {message}")]
    JobFailed { job_id: String, message: String },
}

/// The kinds of structure the analysis service can extract.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    Layout,
    Tables,
    Forms,
    Signatures,
}

impl FeatureType {
    /// The features requested for every enrichment.
    pub const ENRICHMENT_SET: [FeatureType; 4] = [
        FeatureType::Layout,
        FeatureType::Tables,
        FeatureType::Forms,
        FeatureType::Signatures,
    ];
}

/// Identifies a submitted analysis job.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
}

/// A trait for an asynchronous document analysis service.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync + Debug + DynClone {
    /// Starts an analysis job for the document at `source_uri`.
    async fn submit(
        &self,
        source_uri: &str,
        features: &[FeatureType],
    ) -> Result<JobHandle, AnalysisError>;

    /// Waits until the job has fully completed and returns all of its pages.
    async fn await_result(&self, job: &JobHandle) -> Result<Vec<Page>, AnalysisError>;
}

dyn_clone::clone_trait_object!(DocumentAnalyzer);

/// Submits a document for analysis and blocks until the complete result is
/// available. Failures are returned as-is; nothing is retried.
#[instrument(skip(analyzer, features))]
pub async fn analyze(
    analyzer: &dyn DocumentAnalyzer,
    source_uri: &str,
    features: &[FeatureType],
) -> Result<AnalysisDocument, AnalysisError> {
    let job = analyzer.submit(source_uri, features).await?;
    info!("Started analysis job '{}' for '{}'", job.job_id, source_uri);
    let pages = analyzer.await_result(&job).await?;
    info!(
        "Analysis job '{}' completed with {} page(s)",
        job.job_id,
        pages.len()
    );
    Ok(AnalysisDocument::new(pages))
}
