//! # Enrichment Orchestrator
//!
//! Runs one document through classification, analysis, linearization and
//! persistence, and builds the response for the indexing pipeline.
//!
//! The orchestrator never fails outward: if the document is unsupported, or any
//! stage errors, the caller receives the pass-through response built before any
//! work started. The stage that failed is kept on the `EnrichmentOutcome` for
//! inspection.

use crate::{
    classify::classify,
    constants::DEFAULT_SOURCE_SCHEME,
    errors::{EnrichError, ErrorKind},
    keys::{self, SourceLocator},
    linearize::{linearize, LinearizationConfig},
    providers::{
        analysis::{analyze, DocumentAnalyzer, FeatureType},
        store::{BlobStore, StoreError},
    },
    types::{EnrichmentRequest, EnrichmentResponse},
};
use std::path::PathBuf;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// File name used for objects whose key ends in `/`.
const FALLBACK_FILE_NAME: &str = "object";

/// Settings shared by every invocation of an `Enricher`.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Parent directory of the per-invocation download directories.
    pub scratch_dir: PathBuf,
    /// Scheme of the source locator handed to the analysis service.
    pub source_scheme: String,
    pub linearization: LinearizationConfig,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            source_scheme: DEFAULT_SOURCE_SCHEME.to_string(),
            linearization: LinearizationConfig::enrichment(),
        }
    }
}

/// How an invocation ended.
#[derive(Debug)]
pub enum EnrichmentOutcome {
    /// The document was linearized and persisted.
    Enriched(EnrichmentResponse),
    /// The document's media type is not supported; nothing was done.
    Unsupported(EnrichmentResponse),
    /// A stage failed; the response is the pass-through one.
    Failed {
        response: EnrichmentResponse,
        error: EnrichError,
    },
}

impl EnrichmentOutcome {
    pub fn response(&self) -> &EnrichmentResponse {
        match self {
            EnrichmentOutcome::Enriched(response)
            | EnrichmentOutcome::Unsupported(response)
            | EnrichmentOutcome::Failed { response, .. } => response,
        }
    }

    pub fn into_response(self) -> EnrichmentResponse {
        match self {
            EnrichmentOutcome::Enriched(response)
            | EnrichmentOutcome::Unsupported(response)
            | EnrichmentOutcome::Failed { response, .. } => response,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            EnrichmentOutcome::Failed { error, .. } => Some(error.kind()),
            _ => None,
        }
    }
}

/// Enriches documents using an injected blob store and analysis service.
#[derive(Clone, Debug)]
pub struct Enricher {
    store: Box<dyn BlobStore>,
    analyzer: Box<dyn DocumentAnalyzer>,
    config: EnricherConfig,
}

impl Enricher {
    pub fn new(
        store: Box<dyn BlobStore>,
        analyzer: Box<dyn DocumentAnalyzer>,
        config: EnricherConfig,
    ) -> Self {
        Self {
            store,
            analyzer,
            config,
        }
    }

    /// Enriches a document and returns the response for the indexing pipeline.
    pub async fn enrich(&self, request: &EnrichmentRequest) -> EnrichmentResponse {
        self.process(request).await.into_response()
    }

    /// Enriches a document, keeping track of why it fell back, if it did.
    pub async fn process(&self, request: &EnrichmentRequest) -> EnrichmentOutcome {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "enrich",
            %invocation_id,
            bucket = %request.s3_bucket,
            key = %request.s3_object_key
        );

        async move {
            let fallback = EnrichmentResponse::passthrough(request);
            match self.run_pipeline(request, invocation_id).await {
                Ok(Some(response)) => {
                    info!(
                        "Responding to indexer with: {}",
                        serde_json::to_string(&response).unwrap_or_default()
                    );
                    EnrichmentOutcome::Enriched(response)
                }
                Ok(None) => {
                    info!("Document is not a supported file type (PNG, JPEG, TIFF, PDF)");
                    EnrichmentOutcome::Unsupported(fallback)
                }
                Err(error) => {
                    error!(kind = ?error.kind(), "Error in enrichment function: {error}");
                    EnrichmentOutcome::Failed {
                        response: fallback,
                        error,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Returns `Ok(None)` when the document is unsupported.
    async fn run_pipeline(
        &self,
        request: &EnrichmentRequest,
        invocation_id: Uuid,
    ) -> Result<Option<EnrichmentResponse>, EnrichError> {
        let bucket = &request.s3_bucket;
        let key = &request.s3_object_key;

        // The directory and the download inside it are removed on drop.
        let scratch = tempfile::Builder::new()
            .prefix(&format!("cde-{invocation_id}-"))
            .tempdir_in(&self.config.scratch_dir)
            .map_err(|e| EnrichError::Download(StoreError::Io(e)))?;
        let file_name = match keys::basename(key) {
            "" => FALLBACK_FILE_NAME,
            name => name,
        };
        let local_path = self
            .store
            .fetch(bucket, key, &scratch.path().join(file_name))
            .await
            .map_err(EnrichError::Download)?;

        let classification = classify(&local_path, key);
        if !classification.is_supported {
            return Ok(None);
        }

        let locator = SourceLocator::new(&self.config.source_scheme, bucket, key).to_string();
        let document =
            analyze(self.analyzer.as_ref(), &locator, &FeatureType::ENRICHMENT_SET).await?;

        let text = linearize(&document, &self.config.linearization)?;

        let output_key = keys::output_key(key);
        self.store
            .put(bucket, &output_key, text.into_bytes())
            .await
            .map_err(EnrichError::Persist)?;
        info!("Wrote linearized text to '{bucket}/{output_key}'");

        Ok(Some(EnrichmentResponse::enriched(
            output_key,
            &locator,
            &classification.file_extension,
        )))
    }
}
