use crate::linearize::LinearizeError;
use crate::providers::{analysis::AnalysisError, store::StoreError};
use thiserror::Error;

/// Why an enrichment fell back to the pass-through response.
///
/// Each variant corresponds to the pipeline stage that failed. Callers of
/// `Enricher::enrich` never see this type; `Enricher::process` exposes it.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Failed to download source document: {0}")]
    Download(#[source] StoreError),
    #[error("Document analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Failed to linearize analysed document: {0}")]
    Linearization(#[from] LinearizeError),
    #[error("Failed to persist linearized text: {0}")]
    Persist(#[source] StoreError),
}

/// A tag for the failed stage, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Download,
    Analysis,
    Linearization,
    Persist,
}

impl EnrichError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnrichError::Download(_) => ErrorKind::Download,
            EnrichError::Analysis(_) => ErrorKind::Analysis,
            EnrichError::Linearization(_) => ErrorKind::Linearization,
            EnrichError::Persist(_) => ErrorKind::Persist,
        }
    }
}
