//! # Layout Enrichment Connector
//!
//! This crate turns a document in blob storage into a linearized, annotated text
//! artifact for an enterprise search index. It classifies the document, sends it
//! to a document analysis service, flattens the returned page structure into
//! text, writes that text back to the store and answers the indexing pipeline
//! with updated metadata.
//!
//! The blob store and the analysis service are injected through the
//! [`BlobStore`] and [`DocumentAnalyzer`] traits, so the pipeline can run
//! against any backend, including in-memory fakes.

pub mod classify;
pub mod constants;
pub mod document;
pub mod enrich;
pub mod errors;
pub mod keys;
pub mod linearize;
pub mod providers;
pub mod types;

pub use classify::{classify, ClassificationResult};
pub use document::{AnalysisDocument, LayoutBlock, Page, Table, TableCell, TableRow};
pub use enrich::{Enricher, EnricherConfig, EnrichmentOutcome};
pub use errors::{EnrichError, ErrorKind};
pub use linearize::{linearize, LinearizationConfig, LinearizeError};
pub use providers::analysis::{analyze, AnalysisError, DocumentAnalyzer, FeatureType, JobHandle};
pub use providers::store::{BlobStore, StoreError};
pub use types::{
    AttributeValue, DocumentAttribute, DocumentMetadata, EnrichmentRequest, EnrichmentResponse,
};
