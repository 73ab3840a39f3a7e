//! # Shared Constants
//!
//! This module provides a centralized location for the fixed strings of the
//! enrichment contract. The indexing pipeline depends on these values, so they
//! are never configurable.

/// The contract version reported in every `EnrichmentResponse`.
pub const RESPONSE_VERSION: &str = "v0";

/// The key prefix under which linearized text artifacts are written.
pub const OUTPUT_KEY_PREFIX: &str = "cde_output/layout";

/// The file extension of linearized text artifacts.
pub const OUTPUT_EXTENSION: &str = "txt";

/// Reserved attribute carrying the locator of the original document.
pub const SOURCE_URI_ATTRIBUTE: &str = "_source_uri";

/// Reserved attribute carrying the original document's key suffix.
pub const FILE_TYPE_ATTRIBUTE: &str = "_file_type";

/// The default scheme of source locators (`store://bucket/key`).
pub const DEFAULT_SOURCE_SCHEME: &str = "store";

/// Media types the analysis service accepts.
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/tiff", "application/pdf"];
