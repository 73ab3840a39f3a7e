//! # Enrichment Contract Types
//!
//! The request and response shapes exchanged with the indexing pipeline. Field
//! names follow the pipeline's camelCase wire format.

use crate::constants::{FILE_TYPE_ATTRIBUTE, RESPONSE_VERSION, SOURCE_URI_ATTRIBUTE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The value of a document attribute.
///
/// Kept as the raw JSON the pipeline sent, so a pass-through response returns
/// it unchanged. Values this crate emits use the typed
/// `{"stringValue": ...}` form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct AttributeValue(pub Value);

impl AttributeValue {
    /// Builds a `{"stringValue": ...}` value.
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue(json!({ "stringValue": value.into() }))
    }

    /// Returns the string payload of a typed string value, or of a bare string.
    pub fn as_str(&self) -> Option<&str> {
        match &self.0 {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("stringValue")?.as_str(),
            _ => None,
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        AttributeValue(value)
    }
}

/// A single named document attribute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentAttribute {
    pub name: String,
    pub value: AttributeValue,
}

impl DocumentAttribute {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::string(value),
        }
    }
}

/// The metadata bundle attached to a document.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub attributes: Vec<DocumentAttribute>,
}

/// The event the indexing pipeline sends for each document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    pub s3_bucket: String,
    pub s3_object_key: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// The record returned to the indexing pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResponse {
    pub version: String,
    pub s3_object_key: String,
    pub metadata_updates: Vec<DocumentAttribute>,
}

impl EnrichmentResponse {
    /// The response that leaves the document untouched: original key and the
    /// caller's attributes, unmodified.
    pub fn passthrough(request: &EnrichmentRequest) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            s3_object_key: request.s3_object_key.clone(),
            metadata_updates: request.metadata.attributes.clone(),
        }
    }

    /// The response pointing the pipeline at a linearized artifact.
    pub fn enriched(output_key: String, source_uri: &str, file_type: &str) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            s3_object_key: output_key,
            metadata_updates: vec![
                DocumentAttribute::string(SOURCE_URI_ATTRIBUTE, source_uri),
                DocumentAttribute::string(FILE_TYPE_ATTRIBUTE, file_type),
            ],
        }
    }
}
