pub mod http;
pub mod local;

use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use http::HttpBlobStore;
pub use local::LocalBlobStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object '{key}' not found in bucket '{bucket}'")]
    NotFound { bucket: String, key: String },
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),
    #[error("Invalid blob store endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("Local file operation failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to blob store: {0}")]
    Request(reqwest::Error),
    #[error("Blob store returned an error: {0}")]
    Api(String),
}

/// A trait for reading and writing objects in a blob store.
///
/// Only fetch-by-key and put-by-key are needed; there is no listing,
/// versioning or deletion.
#[async_trait]
pub trait BlobStore: Send + Sync + Debug + DynClone {
    /// Downloads `bucket/key` into the local file `dest` and returns its path.
    async fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<PathBuf, StoreError>;

    /// Writes `body` to `bucket/key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
}

dyn_clone::clone_trait_object!(BlobStore);
