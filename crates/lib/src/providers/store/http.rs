use super::{BlobStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode, Url};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A client for an S3-compatible object store using path-style addressing:
/// `{endpoint}/{bucket}/{key}`. Each key segment is percent-encoded, so keys
/// containing `#`, `?` or `%` address the object they name.
#[derive(Clone, Debug)]
pub struct HttpBlobStore {
    client: ReqwestClient,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpBlobStore {
    /// Creates a new `HttpBlobStore`.
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, StoreError> {
        let endpoint = Url::parse(&endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(StoreError::InvalidEndpoint(endpoint))?;
        let client = ReqwestClient::builder()
            .build()
            .map_err(StoreError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(bucket)
            .extend(key.trim_start_matches('/').split('/'));
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<PathBuf, StoreError> {
        let url = self.object_url(bucket, key)?;
        debug!("GET {url}");
        let response = self
            .authorize(self.client.get(url.clone()))
            .send()
            .await
            .map_err(StoreError::Request)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("GET {url} returned {status}: {error_text}")));
        }

        let bytes = response.bytes().await.map_err(StoreError::Request)?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(dest.to_path_buf())
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let url = self.object_url(bucket, key)?;
        debug!("PUT {url} ({} bytes)", body.len());
        let response = self
            .authorize(self.client.put(url.clone()))
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(StoreError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(format!("PUT {url} returned {status}: {error_text}")));
        }
        Ok(())
    }
}
