use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use textcde::{
    AnalysisError, BlobStore, DocumentAnalyzer, FeatureType, JobHandle, LayoutBlock, Page,
    StoreError, Table, TableCell, TableRow,
};

// --- Mock Blob Store ---

/// An in-memory blob store keyed by `(bucket, key)`.
///
/// Clones share the same objects, so a test can keep a handle after boxing one
/// into an `Enricher`.
#[derive(Clone, Debug, Default)]
pub struct MockBlobStore {
    objects: Arc<Mutex<HashMap<(String, String), Vec<u8>>>>,
    fail_fetch: Arc<Mutex<bool>>,
    fail_put: Arc<Mutex<bool>>,
    fetches: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: &[u8]) {
        let mut objects = self.objects.lock().unwrap();
        objects.insert((bucket.to_string(), key.to_string()), body.to_vec());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let objects = self.objects.lock().unwrap();
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys present in `bucket`, sorted.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let objects = self.objects.lock().unwrap();
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Makes every subsequent `fetch` fail.
    pub fn fail_fetches(&self) {
        *self.fail_fetch.lock().unwrap() = true;
    }

    /// Makes every subsequent `put` fail.
    pub fn fail_puts(&self) {
        *self.fail_put.lock().unwrap() = true;
    }

    /// The local paths objects were downloaded to.
    pub fn fetch_paths(&self) -> Vec<PathBuf> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<PathBuf, StoreError> {
        if *self.fail_fetch.lock().unwrap() {
            return Err(StoreError::Api("MockBlobStore: fetch failure injected".to_string()));
        }
        let body = self.get(bucket, key).ok_or_else(|| StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;
        tokio::fs::write(dest, body).await?;
        self.fetches.lock().unwrap().push(dest.to_path_buf());
        Ok(dest.to_path_buf())
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        if *self.fail_put.lock().unwrap() {
            return Err(StoreError::Api("MockBlobStore: put failure injected".to_string()));
        }
        self.insert(bucket, key, &body);
        Ok(())
    }
}

// --- Mock Analyzer ---

/// An analysis service that returns pre-programmed pages.
#[derive(Clone, Debug, Default)]
pub struct MockAnalyzer {
    pages: Arc<Mutex<Vec<Page>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, Vec<FeatureType>)>>>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An analyzer that answers every job with `pages`.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let analyzer = Self::new();
        *analyzer.pages.lock().unwrap() = pages;
        analyzer
    }

    /// An analyzer whose jobs always fail with `message`.
    pub fn failing(message: &str) -> Self {
        let analyzer = Self::new();
        *analyzer.failure.lock().unwrap() = Some(message.to_string());
        analyzer
    }

    /// Retrieves the recorded submissions for assertion.
    pub fn get_calls(&self) -> Vec<(String, Vec<FeatureType>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentAnalyzer for MockAnalyzer {
    async fn submit(
        &self,
        source_uri: &str,
        features: &[FeatureType],
    ) -> Result<JobHandle, AnalysisError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((source_uri.to_string(), features.to_vec()));
        Ok(JobHandle {
            job_id: format!("mock-job-{}", calls.len()),
        })
    }

    async fn await_result(&self, job: &JobHandle) -> Result<Vec<Page>, AnalysisError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(AnalysisError::JobFailed {
                job_id: job.job_id.clone(),
                message,
            });
        }
        Ok(self.pages.lock().unwrap().clone())
    }
}

// --- Fixtures ---

pub mod fixtures {
    use super::*;

    /// Leading bytes of each media type, enough for sniffing.
    pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";
    pub const TIFF_BYTES: &[u8] = b"II*\x00\x08\x00\x00\x00";
    pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n";
    pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00";

    pub fn title(text: &str) -> LayoutBlock {
        LayoutBlock::Title {
            text: text.to_string(),
        }
    }

    pub fn text(text: &str) -> LayoutBlock {
        LayoutBlock::Text {
            text: text.to_string(),
        }
    }

    /// A table whose first row holds header cells.
    pub fn table(header: &[&str], rows: &[&[&str]]) -> LayoutBlock {
        let mut table_rows = vec![TableRow {
            cells: header.iter().map(|c| TableCell::header(c)).collect(),
        }];
        table_rows.extend(rows.iter().map(|row| TableRow {
            cells: row.iter().map(|c| TableCell::data(c)).collect(),
        }));
        LayoutBlock::Table(Table { rows: table_rows })
    }

    /// A page with a title and one paragraph naming the page.
    pub fn simple_page(page_num: u32) -> Page {
        Page::new(
            page_num,
            vec![
                title(&format!("Page {page_num} title")),
                text(&format!("Body of page {page_num}.")),
            ],
        )
    }
}
