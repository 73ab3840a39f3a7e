use super::{AnalysisError, DocumentAnalyzer, FeatureType, JobHandle};
use crate::document::Page;
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// The default delay between job status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

// --- Wire structures ---

#[derive(Serialize)]
struct StartAnalysisRequest<'a> {
    document_location: &'a str,
    features: &'a [FeatureType],
}

#[derive(Deserialize, Debug)]
struct StartAnalysisResponse {
    job_id: String,
}

#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
    PartialSuccess,
}

#[derive(Deserialize, Debug)]
struct AnalysisResultResponse {
    job_status: JobStatus,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    next_token: Option<String>,
}

// --- Client implementation ---

/// A client for an HTTP document analysis service.
///
/// Jobs are started with `POST {api_url}/analyses` and polled with
/// `GET {api_url}/analyses/{job_id}` until they leave `IN_PROGRESS`. Large
/// results are paged through `next_token`.
#[derive(Clone, Debug)]
pub struct HttpAnalysisClient {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    poll_interval: Duration,
}

impl HttpAnalysisClient {
    /// Creates a new `HttpAnalysisClient`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        poll_interval: Duration,
    ) -> Result<Self, AnalysisError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(AnalysisError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            poll_interval,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn fetch_result(
        &self,
        job: &JobHandle,
        next_token: Option<&str>,
    ) -> Result<AnalysisResultResponse, AnalysisError> {
        let mut request = self
            .client
            .get(format!("{}/analyses/{}", self.api_url, job.job_id));
        if let Some(token) = next_token {
            request = request.query(&[("next_token", token)]);
        }
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(AnalysisError::Request)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(AnalysisError::Deserialization)
    }
}

async fn check_status(response: Response) -> Result<Response, AnalysisError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(AnalysisError::Api(format!("{status}: {error_text}")))
}

#[async_trait]
impl DocumentAnalyzer for HttpAnalysisClient {
    async fn submit(
        &self,
        source_uri: &str,
        features: &[FeatureType],
    ) -> Result<JobHandle, AnalysisError> {
        let request_body = StartAnalysisRequest {
            document_location: source_uri,
            features,
        };
        let response = self
            .authorize(self.client.post(format!("{}/analyses", self.api_url)))
            .json(&request_body)
            .send()
            .await
            .map_err(AnalysisError::Request)?;
        let started: StartAnalysisResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(AnalysisError::Deserialization)?;

        Ok(JobHandle {
            job_id: started.job_id,
        })
    }

    async fn await_result(&self, job: &JobHandle) -> Result<Vec<Page>, AnalysisError> {
        let mut result = loop {
            let result = self.fetch_result(job, None).await?;
            match result.job_status {
                JobStatus::InProgress => {
                    debug!("Job '{}' still in progress", job.job_id);
                    tokio::time::sleep(self.poll_interval).await;
                }
                JobStatus::Succeeded => break result,
                JobStatus::Failed | JobStatus::PartialSuccess => {
                    return Err(AnalysisError::JobFailed {
                        job_id: job.job_id.clone(),
                        message: result
                            .status_message
                            .unwrap_or_else(|| format!("job status {:?}", result.job_status)),
                    });
                }
            }
        };

        let mut pages = std::mem::take(&mut result.pages);
        let mut seen_tokens = HashSet::new();
        while let Some(token) = result.next_token.take() {
            if !seen_tokens.insert(token.clone()) {
                return Err(AnalysisError::Api(format!(
                    "Job '{}' repeated next_token '{token}'",
                    job.job_id
                )));
            }
            debug!("Fetching next result page for job '{}'", job.job_id);
            result = self.fetch_result(job, Some(&token)).await?;
            pages.append(&mut result.pages);
        }
        Ok(pages)
    }
}
