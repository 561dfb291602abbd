//! HTTP client for the board server's REST API.
//!
//! Every response body is wrapped in `{"data": ...}`. There are no retries;
//! a failed call is reported once and the caller decides what to do.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use hireboard_core::candidates::{Candidate, CandidateGatewayTrait, CandidateMove};
use hireboard_core::jobs::{Job, JobGatewayTrait};

use crate::error::{ConnectError, Result};
use crate::types::*;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the board REST API.
#[derive(Debug, Clone)]
pub struct BoardApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl BoardApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root including its prefix (e.g., "http://localhost:4000/api")
    /// * `timeout` - Applied to every request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConnectError::invalid_request(format!(
                "API URL must be http(s): {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Parse a JSON response body, unwrapping the `data` envelope.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            // Try to parse error response
            if let Some(message) = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|error| error.describe())
            {
                return Err(ConnectError::api(status.as_u16(), message));
            }
            return Err(ConnectError::api(
                status.as_u16(),
                format!(
                    "Request failed: {}",
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        serde_json::from_str::<DataEnvelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| {
                log::error!(
                    "Failed to deserialize response. Body: {}, Error: {}",
                    body,
                    e
                );
                ConnectError::api(status.as_u16(), format!("Failed to parse response: {}", e))
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Jobs
    // ─────────────────────────────────────────────────────────────────────────

    /// GET /jobs
    pub async fn get_jobs(&self) -> Result<Vec<Job>> {
        let response = self.client.get(self.url("/jobs")).send().await?;
        Self::parse_response(response).await
    }

    /// GET /jobs/{jobId}
    pub async fn fetch_job(&self, job_id: &str) -> Result<Job> {
        let url = self.url(&format!("/jobs/{}", urlencoding::encode(job_id)));
        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Candidates
    // ─────────────────────────────────────────────────────────────────────────

    /// GET /jobs/{jobId}/candidates
    pub async fn get_candidates(&self, job_id: &str) -> Result<Vec<Candidate>> {
        let url = self.url(&format!(
            "/jobs/{}/candidates",
            urlencoding::encode(job_id)
        ));
        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// PATCH /jobs/{jobId}/candidates/{candidateId}
    pub async fn update_candidate(
        &self,
        job_id: &str,
        candidate_move: &CandidateMove,
    ) -> Result<Candidate> {
        let url = self.url(&format!(
            "/jobs/{}/candidates/{}",
            urlencoding::encode(job_id),
            candidate_move.id
        ));
        debug!("Updating candidate: {:?}", candidate_move);

        let response = self
            .client
            .patch(&url)
            .json(&UpdateCandidateRequest {
                candidate: *candidate_move,
            })
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

#[async_trait]
impl CandidateGatewayTrait for BoardApiClient {
    async fn fetch_candidates(&self, job_id: &str) -> hireboard_core::Result<Vec<Candidate>> {
        Ok(self.get_candidates(job_id).await?)
    }

    async fn persist_move(
        &self,
        job_id: &str,
        candidate_move: &CandidateMove,
    ) -> hireboard_core::Result<Candidate> {
        Ok(self.update_candidate(job_id, candidate_move).await?)
    }
}

#[async_trait]
impl JobGatewayTrait for BoardApiClient {
    async fn list_jobs(&self) -> hireboard_core::Result<Vec<Job>> {
        Ok(self.get_jobs().await?)
    }

    async fn get_job(&self, job_id: &str) -> hireboard_core::Result<Option<Job>> {
        match self.fetch_job(job_id).await {
            Ok(job) => Ok(Some(job)),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND.as_u16()) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_trailing_slash() {
        let client = BoardApiClient::new("http://localhost:4000/api/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000/api");
        assert_eq!(
            client.url("/jobs/7/candidates"),
            "http://localhost:4000/api/jobs/7/candidates"
        );
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = BoardApiClient::new("ws://localhost:4000/api", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_maps_to_gateway_error() {
        // Reserve an ephemeral port, then release it so nothing listens there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let base_url = format!("http://127.0.0.1:{}/api", port);
        let client = BoardApiClient::new(&base_url, Duration::from_secs(2)).unwrap();
        let err = client.fetch_candidates("7").await.unwrap_err();
        assert!(matches!(err, hireboard_core::Error::Gateway(_)));
    }
}
