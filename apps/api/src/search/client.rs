//! SerpApi Google Jobs client.
//!
//! Every upstream request goes through the `JobSearchApi` trait so the
//! pagination loop can run against a scripted fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::search::models::{JobPage, RawJob};
use crate::search::query::{UpstreamQuery, ENGINE};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("SerpAPI error: {0}")]
    Reported(String),
}

/// One page of results per call; no retries.
#[async_trait]
pub trait JobSearchApi: Send + Sync {
    async fn fetch_page(&self, query: &UpstreamQuery) -> Result<JobPage, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    jobs_results: Option<Vec<RawJob>>,
    serpapi_pagination: Option<SerpApiPagination>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiPagination {
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/search.json", self.base_url)
    }
}

#[async_trait]
impl JobSearchApi for SerpApiClient {
    async fn fetch_page(&self, query: &UpstreamQuery) -> Result<JobPage, UpstreamError> {
        let mut params = vec![("engine", ENGINE), ("api_key", self.api_key.as_str())];
        params.extend(query.params());

        debug!(
            "SerpAPI request ({})",
            match query {
                UpstreamQuery::Fresh { .. } => "fresh",
                UpstreamQuery::Continued { .. } => "continued",
            }
        );

        let response = self
            .client
            .get(self.endpoint())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<SerpApiErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            error!("SerpAPI returned {status}: {message}");
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_page(&body)
    }
}

/// Parses a successful SerpApi body into a page.
fn parse_page(body: &str) -> Result<JobPage, UpstreamError> {
    let parsed: SerpApiResponse = serde_json::from_str(body)?;

    if let Some(message) = parsed.error {
        // An exhausted search is reported as an error string, not an empty list.
        if is_empty_result_message(&message) {
            debug!("SerpAPI reported no results: {message}");
            return Ok(JobPage::default());
        }
        return Err(UpstreamError::Reported(message));
    }

    Ok(JobPage {
        jobs: parsed.jobs_results.unwrap_or_default(),
        next_page_token: parsed
            .serpapi_pagination
            .and_then(|p| p.next_page_token)
            .filter(|t| !t.is_empty()),
    })
}

fn is_empty_result_message(message: &str) -> bool {
    message.to_lowercase().contains("hasn't returned any results")
}
