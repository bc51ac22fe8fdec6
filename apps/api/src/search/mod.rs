//! Job search: translates user filters into SerpApi Google Jobs queries,
//! pages through results sequentially and normalizes each listing.

pub mod client;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod query;
pub mod service;

#[cfg(test)]
pub mod test_support;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::client::UpstreamError;

/// Failures of the job-search endpoint. The body shape is flat
/// (`{error, details?}`) because browser clients read `error` directly.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    ClientInput(String),

    #[error("SerpAPI key not configured")]
    Configuration,

    #[error("Failed to fetch jobs from SerpAPI")]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            SearchError::ClientInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            SearchError::Configuration => {
                tracing::error!("Job search requested but SERPAPI_API_KEY is not set");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
            SearchError::Upstream(e) => {
                tracing::error!("SerpAPI error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string(), "details": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
