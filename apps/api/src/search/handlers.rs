use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::search::models::{JobRecord, SearchFilter, SearchInfo, Seniority, TimeWindow};
use crate::search::service::search_jobs;
use crate::search::SearchError;
use crate::state::AppState;

const NO_JOBS_MESSAGE: &str = "No jobs found for the given criteria";

/// Raw query string of `GET /api/job-search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchParams {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub radius: Option<String>,
    pub time_frame: Option<String>,
    pub job_level: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JobSearchResponse {
    #[serde(rename_all = "camelCase")]
    Found {
        success: bool,
        jobs: Vec<JobRecord>,
        total_results: usize,
        search_info: SearchInfo,
    },
    Empty {
        success: bool,
        jobs: Vec<JobRecord>,
        message: String,
    },
}

impl JobSearchParams {
    /// Validates the query string. Missing title or location is rejected
    /// before anything else is looked at.
    pub fn into_filter(self) -> Result<SearchFilter, SearchError> {
        let title = non_blank(self.job_title);
        let location = non_blank(self.location);
        let (Some(title), Some(location)) = (title, location) else {
            return Err(SearchError::ClientInput(
                "Job title and location are required".to_string(),
            ));
        };

        Ok(SearchFilter {
            title,
            location,
            radius: parse_count("radius", self.radius, 10)?,
            time_window: match non_blank(self.time_frame) {
                Some(raw) => TimeWindow::parse(&raw)?,
                None => TimeWindow::Any,
            },
            seniority: match non_blank(self.job_level) {
                Some(raw) => Seniority::parse(&raw)?,
                None => Seniority::Any,
            },
            limit: parse_count("limit", self.limit, 10)?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_count(name: &str, raw: Option<String>, default: u32) -> Result<u32, SearchError> {
    match non_blank(raw) {
        None => Ok(default),
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            SearchError::ClientInput(format!("{name} must be a non-negative integer"))
        }),
    }
}

/// GET /api/job-search
pub async fn handle_job_search(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<JobSearchResponse>, SearchError> {
    let filter = params.into_filter()?;
    let api = state.job_search.as_ref().ok_or(SearchError::Configuration)?;

    let outcome = search_jobs(api.as_ref(), &filter).await?;

    if outcome.jobs.is_empty() {
        return Ok(Json(JobSearchResponse::Empty {
            success: true,
            jobs: Vec::new(),
            message: NO_JOBS_MESSAGE.to_string(),
        }));
    }

    Ok(Json(JobSearchResponse::Found {
        success: true,
        jobs: outcome.jobs,
        total_results: outcome.fetched,
        search_info: SearchInfo::from_filter(&filter),
    }))
}
