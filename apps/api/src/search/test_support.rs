use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::search::client::{JobSearchApi, UpstreamError};
use crate::search::models::{JobPage, RawJob};
use crate::search::query::UpstreamQuery;

/// Replays canned pages in order and records every query it receives.
/// Once the script runs out it answers with empty pages.
pub struct ScriptedApi {
    pages: Mutex<VecDeque<Result<JobPage, String>>>,
    queries: Mutex<Vec<UpstreamQuery>>,
}

impl ScriptedApi {
    pub fn new(pages: Vec<Result<JobPage, String>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<UpstreamQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSearchApi for ScriptedApi {
    async fn fetch_page(&self, query: &UpstreamQuery) -> Result<JobPage, UpstreamError> {
        self.queries.lock().unwrap().push(query.clone());
        match self.pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(UpstreamError::Reported(message)),
            None => Ok(JobPage::default()),
        }
    }
}

pub fn raw_job(i: usize) -> RawJob {
    RawJob {
        title: Some(format!("Job {i}")),
        company_name: Some(format!("Company {i}")),
        link: Some(format!("https://jobs.example.com/{i}")),
        ..Default::default()
    }
}
