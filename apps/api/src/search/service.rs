//! Sequential fetch-until-satisfied pagination over the upstream jobs API.

use tracing::{debug, info};

use crate::search::client::JobSearchApi;
use crate::search::models::{JobRecord, SearchFilter};
use crate::search::normalize::normalize;
use crate::search::query::{translate, UpstreamQuery};
use crate::search::SearchError;

/// Jobs collected for one search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// At most `filter.cap()` records, in upstream order.
    pub jobs: Vec<JobRecord>,
    /// Records fetched before truncation to the cap.
    pub fetched: usize,
    /// Upstream calls made.
    #[allow(dead_code)]
    pub calls: usize,
}

/// Runs a search to completion, cap, or first failure.
pub async fn search_jobs(
    api: &dyn JobSearchApi,
    filter: &SearchFilter,
) -> Result<SearchOutcome, SearchError> {
    let cap = filter.cap();
    let mut jobs: Vec<JobRecord> = Vec::new();
    let mut calls = 0;
    let mut query = translate(filter);

    while jobs.len() < cap {
        let page = api.fetch_page(&query).await?;
        calls += 1;

        if page.jobs.is_empty() {
            break;
        }

        jobs.extend(page.jobs.into_iter().map(normalize));
        debug!("Fetched page {calls}: {} jobs so far", jobs.len());

        match page.next_page_token {
            Some(token) if jobs.len() < cap => query = UpstreamQuery::continued(token),
            _ => break,
        }
    }

    let fetched = jobs.len();
    jobs.truncate(cap);

    info!(
        "Job search for '{}' returned {} of {fetched} fetched jobs in {calls} calls",
        filter.title,
        jobs.len()
    );

    Ok(SearchOutcome {
        jobs,
        fetched,
        calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::models::{JobPage, Seniority, TimeWindow};
    use crate::search::test_support::{raw_job, ScriptedApi};

    fn filter(limit: u32) -> SearchFilter {
        SearchFilter {
            title: "Nurse".to_string(),
            location: "Austin, TX".to_string(),
            radius: 10,
            time_window: TimeWindow::Week,
            seniority: Seniority::Any,
            limit,
        }
    }

    fn page(n: usize, start: usize, token: Option<&str>) -> JobPage {
        JobPage {
            jobs: (start..start + n).map(raw_job).collect(),
            next_page_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_single_page_without_token() {
        let api = ScriptedApi::new(vec![Ok(page(4, 0, None))]);
        let outcome = search_jobs(&api, &filter(10)).await.unwrap();
        assert_eq!(outcome.jobs.len(), 4);
        assert_eq!(outcome.calls, 1);
    }

    #[tokio::test]
    async fn test_follows_tokens_until_cap() {
        let api = ScriptedApi::new(vec![
            Ok(page(4, 0, Some("t1"))),
            Ok(page(4, 4, Some("t2"))),
            Ok(page(4, 8, Some("t3"))),
            Ok(page(4, 12, Some("t4"))),
        ]);
        let outcome = search_jobs(&api, &filter(10)).await.unwrap();

        assert_eq!(outcome.jobs.len(), 10);
        assert_eq!(outcome.fetched, 12);
        // ceil(10 / 4)
        assert_eq!(outcome.calls, 3);
        assert_eq!(outcome.jobs[9].title.as_deref(), Some("Job 9"));

        let queries = api.queries();
        assert!(matches!(queries[0], UpstreamQuery::Fresh { .. }));
        assert_eq!(queries[1], UpstreamQuery::continued("t1"));
        assert_eq!(queries[2], UpstreamQuery::continued("t2"));
    }

    #[tokio::test]
    async fn test_limit_above_ten_is_capped() {
        let api = ScriptedApi::new(vec![
            Ok(page(10, 0, Some("t1"))),
            Ok(page(10, 10, Some("t2"))),
        ]);
        let outcome = search_jobs(&api, &filter(50)).await.unwrap();
        assert_eq!(outcome.jobs.len(), 10);
        assert_eq!(outcome.calls, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_stops() {
        let api = ScriptedApi::new(vec![Ok(page(3, 0, Some("t1"))), Ok(page(0, 0, Some("t2")))]);
        let outcome = search_jobs(&api, &filter(10)).await.unwrap();
        assert_eq!(outcome.jobs.len(), 3);
        assert_eq!(outcome.calls, 2);
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_calls() {
        let api = ScriptedApi::new(vec![]);
        let outcome = search_jobs(&api, &filter(0)).await.unwrap();
        assert!(outcome.jobs.is_empty());
        assert_eq!(outcome.calls, 0);
        assert!(api.queries().is_empty());
    }

    #[tokio::test]
    async fn test_failure_mid_pagination_aborts() {
        let api = ScriptedApi::new(vec![
            Ok(page(4, 0, Some("t1"))),
            Err("rate limited".to_string()),
        ]);
        let err = search_jobs(&api, &filter(10)).await.unwrap_err();
        assert!(matches!(err, SearchError::Upstream(_)));
        assert_eq!(api.queries().len(), 2);
    }
}
