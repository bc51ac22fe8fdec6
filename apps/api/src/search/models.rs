use serde::{Deserialize, Serialize};

use crate::search::SearchError;

/// Hard ceiling on jobs returned by a single search, whatever `limit` asks for.
pub const MAX_RESULTS: u32 = 10;

/// Posting-age window the user filters on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeWindow {
    #[default]
    Any,
    /// Wire value `24h`.
    Day,
    Week,
    Month,
}

impl TimeWindow {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        match raw {
            "any" => Ok(TimeWindow::Any),
            "24h" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            other => Err(SearchError::ClientInput(format!(
                "Unsupported timeFrame '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Any => "any",
            TimeWindow::Day => "24h",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
        }
    }
}

/// Experience level the user filters on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Seniority {
    #[default]
    Any,
    Internship,
    EntryLevel,
    MidLevel,
    SeniorLevel,
}

impl Seniority {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        match raw {
            "any" => Ok(Seniority::Any),
            "internship" => Ok(Seniority::Internship),
            "entry_level" => Ok(Seniority::EntryLevel),
            "mid_level" => Ok(Seniority::MidLevel),
            "senior_level" => Ok(Seniority::SeniorLevel),
            other => Err(SearchError::ClientInput(format!(
                "Unsupported jobLevel '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Any => "any",
            Seniority::Internship => "internship",
            Seniority::EntryLevel => "entry_level",
            Seniority::MidLevel => "mid_level",
            Seniority::SeniorLevel => "senior_level",
        }
    }
}

/// Validated search filters for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub title: String,
    pub location: String,
    pub radius: u32,
    pub time_window: TimeWindow,
    pub seniority: Seniority,
    pub limit: u32,
}

impl SearchFilter {
    /// Number of jobs this search may return.
    pub fn cap(&self) -> usize {
        self.limit.min(MAX_RESULTS) as usize
    }

    pub fn is_remote(&self) -> bool {
        self.location.to_lowercase().contains("remote")
    }
}

/// A job listing normalized from whatever shape the upstream API returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Best single link to the posting.
    pub link: Option<String>,
    /// Every distinct non-empty link found on the posting.
    pub all_links: Vec<String>,
    pub posted_at: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub thumbnail: Option<String>,
}

/// Echo of the filters a search ran with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    pub query: String,
    pub location: String,
    pub radius: String,
    pub time_frame: String,
    pub job_level: String,
}

impl SearchInfo {
    pub fn from_filter(filter: &SearchFilter) -> Self {
        SearchInfo {
            query: filter.title.clone(),
            location: if filter.is_remote() {
                super::query::REMOTE_LOCATION.to_string()
            } else {
                filter.location.clone()
            },
            radius: filter.radius.to_string(),
            time_frame: filter.time_window.as_str().to_string(),
            job_level: filter.seniority.as_str().to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raw upstream shapes (SerpApi Google Jobs)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub related_links: Option<Vec<RawLink>>,
    pub apply_options: Option<Vec<RawLink>>,
    pub share_url: Option<String>,
    pub registration_form: Option<String>,
    pub detected_extensions: Option<DetectedExtensions>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedExtensions {
    pub posted_at: Option<String>,
    pub salary: Option<String>,
    pub schedule_type: Option<String>,
}

/// One batch of raw results plus the token for the next batch, if any.
#[derive(Debug, Clone, Default)]
pub struct JobPage {
    pub jobs: Vec<RawJob>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(location: &str, limit: u32) -> SearchFilter {
        SearchFilter {
            title: "Nurse".to_string(),
            location: location.to_string(),
            radius: 10,
            time_window: TimeWindow::Any,
            seniority: Seniority::Any,
            limit,
        }
    }

    #[test]
    fn test_cap_never_exceeds_ten() {
        assert_eq!(filter("Austin, TX", 50).cap(), 10);
        assert_eq!(filter("Austin, TX", 3).cap(), 3);
        assert_eq!(filter("Austin, TX", 0).cap(), 0);
    }

    #[test]
    fn test_remote_detection_is_case_insensitive() {
        assert!(filter("REMOTE, USA", 10).is_remote());
        assert!(filter("Fully remote", 10).is_remote());
        assert!(!filter("Austin, TX", 10).is_remote());
    }

    #[test]
    fn test_parse_rejects_unknown_levels() {
        assert_eq!(TimeWindow::parse("24h").unwrap(), TimeWindow::Day);
        assert_eq!(Seniority::parse("mid_level").unwrap(), Seniority::MidLevel);
        assert!(TimeWindow::parse("year").is_err());
        assert!(Seniority::parse("principal").is_err());
    }

    #[test]
    fn test_search_info_reports_remote_location() {
        let info = SearchInfo::from_filter(&filter("Remote, USA", 10));
        assert_eq!(info.location, "Remote");
        assert_eq!(info.query, "Nurse");
        assert_eq!(info.radius, "10");
    }

    #[test]
    fn test_job_record_serializes_camel_case() {
        let record = JobRecord {
            title: Some("Nurse".into()),
            company: None,
            location: None,
            description: None,
            link: None,
            all_links: vec![],
            posted_at: Some("2 days ago".into()),
            salary: None,
            job_type: Some("Full-time".into()),
            thumbnail: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["postedAt"], "2 days ago");
        assert_eq!(value["jobType"], "Full-time");
        assert!(value["allLinks"].as_array().unwrap().is_empty());
    }
}
