//! Query translation: turns a `SearchFilter` into the Google Jobs parameter dialect.

use crate::search::models::{SearchFilter, Seniority, TimeWindow};

pub const ENGINE: &str = "google_jobs";
pub const REMOTE_LOCATION: &str = "Remote";

/// A request to the upstream jobs API.
///
/// Paging with a continuation token is mutually exclusive with the fresh-query
/// fields, so each variant only carries the fields that are valid for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamQuery {
    Fresh {
        q: String,
        location: String,
        chips: Option<String>,
    },
    Continued {
        next_page_token: String,
    },
}

impl UpstreamQuery {
    /// Query-string pairs, excluding engine and credentials.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            UpstreamQuery::Fresh { q, location, chips } => {
                let mut params = vec![("q", q.as_str()), ("location", location.as_str())];
                if let Some(chips) = chips {
                    params.push(("chips", chips.as_str()));
                }
                params
            }
            UpstreamQuery::Continued { next_page_token } => {
                vec![("next_page_token", next_page_token.as_str())]
            }
        }
    }

    /// The follow-up query for a continuation token.
    pub fn continued(token: impl Into<String>) -> Self {
        UpstreamQuery::Continued {
            next_page_token: token.into(),
        }
    }
}

/// Builds the first query of a search.
pub fn translate(filter: &SearchFilter) -> UpstreamQuery {
    let title = enhance_title(&filter.title, filter.seniority);

    let (q, location) = if filter.is_remote() {
        (title, REMOTE_LOCATION.to_string())
    } else if filter.radius == 0 {
        (
            format!("{title} near \"{}\"", filter.location),
            filter.location.clone(),
        )
    } else {
        // No native radius parameter upstream; the phrase is a hint only.
        (
            format!("{title} within {} miles of {}", filter.radius, filter.location),
            filter.location.clone(),
        )
    };

    UpstreamQuery::Fresh {
        q,
        location,
        chips: chips(filter.time_window, filter.seniority),
    }
}

/// Comma-joined filter chips, or `None` when no chip applies.
fn chips(window: TimeWindow, seniority: Seniority) -> Option<String> {
    let date_chip = match window {
        TimeWindow::Any => None,
        TimeWindow::Day => Some("date_posted:today"),
        TimeWindow::Week => Some("date_posted:week"),
        TimeWindow::Month => Some("date_posted:month"),
    };

    // The upstream chip is only reliable for these two levels.
    let level_chip = match seniority {
        Seniority::MidLevel | Seniority::SeniorLevel => {
            Some(format!("experience_level:{}", seniority.as_str()))
        }
        _ => None,
    };

    let parts: Vec<String> = date_chip
        .map(str::to_string)
        .into_iter()
        .chain(level_chip)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

/// Internship and entry-level searches go through the query text instead of a chip.
fn enhance_title(title: &str, seniority: Seniority) -> String {
    let lowered = title.to_lowercase();
    match seniority {
        Seniority::Internship if !lowered.contains("intern") => format!("{title} internship"),
        Seniority::EntryLevel if !lowered.contains("entry") => format!("{title} entry level"),
        _ => title.to_string(),
    }
}
