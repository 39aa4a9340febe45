use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod client;
pub mod config_file;
pub mod controller;
pub mod debounce;
pub mod format;
pub mod mock;
pub mod render;
pub mod request;
pub mod session;

// Re-export for convenience
pub use client::{HttpPaperSource, PaperSource};
pub use controller::{Applied, FetchCommand, PaperListController, Phase, RequestTicket};
pub use debounce::Debounce;
pub use render::{Card, CardLinks, ListView, render, render_html};
pub use request::PaperRequest;
pub use session::{DisplaySession, MergeOutcome};

/// Default backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Number of authors shown on a card before the rest are folded behind "show all".
pub const VISIBLE_AUTHORS: usize = 10;

/// Message shown to the user when a fetch fails.
pub const FETCH_ALERT: &str = "Error fetching papers. Please try again later.";

/// A paper as returned by the backend search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub arxiv_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub citations: i64,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_author_citations: Option<i64>,
}

impl Paper {
    /// Minimal paper with only an id and title, used heavily in tests.
    pub fn new(arxiv_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            arxiv_id: arxiv_id.into(),
            title: title.into(),
            summary: String::new(),
            authors: Vec::new(),
            citations: 0,
            publication_date: String::new(),
            image_url: String::new(),
            first_author: None,
            author_count: None,
            total_author_citations: None,
        }
    }
}

/// Server-side publication window, selected by single-select buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    Today,
    ThisWeek,
    #[default]
    ThisMonth,
    ThisYear,
    Forever,
}

impl DateRange {
    pub fn all() -> &'static [DateRange] {
        &[
            DateRange::Today,
            DateRange::ThisWeek,
            DateRange::ThisMonth,
            DateRange::ThisYear,
            DateRange::Forever,
        ]
    }

    /// The tag sent as the `d` query parameter.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::ThisWeek => "this-week",
            Self::ThisMonth => "this-month",
            Self::ThisYear => "this-year",
            Self::Forever => "forever",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This week",
            Self::ThisMonth => "This month",
            Self::ThisYear => "This year",
            Self::Forever => "All time",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&r| r == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&r| r == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DateRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|r| r.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownDateRange(s.to_string()))
    }
}

/// Failure to fetch or decode a page of papers.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend URL: {0}")]
    Url(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown date range: {0:?} (expected one of today, this-week, this-month, this-year, forever)")]
    UnknownDateRange(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Runtime configuration for the paper list.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend root, e.g. "http://localhost:8000". `/api/papers/` is appended.
    pub base_url: String,
    pub timeout_secs: u64,
    pub default_date_range: DateRange,
    /// Quiet period after the last keystroke before a search fires.
    pub debounce_ms: u64,
    /// Pagination fires when the viewport bottom is within this many rows of the end.
    pub scroll_threshold_rows: u16,
    /// Drop responses older than the newest one already applied.
    pub discard_stale_responses: bool,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            default_date_range: DateRange::ThisMonth,
            debounce_ms: 350,
            scroll_threshold_rows: 8,
            discard_stale_responses: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_tags_round_trip_through_from_str() {
        for &range in DateRange::all() {
            assert_eq!(range.tag().parse::<DateRange>().unwrap(), range);
        }
        assert_eq!(" This-Week ".parse::<DateRange>().unwrap(), DateRange::ThisWeek);
    }

    #[test]
    fn unknown_date_range_is_rejected() {
        let err = "last-decade".parse::<DateRange>().unwrap_err();
        assert!(err.to_string().contains("last-decade"));
    }

    #[test]
    fn date_range_cycles_both_ways() {
        assert_eq!(DateRange::Forever.next(), DateRange::Today);
        assert_eq!(DateRange::Today.prev(), DateRange::Forever);
        assert_eq!(DateRange::ThisMonth.next(), DateRange::ThisYear);
    }

    #[test]
    fn date_range_serializes_as_tag() {
        let json = serde_json::to_string(&DateRange::ThisYear).unwrap();
        assert_eq!(json, "\"this-year\"");
    }

    #[test]
    fn paper_tolerates_missing_and_extra_fields() {
        let json = r#"{
            "arxiv_id": "2401.00001",
            "title": "Attention",
            "authors": ["A", "B"],
            "citations": 12,
            "publication_date": "2024-01-05",
            "first_author": "A",
            "author_count": 2,
            "unexpected": true
        }"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.arxiv_id, "2401.00001");
        assert_eq!(paper.summary, "");
        assert_eq!(paper.image_url, "");
        assert_eq!(paper.author_count, Some(2));
        assert_eq!(paper.total_author_citations, None);
    }

    #[test]
    fn negative_counts_still_decode() {
        let json = r#"{"arxiv_id": "1", "citations": -1, "total_author_citations": -5}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.citations, -1);
        assert_eq!(paper.total_author_citations, Some(-5));
    }

    #[test]
    fn paper_without_id_fails_to_decode() {
        let json = r#"{"title": "No id"}"#;
        assert!(serde_json::from_str::<Paper>(json).is_err());
    }
}
