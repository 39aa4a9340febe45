//! Backend query construction for `GET /api/papers/`.

use crate::{DateRange, FetchError};

pub const PAPERS_PATH: &str = "/api/papers/";

/// One request to the papers endpoint.
///
/// A request with no `offset` is a fresh search; one with an offset is a
/// pagination request continuing the current result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRequest {
    pub query: Option<String>,
    pub date_range: DateRange,
    pub offset: Option<usize>,
}

impl PaperRequest {
    /// A fresh search. Empty text means "no query".
    pub fn fresh(query: &str, date_range: DateRange) -> Self {
        Self {
            query: non_empty(query),
            date_range,
            offset: None,
        }
    }

    /// The next page of the current filter, starting after `offset` papers.
    pub fn page(query: &str, date_range: DateRange, offset: usize) -> Self {
        Self {
            query: non_empty(query),
            date_range,
            offset: Some(offset),
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.offset.is_none()
    }

    /// Path plus query string, parameters in `q`, `d`, `s` order.
    pub fn path_and_query(&self) -> String {
        let mut url = String::from(PAPERS_PATH);
        url.push('?');
        if let Some(q) = &self.query {
            url.push_str("q=");
            url.push_str(&urlencoding::encode(q));
            url.push('&');
        }
        url.push_str("d=");
        url.push_str(self.date_range.tag());
        if let Some(offset) = self.offset {
            url.push_str(&format!("&s={offset}"));
        }
        url
    }

    /// Full URL against a backend root such as `http://localhost:8000`.
    pub fn url(&self, base_url: &str) -> Result<String, FetchError> {
        let base = base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(FetchError::Url(base_url.to_string()));
        }
        Ok(format!("{}{}", base, self.path_and_query()))
    }
}

fn non_empty(query: &str) -> Option<String> {
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}
