//! Mock paper source for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::{FetchFuture, PaperSource};
use crate::request::PaperRequest;
use crate::{FetchError, Paper};

/// A configurable mock response for [`MockSource`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// A page of papers.
    Page(Vec<Paper>),
    /// Simulate a non-2xx status.
    Status(u16),
    /// Simulate a transport or decode failure.
    Error(String),
}

/// A hand-rolled mock implementing [`PaperSource`] for tests.
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the fallback once exhausted).
/// - Optional per-call latency.
/// - Recording every request it receives.
pub struct MockSource {
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    requests: Mutex<Vec<PaperRequest>>,
}

impl MockSource {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns `responses` in order, then empty pages.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            fallback: MockResponse::Page(Vec::new()),
            delay: None,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `fetch()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<PaperRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn next_response(&self) -> MockResponse {
        match self.responses.lock() {
            Ok(mut seq) => seq.pop().unwrap_or_else(|| self.fallback.clone()),
            Err(_) => self.fallback.clone(),
        }
    }
}

impl PaperSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch<'a>(&'a self, request: &'a PaperRequest) -> FetchFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        let response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Page(papers) => Ok(papers),
                MockResponse::Status(code) => Err(FetchError::Status(code)),
                MockResponse::Error(msg) => Err(FetchError::Other(msg)),
            }
        })
    }
}
