use std::time::Instant;

use paperdeck_core::{Applied, FetchCommand, PaperListController, PaperSource};

/// Outcome of a multi-page search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    /// Requests that were sent (fresh search included).
    pub requests: usize,
    /// The backend ran out of results before `pages` was reached.
    pub exhausted: bool,
}

/// Run a fresh search followed by up to `pages - 1` continuation pages.
///
/// Requests go out one at a time, the same way a user scrolling to the end
/// of the list would trigger them. A failed request aborts the whole search.
pub async fn run(
    source: &dyn PaperSource,
    controller: &mut PaperListController,
    query: Option<&str>,
    pages: usize,
) -> anyhow::Result<SearchSummary> {
    let first = match query.filter(|q| !q.is_empty()) {
        Some(q) => {
            controller.on_input(q, Instant::now());
            controller.on_enter()
        }
        None => controller.initial_load(),
    };

    let mut summary = SearchSummary {
        requests: 0,
        exhausted: false,
    };
    let mut next = Some(first);
    while let Some(cmd) = next.take() {
        summary.requests += 1;
        if fetch_and_apply(source, controller, cmd).await? {
            summary.exhausted = true;
            break;
        }
        if summary.requests >= pages || controller.session().is_empty_state() {
            break;
        }
        next = controller.on_scroll(true);
    }

    tracing::debug!(
        requests = summary.requests,
        exhausted = summary.exhausted,
        displayed = controller.session().displayed_count(),
        "search finished"
    );
    Ok(summary)
}

/// Returns whether pagination is exhausted.
async fn fetch_and_apply(
    source: &dyn PaperSource,
    controller: &mut PaperListController,
    cmd: FetchCommand,
) -> anyhow::Result<bool> {
    let result = source.fetch(&cmd.request).await;
    match controller.apply(cmd.ticket, result) {
        Applied::Merged(outcome) => Ok(outcome.exhausted),
        Applied::Stale => Ok(false),
        Applied::Failed { alert, error } => anyhow::bail!("{alert} ({error})"),
    }
}

#[cfg(test)]
mod tests {
    use paperdeck_core::mock::{MockResponse, MockSource};
    use paperdeck_core::{Config, Paper};

    use super::*;

    fn page(ids: &[&str]) -> MockResponse {
        MockResponse::Page(ids.iter().map(|id| Paper::new(*id, format!("T{id}"))).collect())
    }

    #[tokio::test]
    async fn fetches_requested_number_of_pages() {
        let source = MockSource::with_sequence(vec![page(&["A", "B"]), page(&["B", "C"]), page(&["D"])]);
        let mut controller = PaperListController::new(&Config::default());

        let summary = run(&source, &mut controller, Some("graphs"), 2).await.unwrap();

        assert_eq!(summary, SearchSummary { requests: 2, exhausted: false });
        assert_eq!(controller.session().len(), 3);
        assert_eq!(controller.session().displayed_count(), 4);
        let offsets: Vec<_> = source.requests().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![None, Some(2)]);
        assert_eq!(source.requests()[1].query.as_deref(), Some("graphs"));
    }

    #[tokio::test]
    async fn stops_when_backend_runs_dry() {
        // Fallback after the sequence is an empty page.
        let source = MockSource::with_sequence(vec![page(&["A"])]);
        let mut controller = PaperListController::new(&Config::default());

        let summary = run(&source, &mut controller, None, 10).await.unwrap();

        assert_eq!(summary, SearchSummary { requests: 2, exhausted: true });
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_first_page_does_not_paginate() {
        let source = MockSource::new(page(&[]));
        let mut controller = PaperListController::new(&Config::default());

        let summary = run(&source, &mut controller, None, 3).await.unwrap();

        assert_eq!(summary.requests, 1);
        assert!(controller.session().is_empty_state());
    }

    #[tokio::test]
    async fn failure_is_an_error() {
        let source = MockSource::new(MockResponse::Status(503));
        let mut controller = PaperListController::new(&Config::default());

        let err = run(&source, &mut controller, None, 1).await.unwrap_err();
        assert!(err.to_string().starts_with(paperdeck_core::FETCH_ALERT));
    }
}
