//! The paper-list update protocol.
//!
//! [`PaperListController`] owns the [`DisplaySession`] plus the search box
//! state, and turns user triggers into [`FetchCommand`]s. It never performs
//! I/O: the front-end runs each command against a [`PaperSource`] and hands
//! the result back through [`PaperListController::apply`].
//!
//! [`PaperSource`]: crate::client::PaperSource

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use crate::debounce::Debounce;
use crate::render::{ListView, render};
use crate::request::PaperRequest;
use crate::session::{DisplaySession, MergeOutcome};
use crate::{Config, DateRange, FETCH_ALERT, FetchError, Paper};

/// Where the controller is in the update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Applying,
}

/// Identifies one issued request. Sequence numbers increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub seq: u64,
    pub fresh: bool,
}

/// A request the front-end should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub ticket: RequestTicket,
    pub request: PaperRequest,
}

/// What happened when a response was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Merged(MergeOutcome),
    /// Dropped because a newer response was already applied.
    Stale,
    /// The fetch failed; `alert` is for the user, `error` for the log.
    Failed { alert: &'static str, error: String },
}

pub struct PaperListController {
    session: DisplaySession,
    search_input: String,
    reset_visible: bool,
    debounce: Debounce,
    revealed: HashSet<String>,
    next_seq: u64,
    in_flight: BTreeSet<u64>,
    /// Outstanding scroll-triggered request, if any.
    pending_page: Option<u64>,
    /// Latest fresh search not yet answered. Pagination waits on it.
    pending_fresh: Option<u64>,
    default_range: DateRange,
    last_applied: Option<u64>,
    discard_stale: bool,
    phase: Phase,
}

impl PaperListController {
    pub fn new(config: &Config) -> Self {
        Self {
            session: DisplaySession::new(config.default_date_range),
            search_input: String::new(),
            reset_visible: false,
            debounce: Debounce::new(config.debounce()),
            revealed: HashSet::new(),
            next_seq: 1,
            in_flight: BTreeSet::new(),
            pending_page: None,
            pending_fresh: None,
            default_range: config.default_date_range,
            last_applied: None,
            discard_stale: config.discard_stale_responses,
            phase: Phase::Idle,
        }
    }

    pub fn session(&self) -> &DisplaySession {
        &self.session
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn reset_visible(&self) -> bool {
        self.reset_visible
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn date_range(&self) -> DateRange {
        self.session.date_range()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn debounce_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }

    /// Current list, with any "show all" toggles applied.
    pub fn view(&self) -> ListView {
        let mut view = render(&self.session);
        if let ListView::Cards(cards) = &mut view {
            for card in cards.iter_mut() {
                if self.revealed.contains(&card.arxiv_id) {
                    card.reveal_authors();
                }
            }
        }
        view
    }

    /// Activate the "show all" toggle on one card.
    pub fn reveal_authors(&mut self, arxiv_id: &str) {
        if self.session.knows(arxiv_id) {
            self.revealed.insert(arxiv_id.to_string());
        }
    }

    /// First search when the page opens.
    pub fn initial_load(&mut self) -> FetchCommand {
        let query = self.search_input.clone();
        self.fresh_search(&query)
    }

    /// The search box text changed. Restarts the debounce window.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        self.search_input = text.into();
        self.reset_visible = !self.search_input.is_empty();
        self.session.enable_pagination();
        self.debounce.restart(now);
    }

    /// The search box gained focus.
    pub fn on_focus(&mut self) {
        if !self.search_input.is_empty() {
            self.reset_visible = true;
        }
    }

    /// Periodic tick; fires the debounced search once its window has passed.
    pub fn on_tick(&mut self, now: Instant) -> Option<FetchCommand> {
        if self.debounce.fire_if_due(now) {
            let query = self.search_input.clone();
            Some(self.fresh_search(&query))
        } else {
            None
        }
    }

    /// Enter in the search box: search now, skipping the debounce.
    pub fn on_enter(&mut self) -> FetchCommand {
        self.reset_visible = false;
        let query = self.search_input.clone();
        self.fresh_search(&query)
    }

    /// A date-range button was chosen.
    pub fn select_date_range(&mut self, range: DateRange) -> FetchCommand {
        self.session.set_date_range(range);
        let query = self.search_input.clone();
        self.fresh_search(&query)
    }

    /// The reset control: clear the query and search again.
    ///
    /// From the empty-results placeholder this also returns to the default
    /// date range, like reloading the page. The search-box reset keeps it.
    pub fn reset(&mut self) -> FetchCommand {
        self.search_input.clear();
        self.reset_visible = false;
        if self.session.is_empty_state() {
            self.session.set_date_range(self.default_range);
        }
        self.fresh_search("")
    }

    /// An author button was chosen. Blank labels are ignored.
    pub fn author_search(&mut self, label: &str) -> Option<FetchCommand> {
        let name = label.trim();
        if name.is_empty() {
            return None;
        }
        self.search_input = name.to_string();
        self.reset_visible = true;
        Some(self.fresh_search(name))
    }

    /// The viewport moved. Requests the next page when near the bottom and
    /// pagination is still active. Nothing is requested while a page or a
    /// fresh search is outstanding, since the offset would refer to a list
    /// that is about to be replaced.
    pub fn on_scroll(&mut self, near_bottom: bool) -> Option<FetchCommand> {
        if !near_bottom
            || !self.session.active_query()
            || self.pending_page.is_some()
            || self.pending_fresh.is_some()
        {
            return None;
        }
        let request = PaperRequest::page(
            &self.search_input,
            self.session.date_range(),
            self.session.displayed_count(),
        );
        let cmd = self.issue(request);
        self.pending_page = Some(cmd.ticket.seq);
        Some(cmd)
    }

    /// Apply the outcome of a previously issued command.
    pub fn apply(&mut self, ticket: RequestTicket, result: Result<Vec<Paper>, FetchError>) -> Applied {
        self.in_flight.remove(&ticket.seq);
        if self.pending_page == Some(ticket.seq) {
            self.pending_page = None;
        }
        if self.pending_fresh == Some(ticket.seq) {
            self.pending_fresh = None;
        }

        let papers = match result {
            Ok(papers) => papers,
            Err(e) => {
                tracing::error!(seq = ticket.seq, error = %e, "error fetching papers");
                self.settle();
                return Applied::Failed {
                    alert: FETCH_ALERT,
                    error: e.to_string(),
                };
            }
        };

        if self.discard_stale && self.last_applied.is_some_and(|last| ticket.seq < last) {
            tracing::debug!(seq = ticket.seq, last = ?self.last_applied, "dropping stale response");
            self.settle();
            return Applied::Stale;
        }

        self.phase = Phase::Applying;
        if ticket.fresh {
            self.revealed.clear();
        }
        let outcome = self.session.merge(papers, ticket.fresh);
        self.last_applied = Some(self.last_applied.map_or(ticket.seq, |last| last.max(ticket.seq)));
        tracing::debug!(
            seq = ticket.seq,
            fresh = ticket.fresh,
            appended = outcome.appended,
            skipped = outcome.skipped,
            displayed = self.session.displayed_count(),
            "applied papers"
        );
        self.settle();
        Applied::Merged(outcome)
    }

    fn fresh_search(&mut self, query: &str) -> FetchCommand {
        self.debounce.cancel();
        self.session.enable_pagination();
        self.pending_page = None;
        let cmd = self.issue(PaperRequest::fresh(query, self.session.date_range()));
        self.pending_fresh = Some(cmd.ticket.seq);
        cmd
    }

    fn issue(&mut self, request: PaperRequest) -> FetchCommand {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(seq);
        self.phase = Phase::Fetching;
        let ticket = RequestTicket {
            seq,
            fresh: request.is_fresh(),
        };
        tracing::debug!(seq, fresh = ticket.fresh, query = ?request.query, range = %request.date_range, offset = ?request.offset, "issuing request");
        FetchCommand { ticket, request }
    }

    fn settle(&mut self) {
        self.phase = if self.in_flight.is_empty() {
            Phase::Idle
        } else {
            Phase::Fetching
        };
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn controller() -> PaperListController {
        PaperListController::new(&Config::default())
    }

    fn papers(ids: &[&str]) -> Vec<Paper> {
        ids.iter().map(|id| Paper::new(*id, format!("Paper {id}"))).collect()
    }

    fn ids(c: &PaperListController) -> Vec<String> {
        c.session().papers().iter().map(|p| p.arxiv_id.clone()).collect()
    }

    #[test]
    fn initial_load_is_fresh_with_default_range() {
        let mut c = controller();
        let cmd = c.initial_load();
        assert!(cmd.ticket.fresh);
        assert_eq!(cmd.request.path_and_query(), "/api/papers/?d=this-month");
        assert_eq!(c.phase(), Phase::Fetching);
    }

    #[test]
    fn search_then_scroll_scenario() {
        let mut c = controller();
        c.on_input("transformer", Instant::now());
        let cmd = c.on_enter();
        assert_eq!(cmd.request.query.as_deref(), Some("transformer"));
        c.apply(cmd.ticket, Ok(papers(&["A", "B", "C"])));

        assert_eq!(ids(&c), vec!["A", "B", "C"]);
        assert_eq!(c.session().displayed_count(), 3);
        assert_eq!(c.phase(), Phase::Idle);

        let page = c.on_scroll(true).expect("pagination should fire");
        assert_eq!(page.request.offset, Some(3));
        assert_eq!(page.request.query.as_deref(), Some("transformer"));
        c.apply(page.ticket, Ok(papers(&["C", "D"])));

        assert_eq!(ids(&c), vec!["A", "B", "C", "D"]);
        assert_eq!(c.session().displayed_count(), 5);
    }

    #[test]
    fn empty_page_stops_auto_fetch_until_fresh_search() {
        let mut c = controller();
        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(papers(&["A"])));

        let page = c.on_scroll(true).unwrap();
        c.apply(page.ticket, Ok(Vec::new()));
        assert!(!c.session().active_query());
        assert!(c.on_scroll(true).is_none());
        assert!(c.on_scroll(true).is_none());

        let cmd = c.select_date_range(DateRange::Forever);
        assert!(c.session().active_query());
        c.apply(cmd.ticket, Ok(papers(&["B"])));
        assert!(c.on_scroll(true).is_some());
    }

    #[test]
    fn scroll_away_from_bottom_does_nothing() {
        let mut c = controller();
        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(papers(&["A"])));
        assert!(c.on_scroll(false).is_none());
    }

    #[test]
    fn outstanding_page_blocks_duplicate_scroll_requests() {
        let mut c = controller();
        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(papers(&["A"])));

        let page = c.on_scroll(true).unwrap();
        assert!(c.on_scroll(true).is_none());
        c.apply(page.ticket, Ok(papers(&["B"])));
        assert!(c.on_scroll(true).is_some());
    }

    #[test]
    fn failed_page_allows_scrolling_to_retry() {
        let mut c = controller();
        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(papers(&["A"])));

        let page = c.on_scroll(true).unwrap();
        let applied = c.apply(page.ticket, Err(FetchError::Status(502)));
        assert!(matches!(applied, Applied::Failed { alert: FETCH_ALERT, .. }));
        assert_eq!(ids(&c), vec!["A"]);
        assert_eq!(c.session().displayed_count(), 1);
        assert!(c.session().active_query());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.on_scroll(true).is_some());
    }

    #[test]
    fn author_click_fills_box_and_searches() {
        let mut c = controller();
        let cmd = c.author_search("  Jane Doe \n").unwrap();
        assert_eq!(c.search_input(), "Jane Doe");
        assert!(c.reset_visible());
        assert!(cmd.ticket.fresh);
        assert_eq!(cmd.request.query.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn blank_author_label_is_ignored() {
        let mut c = controller();
        assert!(c.author_search("   ").is_none());
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn keystrokes_debounce_into_one_search() {
        let mut c = controller();
        let t0 = Instant::now();
        c.on_input("g", t0);
        c.on_input("gr", t0 + Duration::from_millis(100));
        c.on_input("gra", t0 + Duration::from_millis(200));

        assert!(c.on_tick(t0 + Duration::from_millis(400)).is_none());
        let cmd = c.on_tick(t0 + Duration::from_millis(550)).expect("debounced search");
        assert_eq!(cmd.request.query.as_deref(), Some("gra"));
        assert!(c.on_tick(t0 + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn enter_bypasses_and_cancels_debounce() {
        let mut c = controller();
        let t0 = Instant::now();
        c.on_input("rl", t0);
        assert!(c.reset_visible());
        let cmd = c.on_enter();
        assert_eq!(cmd.request.query.as_deref(), Some("rl"));
        assert!(!c.reset_visible());
        assert!(!c.debounce_pending());
        assert!(c.on_tick(t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn clearing_input_hides_reset() {
        let mut c = controller();
        c.on_input("x", Instant::now());
        assert!(c.reset_visible());
        c.on_input("", Instant::now());
        assert!(!c.reset_visible());
    }

    #[test]
    fn focus_reveals_reset_only_with_text() {
        let mut c = controller();
        c.on_focus();
        assert!(!c.reset_visible());
        c.on_input("q", Instant::now());
        c.on_enter();
        assert!(!c.reset_visible());
        c.on_focus();
        assert!(c.reset_visible());
    }

    #[test]
    fn reset_clears_query() {
        let mut c = controller();
        c.on_input("diffusion", Instant::now());
        let cmd = c.reset();
        assert_eq!(c.search_input(), "");
        assert!(!c.reset_visible());
        assert_eq!(cmd.request.query, None);
    }

    #[test]
    fn reset_from_placeholder_restores_default_range() {
        let mut c = controller();
        let cmd = c.select_date_range(DateRange::Today);
        c.apply(cmd.ticket, Ok(Vec::new()));
        assert!(c.session().is_empty_state());

        let cmd = c.reset();
        assert_eq!(c.date_range(), DateRange::ThisMonth);
        assert_eq!(cmd.request.path_and_query(), "/api/papers/?d=this-month");
    }

    #[test]
    fn reset_with_results_keeps_range() {
        let mut c = controller();
        c.on_input("vision", Instant::now());
        let cmd = c.select_date_range(DateRange::Today);
        c.apply(cmd.ticket, Ok(papers(&["A"])));

        let cmd = c.reset();
        assert_eq!(c.date_range(), DateRange::Today);
        assert_eq!(cmd.request.path_and_query(), "/api/papers/?d=today");
    }

    #[test]
    fn date_range_keeps_current_query() {
        let mut c = controller();
        c.on_input("vision", Instant::now());
        let cmd = c.select_date_range(DateRange::Today);
        assert_eq!(c.date_range(), DateRange::Today);
        assert_eq!(cmd.request.path_and_query(), "/api/papers/?q=vision&d=today");
    }

    #[test]
    fn stale_responses_apply_by_default() {
        let mut c = controller();
        let first = c.on_enter();
        let second = c.select_date_range(DateRange::Forever);
        assert!(second.ticket.seq > first.ticket.seq);

        c.apply(second.ticket, Ok(papers(&["NEW"])));
        let applied = c.apply(first.ticket, Ok(papers(&["OLD"])));
        assert!(matches!(applied, Applied::Merged(_)));
        assert_eq!(ids(&c), vec!["OLD"]);
    }

    #[test]
    fn stale_responses_dropped_when_configured() {
        let config = Config {
            discard_stale_responses: true,
            ..Config::default()
        };
        let mut c = PaperListController::new(&config);
        let first = c.on_enter();
        let second = c.select_date_range(DateRange::Forever);

        c.apply(second.ticket, Ok(papers(&["NEW"])));
        assert_eq!(c.apply(first.ticket, Ok(papers(&["OLD"]))), Applied::Stale);
        assert_eq!(ids(&c), vec!["NEW"]);
        assert_eq!(c.last_applied(), Some(second.ticket.seq));
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn scroll_waits_for_outstanding_fresh_search() {
        let config = Config {
            discard_stale_responses: true,
            ..Config::default()
        };
        let mut c = PaperListController::new(&config);
        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(papers(&["OLD1", "OLD2"])));

        let fresh = c.select_date_range(DateRange::Forever);
        assert!(c.on_scroll(true).is_none());

        assert!(matches!(
            c.apply(fresh.ticket, Ok(papers(&["NEW1", "NEW2"]))),
            Applied::Merged(_)
        ));
        assert_eq!(ids(&c), vec!["NEW1", "NEW2"]);

        let page = c.on_scroll(true).expect("pagination resumes after fresh results");
        assert_eq!(page.request.offset, Some(2));
        assert_eq!(page.request.date_range, DateRange::Forever);
        c.apply(page.ticket, Ok(papers(&["NEW3"])));
        assert_eq!(ids(&c), vec!["NEW1", "NEW2", "NEW3"]);
    }

    #[test]
    fn failed_fresh_search_lets_scrolling_resume() {
        let mut c = controller();
        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(papers(&["A"])));

        let fresh = c.on_enter();
        assert!(c.on_scroll(true).is_none());
        c.apply(fresh.ticket, Err(FetchError::Status(500)));
        assert!(c.on_scroll(true).is_some());
    }

    #[test]
    fn phase_stays_fetching_while_requests_remain() {
        let mut c = controller();
        let a = c.initial_load();
        let _b = c.reset();
        assert_eq!(c.in_flight(), 2);
        c.apply(a.ticket, Ok(papers(&["A"])));
        assert_eq!(c.phase(), Phase::Fetching);
    }

    #[test]
    fn revealed_cards_survive_pagination_but_not_fresh_search() {
        let mut c = controller();
        let mut many = Paper::new("A", "Big collaboration");
        many.authors = (0..12).map(|i| format!("Author {i}")).collect();

        let cmd = c.initial_load();
        c.apply(cmd.ticket, Ok(vec![many.clone()]));
        c.reveal_authors("A");
        assert!(c.view().cards()[0].hidden_revealed);

        let page = c.on_scroll(true).unwrap();
        c.apply(page.ticket, Ok(papers(&["B"])));
        assert!(c.view().cards()[0].hidden_revealed);

        let cmd = c.on_enter();
        c.apply(cmd.ticket, Ok(vec![many]));
        assert!(!c.view().cards()[0].hidden_revealed);
    }
}
