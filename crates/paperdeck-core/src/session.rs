//! The display session: what is rendered, and where pagination continues from.

use std::collections::HashSet;

use crate::{DateRange, Paper};

/// Counts from one merge, mostly for logging and status lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Cards appended to the rendered list.
    pub appended: usize,
    /// Papers skipped because their id was already rendered.
    pub skipped: usize,
    /// A fresh search came back empty; the placeholder is showing.
    pub empty_state: bool,
    /// A pagination request came back empty; pagination is now off.
    pub exhausted: bool,
}

/// Rendered papers plus pagination state, from page load to page unload.
///
/// `known_ids` mirrors the ids in `papers`; a paper whose id is already known
/// is never rendered twice.
#[derive(Debug, Clone)]
pub struct DisplaySession {
    papers: Vec<Paper>,
    known_ids: HashSet<String>,
    displayed_count: usize,
    active_query: bool,
    date_range: DateRange,
    empty_state: bool,
}

impl DisplaySession {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            papers: Vec::new(),
            known_ids: HashSet::new(),
            displayed_count: 0,
            active_query: true,
            date_range,
            empty_state: false,
        }
    }

    /// Rendered papers in display order.
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn known_ids(&self) -> &HashSet<String> {
        &self.known_ids
    }

    pub fn knows(&self, arxiv_id: &str) -> bool {
        self.known_ids.contains(arxiv_id)
    }

    /// Papers received since the last fresh search, duplicates included.
    /// This is the offset for the next page.
    pub fn displayed_count(&self) -> usize {
        self.displayed_count
    }

    /// Whether scroll-triggered pagination may fire.
    pub fn active_query(&self) -> bool {
        self.active_query
    }

    pub fn enable_pagination(&mut self) {
        self.active_query = true;
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    /// True when the last fresh search returned nothing.
    pub fn is_empty_state(&self) -> bool {
        self.empty_state
    }

    /// Merge one response into the rendered list.
    pub fn merge(&mut self, incoming: Vec<Paper>, fresh: bool) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        if fresh {
            self.papers.clear();
            self.known_ids.clear();
            self.displayed_count = incoming.len();
            self.empty_state = incoming.is_empty();
            if incoming.is_empty() {
                outcome.empty_state = true;
                return outcome;
            }
        } else {
            self.displayed_count += incoming.len();
            if incoming.is_empty() {
                self.active_query = false;
                outcome.exhausted = true;
                return outcome;
            }
        }

        for paper in incoming {
            if self.known_ids.contains(&paper.arxiv_id) {
                outcome.skipped += 1;
                continue;
            }
            self.known_ids.insert(paper.arxiv_id.clone());
            self.papers.push(paper);
            outcome.appended += 1;
        }

        if outcome.appended > 0 {
            self.empty_state = false;
        }
        outcome
    }
}

impl Default for DisplaySession {
    fn default() -> Self {
        Self::new(DateRange::default())
    }
}
