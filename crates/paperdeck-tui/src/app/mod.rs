mod update;
mod util;
use util::*;

use ratatui::layout::{Constraint, Layout, Position, Rect};
use tokio::sync::mpsc;

use paperdeck_core::config_file::ConfigFile;
use paperdeck_core::{Applied, Card, Config, DateRange, FetchCommand, PaperListController};

use crate::theme::Theme;
use crate::tui_event::{BackendCommand, BackendEvent};

/// Rows taken by one card in the list, borders included.
pub const CARD_HEIGHT: usize = 6;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// The search box has focus.
    Search,
}

/// Main application state.
pub struct App {
    pub controller: PaperListController,
    pub config: Config,
    /// Config as loaded from disk, used as the base when saving.
    pub file_config: ConfigFile,
    pub theme: Theme,
    pub theme_name: String,
    pub input_mode: InputMode,
    /// Selected card index.
    pub cursor: usize,
    /// Selected author on the selected card, if any.
    pub author_cursor: Option<usize>,
    /// Index of the first visible card.
    pub scroll_offset: usize,
    /// Height of the card list area (set on draw, used for paging and the scroll threshold).
    pub visible_rows: usize,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    /// Blocking alert; all input except dismiss/quit is ignored while set.
    pub alert: Option<String>,
    /// One-line status message in the footer.
    pub status: Option<String>,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Last list area rendered (for mouse click → card mapping).
    pub last_list_area: Option<Rect>,
    /// Last date-range button positions rendered.
    pub last_date_buttons: Vec<(Rect, DateRange)>,
}

impl App {
    pub fn new(config: Config, theme: Theme, theme_name: String) -> Self {
        Self {
            controller: PaperListController::new(&config),
            config,
            file_config: ConfigFile::default(),
            theme,
            theme_name,
            input_mode: InputMode::Normal,
            cursor: 0,
            author_cursor: None,
            scroll_offset: 0,
            visible_rows: 20,
            tick: 0,
            should_quit: false,
            show_help: false,
            alert: None,
            status: None,
            backend_cmd_tx: None,
            last_list_area: None,
            last_date_buttons: Vec::new(),
        }
    }

    /// Number of rendered cards.
    pub fn card_count(&self) -> usize {
        self.controller.session().len()
    }

    /// How many whole cards fit in the list area.
    pub fn visible_cards(&self) -> usize {
        (self.visible_rows / CARD_HEIGHT).max(1)
    }

    /// The card under the cursor.
    pub fn selected_card(&self) -> Option<Card> {
        self.controller.view().cards().get(self.cursor).cloned()
    }

    /// Whether the bottom of the viewport is within the scroll threshold of
    /// the end of the list.
    pub fn near_bottom(&self) -> bool {
        let below = self
            .card_count()
            .saturating_sub(self.scroll_offset + self.visible_cards());
        below * CARD_HEIGHT <= self.config.scroll_threshold_rows as usize
    }

    /// Kick off the first search.
    pub fn start(&mut self) {
        let cmd = self.controller.initial_load();
        self.dispatch(cmd);
    }

    /// Hand a request to the backend task.
    pub(crate) fn dispatch(&mut self, cmd: FetchCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(BackendCommand::Fetch(cmd)).is_err() {
                    tracing::warn!("backend channel closed; request dropped");
                }
            }
            None => tracing::warn!(seq = cmd.ticket.seq, "no backend attached; request dropped"),
        }
    }

    /// Apply an event from the backend.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::PapersLoaded { ticket, result } => {
                match self.controller.apply(ticket, result) {
                    Applied::Merged(outcome) => {
                        if ticket.fresh {
                            self.cursor = 0;
                            self.scroll_offset = 0;
                            self.author_cursor = None;
                        }
                        if outcome.exhausted {
                            tracing::info!(
                                displayed = self.controller.session().displayed_count(),
                                "no more pages for current filter"
                            );
                        }
                        self.clamp_cursor();
                    }
                    Applied::Stale => {}
                    Applied::Failed { alert, .. } => {
                        self.alert = Some(alert.to_string());
                    }
                }
            }
        }
    }

    /// Ask for the next page if the viewport is near the end of the list.
    pub(crate) fn maybe_paginate(&mut self) {
        if self.card_count() == 0 {
            return;
        }
        let near = self.near_bottom();
        if let Some(cmd) = self.controller.on_scroll(near) {
            self.dispatch(cmd);
        }
    }

    pub(crate) fn clamp_cursor(&mut self) {
        let len = self.card_count();
        if len == 0 {
            self.cursor = 0;
            self.scroll_offset = 0;
            return;
        }
        self.cursor = self.cursor.min(len - 1);
        self.ensure_cursor_visible();
    }

    pub(crate) fn ensure_cursor_visible(&mut self) {
        let visible = self.visible_cards();
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible {
            self.scroll_offset = self.cursor + 1 - visible;
        }
    }

    /// Map a mouse click to a date button or a card.
    pub(crate) fn click_at(&mut self, col: u16, row: u16) {
        let pos = Position::new(col, row);
        if let Some(&(_, range)) = self.last_date_buttons.iter().find(|(r, _)| r.contains(pos)) {
            let cmd = self.controller.select_date_range(range);
            self.dispatch(cmd);
            return;
        }
        if let Some(area) = self.last_list_area
            && area.contains(pos)
        {
            let idx = self.scroll_offset + (row - area.y) as usize / CARD_HEIGHT;
            if idx < self.card_count() {
                self.cursor = idx;
                self.author_cursor = None;
            }
        }
    }

    /// Copy the selected card's abstract link to the clipboard.
    pub(crate) fn copy_selected_link(&mut self) {
        if let Some(card) = self.selected_card() {
            osc52_copy(&card.links.abstract_url);
            self.status = Some(format!("Copied {}", card.links.abstract_url));
        }
    }

    /// Render the whole screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();
        let [header, search, dates, list, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        crate::view::render_header(f, self, header);
        crate::view::search::render(f, self, search);
        self.last_date_buttons = crate::view::search::render_date_buttons(f, self, dates);

        self.visible_rows = list.height as usize;
        self.last_list_area = Some(list);
        self.ensure_cursor_visible();
        crate::view::list::render(f, self, list);

        crate::view::render_footer(f, self, footer);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
        if let Some(message) = &self.alert {
            crate::view::alert::render(f, &self.theme, message);
        }
    }

    /// Persist the current date range and theme to the platform config file.
    pub(crate) fn save_config(&mut self) {
        let mut cfg = self.file_config.clone();
        let search = cfg.search.get_or_insert_with(Default::default);
        search.default_date_range = Some(self.controller.date_range().tag().to_string());
        let display = cfg.display.get_or_insert_with(Default::default);
        display.theme = Some(self.theme_name.clone());

        match paperdeck_core::config_file::save_config(&cfg) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "saved config");
                self.status = Some(format!("Saved {}", path.display()));
                self.file_config = cfg;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save config");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }
}
