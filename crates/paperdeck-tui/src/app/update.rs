use std::time::Instant;

use super::util::edit_text;
use super::{App, InputMode};
use crate::action::Action;

/// Rows outside the card list: header, bordered search box, date buttons, footer.
pub(crate) const CHROME_ROWS: usize = 6;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Fetch error alert: blocks everything until dismissed
        if self.alert.is_some() {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::DrillIn
                | Action::NavigateBack
                | Action::SearchConfirm
                | Action::SearchCancel => {
                    self.alert = None;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                Action::Resize(_w, h) => {
                    self.visible_rows = (h as usize).saturating_sub(CHROME_ROWS);
                }
                _ => {}
            }
            return false;
        }

        // Help overlay: any key closes it
        if self.show_help {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                Action::Resize(_w, h) => {
                    self.visible_rows = (h as usize).saturating_sub(CHROME_ROWS);
                }
                Action::None => {}
                _ => {
                    self.show_help = false;
                }
            }
            return false;
        }

        if !matches!(action, Action::Tick | Action::None | Action::Resize(..)) {
            self.status = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                if let Some(cmd) = self.controller.on_tick(Instant::now()) {
                    self.dispatch(cmd);
                }
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(CHROME_ROWS);
                self.clamp_cursor();
            }
            Action::MoveDown => {
                let len = self.card_count();
                if len > 0 && self.cursor + 1 < len {
                    self.cursor += 1;
                    self.author_cursor = None;
                    self.ensure_cursor_visible();
                }
                self.maybe_paginate();
            }
            Action::MoveUp => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.author_cursor = None;
                    self.ensure_cursor_visible();
                }
            }
            Action::PageDown => {
                let len = self.card_count();
                if len > 0 {
                    self.cursor = (self.cursor + self.visible_cards()).min(len - 1);
                    self.author_cursor = None;
                    self.ensure_cursor_visible();
                }
                self.maybe_paginate();
            }
            Action::PageUp => {
                self.cursor = self.cursor.saturating_sub(self.visible_cards());
                self.author_cursor = None;
                self.ensure_cursor_visible();
            }
            Action::GoTop => {
                self.cursor = 0;
                self.author_cursor = None;
                self.ensure_cursor_visible();
            }
            Action::GoBottom => {
                let len = self.card_count();
                if len > 0 {
                    self.cursor = len - 1;
                    self.author_cursor = None;
                    self.ensure_cursor_visible();
                }
                self.maybe_paginate();
            }
            Action::NextAuthor => {
                if let Some(card) = self.selected_card() {
                    let n = card.visible_authors().len();
                    if n > 0 {
                        self.author_cursor = Some(match self.author_cursor {
                            None => 0,
                            Some(i) => (i + 1).min(n - 1),
                        });
                    }
                }
            }
            Action::PrevAuthor => {
                self.author_cursor = match self.author_cursor {
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                };
            }
            Action::DrillIn => {
                if let (Some(card), Some(i)) = (self.selected_card(), self.author_cursor)
                    && let Some(name) = card.visible_authors().get(i).map(|s| s.to_string())
                    && let Some(cmd) = self.controller.author_search(&name)
                {
                    self.author_cursor = None;
                    self.dispatch(cmd);
                }
            }
            Action::NavigateBack => {
                self.author_cursor = None;
            }
            Action::ShowAllAuthors => {
                if let Some(card) = self.selected_card() {
                    self.controller.reveal_authors(&card.arxiv_id);
                }
            }
            Action::StartSearch => {
                self.input_mode = InputMode::Search;
                self.controller.on_focus();
            }
            Action::SearchInput(ch) => {
                let text = edit_text(self.controller.search_input(), ch);
                self.controller.on_input(text, Instant::now());
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                let cmd = self.controller.on_enter();
                self.dispatch(cmd);
            }
            Action::SearchCancel => {
                self.input_mode = InputMode::Normal;
            }
            Action::SelectDateRange(range) => {
                let cmd = self.controller.select_date_range(range);
                self.dispatch(cmd);
            }
            Action::NextDateRange => {
                let next = self.controller.date_range().next();
                let cmd = self.controller.select_date_range(next);
                self.dispatch(cmd);
            }
            Action::PrevDateRange => {
                let prev = self.controller.date_range().prev();
                let cmd = self.controller.select_date_range(prev);
                self.dispatch(cmd);
            }
            Action::Reset => {
                let cmd = self.controller.reset();
                self.dispatch(cmd);
            }
            Action::CopyLink => {
                self.copy_selected_link();
            }
            Action::SaveConfig => {
                self.save_config();
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::ClickAt(col, row) => {
                self.click_at(col, row);
            }
            Action::None => {}
        }
        false
    }
}
