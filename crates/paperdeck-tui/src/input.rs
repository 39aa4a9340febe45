use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use paperdeck_core::DateRange;

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Search => map_key_search(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        MouseEventKind::Down(MouseButton::Left) => Action::ClickAt(mouse.column, mouse.row),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('l') | KeyCode::Right => Action::NextAuthor,
        KeyCode::Char('h') | KeyCode::Left => Action::PrevAuthor,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Char('g') => Action::GoTop,
        KeyCode::Char('G') => Action::GoBottom,
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::SaveConfig,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::Char('/') | KeyCode::Char('i') => Action::StartSearch,
        KeyCode::Char('d') => Action::NextDateRange,
        KeyCode::Char('D') => Action::PrevDateRange,
        KeyCode::Char(c @ '1'..='5') => {
            let idx = (c as usize) - ('1' as usize);
            DateRange::all()
                .get(idx)
                .map(|&r| Action::SelectDateRange(r))
                .unwrap_or(Action::None)
        }
        KeyCode::Char('x') => Action::Reset,
        KeyCode::Char('m') => Action::ShowAllAuthors,
        KeyCode::Char('y') => Action::CopyLink,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Home => Action::GoTop,
        KeyCode::End => Action::GoBottom,
        _ => Action::None,
    }
}

fn map_key_search(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::SearchCancel,
        KeyCode::Enter => Action::SearchConfirm,
        KeyCode::Char(c) => Action::SearchInput(c),
        KeyCode::Backspace => Action::SearchInput('\x08'), // sentinel for backspace
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn digits_pick_date_ranges() {
        assert_eq!(
            map_event(&press(KeyCode::Char('1')), &InputMode::Normal),
            Action::SelectDateRange(DateRange::Today)
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('5')), &InputMode::Normal),
            Action::SelectDateRange(DateRange::Forever)
        );
    }

    #[test]
    fn search_mode_captures_letters() {
        assert_eq!(
            map_event(&press(KeyCode::Char('q')), &InputMode::Search),
            Action::SearchInput('q')
        );
        assert_eq!(
            map_event(&press(KeyCode::Backspace), &InputMode::Search),
            Action::SearchInput('\x08')
        );
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ev, &InputMode::Search), Action::Quit);
        assert_eq!(map_event(&ev, &InputMode::Normal), Action::Quit);
    }
}
