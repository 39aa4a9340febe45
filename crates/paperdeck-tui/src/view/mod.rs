pub mod alert;
pub mod help;
pub mod list;
pub mod search;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use paperdeck_core::Phase;

use crate::app::{App, InputMode};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Title bar: app name, spinner while fetching, card count.
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(" paperdeck ", theme.header_style())];

    if app.controller.phase() != Phase::Idle {
        spans.push(Span::styled(
            format!(" {} loading", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }

    let session = app.controller.session();
    let count = if session.is_empty_state() {
        String::new()
    } else {
        format!("  {} papers", session.len())
    };
    spans.push(Span::styled(count, Style::default().fg(theme.dim)));
    if !session.active_query() && !session.is_empty() {
        spans.push(Span::styled("  (end of results)", Style::default().fg(theme.dim)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Footer: status message if set, otherwise key hints for the current mode.
pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.status, &app.input_mode) {
        (Some(status), _) => format!(" {status}"),
        (None, InputMode::Search) => " Enter:search  Esc:done  Backspace:delete".to_string(),
        (None, InputMode::Normal) => {
            " j/k:move  h/l:author  Enter:search author  /:search  1-5:range  x:reset  m:show all  y:copy  ?:help  q:quit"
                .to_string()
        }
    };
    let line = truncate(&text, area.width as usize);
    f.render_widget(
        Paragraph::new(line).style(app.theme.footer_style()),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Gödel", 5), "Gödel");
        assert_eq!(truncate("Gödel, Escher", 6), "Gödel\u{2026}");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(40, 10, area);
        assert_eq!((r.x, r.y, r.width, r.height), (30, 15, 40, 10));
    }
}
