use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use paperdeck_core::DateRange;
use paperdeck_core::render::RESET_LABEL;

use crate::app::{App, InputMode};

use super::truncate;

/// Search box with the reset marker on its right edge.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.input_mode == InputMode::Search;
    let border = if focused {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ");
    if app.controller.reset_visible() {
        block = block.title(
            Line::from(Span::styled(
                format!(" {RESET_LABEL} (x) "),
                Style::default().fg(theme.active),
            ))
            .right_aligned(),
        );
    }

    let input = app.controller.search_input();
    let inner_width = area.width.saturating_sub(2) as usize;
    let text = if input.is_empty() && !focused {
        Span::styled("press / to search", Style::default().fg(theme.dim))
    } else {
        Span::styled(
            truncate(input, inner_width.saturating_sub(1)),
            Style::default().fg(theme.text),
        )
    };
    f.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if focused {
        let col = input.chars().count().min(inner_width.saturating_sub(1)) as u16;
        f.set_cursor_position(Position::new(area.x + 1 + col, area.y + 1));
    }
}

/// Single-select date range buttons. Returns each button's rect for mouse hits.
pub fn render_date_buttons(f: &mut Frame, app: &App, area: Rect) -> Vec<(Rect, DateRange)> {
    let theme = &app.theme;
    let selected = app.controller.date_range();
    let mut buttons = Vec::new();
    let mut x = area.x + 1;
    let right = area.x + area.width;

    for (i, &range) in DateRange::all().iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, range.label());
        let width = label.chars().count() as u16;
        if x + width > right {
            break;
        }
        let rect = Rect::new(x, area.y, width, 1);
        let style = if range == selected {
            theme.button_active_style()
        } else {
            theme.button_style()
        };
        f.render_widget(Paragraph::new(Span::styled(label, style)), rect);
        buttons.push((rect, range));
        x += width + 1;
    }
    buttons
}
