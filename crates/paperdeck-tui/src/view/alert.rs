use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;

use super::centered_rect;

/// Render a blocking alert. Enter or Esc dismisses it.
pub fn render(f: &mut Frame, theme: &Theme, message: &str) {
    let area = f.area();
    let width = (message.chars().count() as u16 + 6).clamp(30, area.width.max(30));
    let popup = centered_rect(width, 6, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Enter",
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            ),
            Span::styled(": OK", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(" Error "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
