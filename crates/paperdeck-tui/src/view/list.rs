use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use paperdeck_core::{Card, ListView};

use crate::app::{App, CARD_HEIGHT};
use crate::theme::Theme;

use super::truncate;

/// Render the card list, or the empty placeholder.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    match app.controller.view() {
        ListView::Empty {
            message,
            reset_label,
        } => render_empty(f, &app.theme, area, message, reset_label),
        ListView::Cards(cards) => {
            let bottom = area.y + area.height;
            let mut y = area.y;
            for (i, card) in cards.iter().enumerate().skip(app.scroll_offset) {
                if y + CARD_HEIGHT as u16 > bottom {
                    break;
                }
                let rect = Rect::new(area.x, y, area.width, CARD_HEIGHT as u16);
                let selected = i == app.cursor;
                let author = if selected { app.author_cursor } else { None };
                render_card(f, &app.theme, rect, card, selected, author);
                y += CARD_HEIGHT as u16;
            }
        }
    }
}

fn render_empty(f: &mut Frame, theme: &Theme, area: Rect, message: &str, reset_label: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("press ", Style::default().fg(theme.dim)),
            Span::styled("x", Style::default().fg(theme.active).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" to {}", reset_label.to_lowercase()), Style::default().fg(theme.dim)),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_card(
    f: &mut Frame,
    theme: &Theme,
    area: Rect,
    card: &Card,
    selected: bool,
    author_cursor: Option<usize>,
) {
    let width = area.width.saturating_sub(2) as usize;
    let border = if selected {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(
            Line::from(Span::styled(
                format!(" {} ", card.arxiv_id),
                Style::default().fg(theme.dim),
            ))
            .right_aligned(),
        );
    let block = if selected {
        block.style(Style::default().bg(theme.highlight_bg))
    } else {
        block
    };

    let title = Line::from(Span::styled(
        truncate(&card.title, width),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    ));

    let meta = Line::from(vec![
        Span::styled(format!("{} citations", card.citations), Style::default().fg(theme.citations)),
        Span::styled(format!("  \u{00B7}  {}", card.date), Style::default().fg(theme.date)),
    ]);

    let summary = Line::from(Span::styled(
        truncate(&card.summary.replace('\n', " "), width),
        Style::default().fg(theme.dim),
    ));

    let lines = vec![title, author_line(theme, card, author_cursor), meta, summary];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Author buttons, first author emphasized, with the "show all" toggle when
/// some names are still hidden.
fn author_line<'a>(theme: &Theme, card: &'a Card, author_cursor: Option<usize>) -> Line<'a> {
    let mut spans = Vec::new();
    for (i, name) in card.visible_authors().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(", ", Style::default().fg(theme.dim)));
        }
        let mut style = if i == 0 && card.first_author.is_some() {
            Style::default().fg(theme.first_author).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.author)
        };
        if author_cursor == Some(i) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(name, style));
    }

    if let Some(label) = card.show_all_label.as_deref().filter(|l| !l.is_empty()) {
        spans.push(Span::styled(
            format!("  [m] {label} (+{})", card.hidden_authors.len()),
            Style::default().fg(theme.active),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use paperdeck_core::Paper;

    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn author_line_folds_hidden_names() {
        let mut paper = Paper::new("1", "t");
        paper.authors = (1..=11).map(|i| format!("A{i}")).collect();
        let card = Card::from_paper(&paper);
        let text = line_text(&author_line(&Theme::hacker(), &card, None));
        assert!(text.starts_with("A1, A2"));
        assert!(text.ends_with("A10  [m] show all (+1)"));
    }

    #[test]
    fn author_line_after_reveal_has_no_toggle() {
        let mut paper = Paper::new("1", "t");
        paper.authors = (1..=11).map(|i| format!("A{i}")).collect();
        let mut card = Card::from_paper(&paper);
        card.reveal_authors();
        let text = line_text(&author_line(&Theme::hacker(), &card, None));
        assert!(text.ends_with("A10, A11"));
    }

    #[test]
    fn selected_author_is_reversed() {
        let mut paper = Paper::new("1", "t");
        paper.authors = vec!["Ada".into(), "Alan".into()];
        let card = Card::from_paper(&paper);
        let line = author_line(&Theme::hacker(), &card, Some(1));
        let alan = line.spans.iter().find(|s| s.content == "Alan").unwrap();
        assert!(alan.style.add_modifier.contains(Modifier::REVERSED));
    }
}
