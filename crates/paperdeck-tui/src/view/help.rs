use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;

use super::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();

    let lines = vec![
        Line::from(Span::styled(" Keyboard Shortcuts ", theme.header_style())),
        Line::from(""),
        section_header("Navigation", theme),
        key_line("j / \u{2193}", "Next paper (loads more near the end)", theme),
        key_line("k / \u{2191}", "Previous paper", theme),
        key_line("Ctrl+d / PgDn", "Page down", theme),
        key_line("Ctrl+u / PgUp", "Page up", theme),
        key_line("g / Home", "Go to top", theme),
        key_line("G / End", "Go to bottom", theme),
        Line::from(""),
        section_header("Search", theme),
        key_line("/ or i", "Focus the search box", theme),
        key_line("Enter", "Search now (in search box)", theme),
        key_line("Esc", "Leave the search box", theme),
        key_line("1-5", "Today / week / month / year / all time", theme),
        key_line("d / D", "Next / previous date range", theme),
        key_line("x", "Reset search", theme),
        Line::from(""),
        section_header("Authors", theme),
        key_line("l / h", "Select next / previous author", theme),
        key_line("Enter", "Search for the selected author", theme),
        key_line("m", "Show all authors", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("y", "Copy abstract link (OSC 52)", theme),
        key_line("Ctrl+s", "Save date range and theme", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q / Ctrl+c", "Quit", theme),
    ];

    let popup = centered_rect(64, lines.len() as u16 + 2, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
