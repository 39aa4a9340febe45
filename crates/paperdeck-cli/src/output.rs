use std::io::Write;

use owo_colors::OwoColorize;
use paperdeck_core::{Card, ListView, Paper, render_html};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the list as plain text, one block per card.
pub fn print_text(w: &mut dyn Write, view: &ListView, color: ColorMode) -> std::io::Result<()> {
    let cards = match view {
        ListView::Empty {
            message,
            reset_label,
        } => {
            writeln!(w, "{message}")?;
            let hint = format!("({reset_label}: run again without a query)");
            if color.enabled() {
                writeln!(w, "{}", hint.dimmed())?;
            } else {
                writeln!(w, "{hint}")?;
            }
            return Ok(());
        }
        ListView::Cards(cards) => cards,
    };

    for (i, card) in cards.iter().enumerate() {
        print_card(w, i + 1, card, color)?;
    }
    Ok(())
}

fn print_card(w: &mut dyn Write, n: usize, card: &Card, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{:>3}. {}", n, card.title.bold())?;
    } else {
        writeln!(w, "{:>3}. {}", n, card.title)?;
    }

    let mut authors = card.visible_authors();
    let hidden = card.hidden_authors.len();
    if let Some(first) = authors.first().copied().filter(|_| card.first_author.is_some()) {
        authors.remove(0);
        let rest = authors.join(", ");
        let sep = if rest.is_empty() { "" } else { ", " };
        let more = if hidden > 0 && !card.hidden_revealed {
            format!(" (+{hidden} more)")
        } else {
            String::new()
        };
        if color.enabled() {
            writeln!(w, "     {}{sep}{rest}{}", first.bold(), more.dimmed())?;
        } else {
            writeln!(w, "     {first}{sep}{rest}{more}")?;
        }
    }

    let meta = format!("{} citations | {}", card.citations, card.date);
    if color.enabled() {
        writeln!(w, "     {}", meta.yellow())?;
        writeln!(w, "     {}", card.links.abstract_url.cyan())?;
    } else {
        writeln!(w, "     {meta}")?;
        writeln!(w, "     {}", card.links.abstract_url)?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the raw papers as pretty JSON.
pub fn print_json(w: &mut dyn Write, papers: &[Paper]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, papers)?;
    writeln!(w)?;
    Ok(())
}

/// Print the list as the HTML fragment the web front-end would insert.
pub fn print_html(w: &mut dyn Write, view: &ListView) -> std::io::Result<()> {
    writeln!(w, "{}", render_html(view))
}

/// One-line footer after text output.
pub fn print_summary(
    w: &mut dyn Write,
    shown: usize,
    range_label: &str,
    exhausted: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    let tail = if exhausted { ", end of results" } else { "" };
    let line = format!("{shown} papers ({range_label}{tail})");
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{line}")
    }
}
