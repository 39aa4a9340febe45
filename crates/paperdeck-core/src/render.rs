//! Declarative card rendering.
//!
//! [`render`] turns a [`DisplaySession`] into a [`ListView`], a plain data
//! structure that front-ends draw however they like. [`render_html`] emits
//! the card markup for the web page, with every text field escaped.

use std::fmt::Write as _;

use crate::format::{citations, escape_html, publication_date};
use crate::session::DisplaySession;
use crate::{Paper, VISIBLE_AUTHORS};

pub const EMPTY_MESSAGE: &str = "No papers found.";
pub const RESET_LABEL: &str = "Reset";
pub const SHOW_ALL_LABEL: &str = "show all";

/// External viewers for one paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLinks {
    pub abstract_url: String,
    pub pdf_url: String,
    pub vanity_url: String,
    pub scholar_url: String,
}

impl CardLinks {
    pub fn for_paper(paper: &Paper) -> Self {
        let id = &paper.arxiv_id;
        Self {
            abstract_url: format!("https://arxiv.org/abs/{id}"),
            pdf_url: format!("https://arxiv.org/pdf/{id}"),
            vanity_url: format!("https://arxiv-vanity.com/papers/{id}"),
            scholar_url: format!(
                "https://scholar.google.com/scholar?hl=en&q=%22{}%22&btnG",
                urlencoding::encode(&paper.title)
            ),
        }
    }
}

/// Everything a front-end needs to draw one paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub arxiv_id: String,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    pub first_author: Option<String>,
    /// Authors 2 through 10.
    pub authors: Vec<String>,
    /// Authors past the 10th, hidden until revealed.
    pub hidden_authors: Vec<String>,
    pub hidden_revealed: bool,
    /// `Some("show all")` when there are hidden authors; the label empties once used.
    pub show_all_label: Option<String>,
    pub citations: String,
    pub date: String,
    pub links: CardLinks,
}

impl Card {
    pub fn from_paper(paper: &Paper) -> Self {
        let mut rest = paper.authors.iter().skip(1).cloned();
        let authors: Vec<String> = rest.by_ref().take(VISIBLE_AUTHORS - 1).collect();
        let hidden_authors: Vec<String> = rest.collect();
        let show_all_label = if hidden_authors.is_empty() {
            None
        } else {
            Some(SHOW_ALL_LABEL.to_string())
        };

        Self {
            arxiv_id: paper.arxiv_id.clone(),
            title: paper.title.clone(),
            summary: paper.summary.clone(),
            image_url: paper.image_url.clone(),
            first_author: paper.authors.first().cloned(),
            authors,
            hidden_authors,
            hidden_revealed: false,
            show_all_label,
            citations: citations(paper.citations),
            date: publication_date(&paper.publication_date),
            links: CardLinks::for_paper(paper),
        }
    }

    /// Activate the "show all" toggle. Idempotent.
    pub fn reveal_authors(&mut self) {
        if self.show_all_label.is_some() {
            self.hidden_revealed = true;
            self.show_all_label = Some(String::new());
        }
    }

    /// Author names that are currently visible, first author included.
    pub fn visible_authors(&self) -> Vec<&str> {
        let hidden: &[String] = if self.hidden_revealed {
            &self.hidden_authors
        } else {
            &[]
        };
        self.first_author
            .iter()
            .chain(self.authors.iter())
            .chain(hidden.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let id = escape_html(&self.arxiv_id);
        let _ = write!(
            html,
            "<div class=\"card\">\n\
             <a class=\"paper-link\" href=\"{abs}\" target=\"_blank\">\n\
             <img src=\"{img}\" class=\"card-img-top\" alt=\"Paper Image\">\n\
             <div class=\"card-body d-flex flex-column\">\n\
             <div class=\"card-title\">{title}</div>\n\
             <p class=\"card-text paper-summary\">{summary}</p>\n\
             <div class=\"mt-auto\">\n<p class=\"card-text\">\n<span class=\"authors-group\">\n",
            abs = escape_html(&self.links.abstract_url),
            img = escape_html(&self.image_url),
            title = escape_html(&self.title),
            summary = escape_html(&self.summary),
        );

        if let Some(first) = &self.first_author {
            html.push_str("<span class=\"first-author\">");
            html.push_str(&author_button(first));
            html.push_str("</span>\n");
        }
        for author in &self.authors {
            html.push_str("<span class=\"author-item\">");
            html.push_str(&author_button(author));
            html.push_str("</span>\n");
        }
        html.push_str("</span>\n");

        if let Some(label) = &self.show_all_label {
            let display = if self.hidden_revealed { "inline" } else { "none" };
            let _ = writeln!(html, "<span class=\"more-authors\" style=\"display: {display}\">");
            for author in &self.hidden_authors {
                html.push_str("<span class=\"author-item\">");
                html.push_str(&author_button(author));
                html.push_str("</span>\n");
            }
            html.push_str("</span>\n");
            let _ = writeln!(
                html,
                "<span class=\"more-link\" onclick=\"toggleAuthors(event)\">{}</span>",
                escape_html(label)
            );
        }

        let _ = write!(
            html,
            "</p>\n</div>\n</div>\n</a>\n\
             <div class=\"card-footer\">\n<div class=\"d-flex justify-content-between\">\n<div>\n\
             <span title=\"Paper citations\" class=\"paper-citations\"><span class=\"mdi mdi-star\"></span> {cites}</span>\n\
             <a target=\"_blank\" class=\"link-nocolor\" href=\"{pdf}\" title=\"Download this paper as a pdf\"><span class=\"mdi mdi-image\"></span></a>\n\
             <a target=\"_blank\" class=\"link-nocolor\" href=\"{vanity}\" title=\"View this paper as a webpage on arxiv-vanity\"><span class=\"mdi mdi-image-outline\"></span></a>\n\
             <a target=\"_blank\" class=\"link-nocolor\" href=\"{scholar}\" title=\"Search for this paper on Google Scholar\"><span class=\"mdi mdi-google\"></span></a>\n\
             </div>\n<div>\n\
             <span title=\"The date the paper was first published onto arxiv\" class=\"paper-date\" data-arxiv-id=\"{id}\"><span class=\"mdi mdi-calendar-clock\"></span> {date}</span>\n\
             </div>\n</div>\n</div>\n</div>\n",
            cites = escape_html(&self.citations),
            pdf = escape_html(&self.links.pdf_url),
            vanity = escape_html(&self.links.vanity_url),
            scholar = escape_html(&self.links.scholar_url),
            date = escape_html(&self.date),
        );
        html
    }
}

fn author_button(name: &str) -> String {
    format!(
        "<button type=\"button\" class=\"btn btn-xs btn-secondary author-btn\" onclick=\"handleAuthorClick(event)\"><span class=\"mdi mdi-account\"></span> {}</button>",
        escape_html(name)
    )
}

/// The paper list as a front-end should show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// A fresh search found nothing: show a message and a reset action.
    Empty {
        message: &'static str,
        reset_label: &'static str,
    },
    Cards(Vec<Card>),
}

impl ListView {
    pub fn cards(&self) -> &[Card] {
        match self {
            ListView::Cards(cards) => cards,
            ListView::Empty { .. } => &[],
        }
    }
}

/// Render the session's current list.
pub fn render(session: &DisplaySession) -> ListView {
    if session.is_empty_state() {
        return ListView::Empty {
            message: EMPTY_MESSAGE,
            reset_label: RESET_LABEL,
        };
    }
    ListView::Cards(session.papers().iter().map(Card::from_paper).collect())
}

/// Markup for the papers container.
pub fn render_html(view: &ListView) -> String {
    match view {
        ListView::Empty {
            message,
            reset_label,
        } => format!(
            "<br><br><p class=\"text-center\">{}<br><br><a class=\"btn btn-sm btn-select\" href=\"/\"><span class=\"mdi mdi-refresh\"></span> {}</a></p>",
            escape_html(message),
            escape_html(reset_label)
        ),
        ListView::Cards(cards) => cards.iter().map(Card::to_html).collect(),
    }
}
