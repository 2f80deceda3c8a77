use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::{debug, warn};

use crate::category::Category;
use crate::error::ParseError;
use crate::latex::{clean_latex_text, normalize_whitespace};

/// Most records shown per category on the front page.
pub const MAX_RECORDS: usize = 10;

/// One listing entry, ready for the templates.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub title: String,
    pub title_html: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub summary_html: String,
    pub link: String,
    pub pdf_link: String,
    pub arxiv_id: String,
    pub primary_category: String,
    pub published: DateTime<Utc>,
    pub category: Category,
}

impl Paper {
    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }

    pub fn published_display(&self) -> String {
        self.published.format("%d %b %Y").to_string()
    }

    fn from_entry(entry: &Entry, category: Category) -> Option<Self> {
        let title = entry
            .title
            .as_ref()
            .map(|t| normalize_whitespace(&t.content))
            .filter(|t| !t.is_empty())?;

        let link = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone())
            .filter(|href| !href.is_empty())?;

        let published = entry.published.or(entry.updated)?;

        let summary = entry
            .summary
            .as_ref()
            .map(|s| normalize_whitespace(&s.content))
            .unwrap_or_default();

        let authors = entry
            .authors
            .iter()
            .map(|a| normalize_whitespace(&a.name))
            .filter(|name| !name.is_empty())
            .collect();

        let arxiv_id = match entry.id.rsplit_once("/abs/") {
            Some((_, id)) => id.to_string(),
            None => entry.id.clone(),
        };

        let primary_category = entry
            .categories
            .first()
            .map(|c| c.term.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Some(Self {
            title_html: clean_latex_text(&title),
            summary_html: clean_latex_text(&summary),
            pdf_link: link.replace("/abs/", "/pdf/"),
            title,
            authors,
            summary,
            link,
            arxiv_id,
            primary_category,
            published,
            category,
        })
    }
}

/// Parses a raw listing into papers, newest first, keeping at most `limit`.
///
/// Entries that lack a title, a link or a date are logged and left out; a
/// document that is not a feed at all is an error.
pub fn shape(raw: &str, category: Category, limit: usize) -> Result<Vec<Paper>, ParseError> {
    let feed = parser::parse(raw.as_bytes())
        .map_err(|source| ParseError::Malformed { category, source })?;

    let mut papers = Vec::with_capacity(feed.entries.len());
    for entry in &feed.entries {
        match Paper::from_entry(entry, category) {
            Some(paper) => papers.push(paper),
            None => warn!(
                "Skipping incomplete {} entry '{}' (needs title, link and date)",
                category, entry.id
            ),
        }
    }

    // sort_by is stable, so equal timestamps keep feed order
    papers.sort_by(|a, b| b.published.cmp(&a.published));
    papers.truncate(limit);

    debug!("Shaped {} {} papers", papers.len(), category);
    Ok(papers)
}
