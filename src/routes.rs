use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;

use crate::category::Category;
use crate::config::{Config, RubricConfig};
use crate::error::{FetchError, ParseError};
use crate::fetcher::Fetcher;
use crate::shaper::{shape, Paper};

pub const FRONT_PAGE: u32 = 1;

pub struct AppState {
    pub config: Config,
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(&config.arxiv)?;
        Ok(Self { config, fetcher })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/page/:num", get(page))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Template structs
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub today: String,
    pub page_title: String,
    pub page_links: Vec<PageLink>,
    pub headline: Option<Paper>,
    pub sections: Vec<Section>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub today: String,
    pub message: &'static str,
}

pub struct PageLink {
    pub number: u32,
    pub name: String,
    pub is_current: bool,
}

impl PageLink {
    pub fn href(&self) -> String {
        if self.number == FRONT_PAGE {
            "/".to_string()
        } else {
            format!("/page/{}", self.number)
        }
    }
}

pub struct Section {
    pub category: Category,
    pub papers: Vec<Paper>,
    /// Whether the listing had anything before the headline was taken out
    pub had_papers: bool,
}

// Wrapper for HTML responses
pub struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => AppError::Render(err).into_response(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) | AppError::Parse(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "The arXiv listing could not be reached. Please try again shortly.",
            AppError::Parse(_) => "The arXiv listing came back in an unexpected format.",
            AppError::Render(_) => "This page could not be typeset.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Fetch(err) => error!(
                category = %err.category(),
                timeout = err.is_timeout(),
                "Request failed: {}",
                self
            ),
            _ => error!("Request failed: {}", self),
        }

        let status = self.status();
        let page = ErrorTemplate {
            today: today(),
            message: self.public_message(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, self.public_message()).into_response(),
        }
    }
}

enum PageKind<'a> {
    Front,
    Rubric(&'a RubricConfig),
}

fn today() -> String {
    Utc::now().format("%A, %B %-d, %Y").to_string()
}

fn rubric_title(category: Category) -> String {
    format!("{} ({})", category.section_name(), category)
}

/// Resolves a page number against the configured rubrics; anything unknown
/// is the front page.
fn resolve_page(config: &Config, num: u32) -> (u32, PageKind<'_>) {
    match num
        .checked_sub(FRONT_PAGE + 1)
        .and_then(|idx| config.rubrics.get(idx as usize))
    {
        Some(rubric) => (num, PageKind::Rubric(rubric)),
        None => (FRONT_PAGE, PageKind::Front),
    }
}

fn page_links(config: &Config, current: u32) -> Vec<PageLink> {
    let front = PageLink {
        number: FRONT_PAGE,
        name: "Front Page".to_string(),
        is_current: current == FRONT_PAGE,
    };

    std::iter::once(front)
        .chain(config.rubrics.iter().zip(FRONT_PAGE + 1..).map(|(rubric, number)| PageLink {
            number,
            name: rubric_title(rubric.category),
            is_current: current == number,
        }))
        .collect()
}

/// Fetches and shapes one category. A fetch failure returns before any
/// parsing happens.
pub async fn load_section(
    fetcher: &Fetcher,
    category: Category,
    limit: usize,
) -> Result<Section, AppError> {
    let raw = fetcher.fetch(category, limit).await?;
    let papers = shape(&raw, category, limit)?;
    Ok(Section {
        category,
        had_papers: !papers.is_empty(),
        papers,
    })
}

/// Removes the newest paper across all sections; earlier sections win ties.
fn take_headline(sections: &mut [Section]) -> Option<Paper> {
    let (section_idx, _) = sections
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.papers.first().map(|p| (i, p.published)))
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })?;

    Some(sections[section_idx].papers.remove(0))
}

async fn render_page(state: &AppState, num: u32) -> Result<HtmlTemplate<PageTemplate>, AppError> {
    let (current, kind) = resolve_page(&state.config, num);

    // Sections load one after another; the first failure fails the page.
    let (page_title, headline, sections) = match kind {
        PageKind::Front => {
            let mut sections = Vec::with_capacity(state.config.front_page.categories.len());
            for category in &state.config.front_page.categories {
                sections.push(
                    load_section(&state.fetcher, *category, state.config.front_page.limit).await?,
                );
            }
            let headline = take_headline(&mut sections);
            ("Front Page".to_string(), headline, sections)
        }
        PageKind::Rubric(rubric) => {
            let section = load_section(&state.fetcher, rubric.category, rubric.limit).await?;
            (rubric_title(rubric.category), None, vec![section])
        }
    };

    Ok(HtmlTemplate(PageTemplate {
        today: today(),
        page_title,
        page_links: page_links(&state.config, current),
        headline,
        sections,
    }))
}

// Route handlers
pub async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    render_page(&state, FRONT_PAGE).await
}

pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(num): Path<u32>,
) -> Result<impl IntoResponse, AppError> {
    render_page(&state, num).await
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
