//! Heuristic extraction of recent posts from arbitrary listing pages.
//!
//! The pipeline for one fetched page:
//!
//! 1. [`parse_document`]: markup into a DOM
//! 2. [`locate::locate`]: DOM into candidate article blocks
//! 3. [`dates::DateExtractor`]: publication date per candidate
//! 4. [`RecencyWindow::contains`]: drop anything outside today/yesterday
//! 5. [`title::extract_title`] and [`link::extract_link`]: what to show
//!
//! Everything here is synchronous. The parsed [`Html`] never crosses an
//! `.await`, which keeps the per-source futures `Send`.

pub mod dates;
pub mod link;
pub mod locate;
pub mod strategies;
pub mod title;

use crate::models::{ExtractedArticle, Source};
use crate::recency::RecencyWindow;
use crate::utils::truncate_for_log;
use dates::DateExtractor;
use itertools::Itertools;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use strategies::StrategyRegistry;
use tracing::{debug, instrument, warn};
use url::Url;

/// A located article block and the source it came from.
#[derive(Debug, Clone, Copy)]
pub struct ArticleCandidate<'a> {
    pub element: ElementRef<'a>,
    pub source: &'a Source,
}

/// Parse fetched markup. html5ever recovers from any malformed input, so this
/// cannot fail.
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Turns one page body into the posts that fall inside the window.
#[derive(Clone)]
pub struct Extractor {
    window: RecencyWindow,
    dates: DateExtractor,
}

impl Extractor {
    pub fn new(window: RecencyWindow, strategies: Arc<StrategyRegistry>) -> Self {
        Self {
            window,
            dates: DateExtractor::new(&window, strategies),
        }
    }

    /// Every in-window post on `body`.
    ///
    /// Candidates without a date, outside the window, without a title or
    /// without a link are dropped silently. Nested containers that resolve to
    /// the same post (`.card > article`) are reported once, so the returned
    /// count is what this source adds to the run.
    #[instrument(level = "debug", skip_all, fields(source = %source.name))]
    pub fn extract_articles(&self, body: &str, source: &Source) -> Vec<ExtractedArticle> {
        let base = match Url::parse(&source.url) {
            Ok(base) => base,
            Err(e) => {
                warn!(url = %source.url, error = %e, "Source url is not absolute; skipping");
                return Vec::new();
            }
        };

        let document = parse_document(body);
        let candidates = locate::locate(&document, source);
        if candidates.is_empty() {
            debug!(preview = %truncate_for_log(body, 200), "No article blocks found");
        }
        let mut articles = Vec::new();

        for candidate in &candidates {
            let Some(date) = self.dates.extract(candidate) else {
                continue;
            };
            let recent = self.window.contains(date.at);
            debug!(date = %date.at.date(), tier = ?date.tier, recent, "Parsed candidate date");
            if !recent {
                continue;
            }

            let Some(title) = title::extract_title(candidate.element) else {
                continue;
            };
            let Some(url) = link::extract_link(candidate.element, &base) else {
                continue;
            };
            articles.push(ExtractedArticle {
                source_name: source.name.clone(),
                title,
                url,
                published: date.at,
            });
        }

        let articles: Vec<_> = articles.into_iter().unique().collect();
        debug!(candidates = candidates.len(), matches = articles.len(), "Extracted articles");
        articles
    }
}
