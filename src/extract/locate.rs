//! Locating article-like blocks inside a listing page.
//!
//! Two tiers, always in this order:
//!
//! 1. **Structural selectors.** Every selector in [`ARTICLE_SELECTORS`] is
//!    applied and the matches are unioned, because a page often mixes several
//!    container conventions.
//! 2. **Heading fallback.** Only when tier 1 found nothing: every linked
//!    `h1`/`h2`/`h3` contributes its parent element.

use super::ArticleCandidate;
use crate::models::Source;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

/// Container patterns seen across blog listing pages, in priority order.
pub const ARTICLE_SELECTORS: [&str; 16] = [
    "article",
    ".post",
    ".entry",
    ".blog-post",
    ".blog-entry",
    ".article",
    ".news-item",
    ".card",
    ".content-item",
    ".list-item",
    "li.item",
    ".resource-item",
    ".col-md-4",
    ".post-item",
    ".blog-item",
    ".m-post-card",
];

static ARTICLES: Lazy<Vec<Selector>> = Lazy::new(|| {
    ARTICLE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("static article selector"))
        .collect()
});
static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

/// Find candidate article blocks in `document`.
pub fn locate<'a>(document: &'a Html, source: &'a Source) -> Vec<ArticleCandidate<'a>> {
    let structural = by_selectors(document);
    let (elements, tier) = if structural.is_empty() {
        (by_headings(document), "headings")
    } else {
        (structural, "selectors")
    };

    debug!(source = %source.name, count = elements.len(), tier, "Located candidates");
    elements
        .into_iter()
        .map(|element| ArticleCandidate { element, source })
        .collect()
}

/// Union of all structural selector matches, each element once, in the order
/// it was first matched.
fn by_selectors(document: &Html) -> Vec<ElementRef<'_>> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for selector in ARTICLES.iter() {
        for element in document.select(selector) {
            if seen.insert(element.id()) {
                found.push(element);
            }
        }
    }
    found
}

/// Parents of headings that are linked, wrapped in a link, or sit next to one.
fn by_headings(document: &Html) -> Vec<ElementRef<'_>> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for heading in document.select(&HEADINGS) {
        let Some(parent) = heading.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let linked = heading.select(&ANCHOR).next().is_some()
            || parent.value().name() == "a"
            || parent.select(&ANCHOR).next().is_some();
        if linked && seen.insert(parent.id()) {
            found.push(parent);
        }
    }
    found
}
