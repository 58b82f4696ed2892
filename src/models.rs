//! Data models shared by the extraction pipeline and the output writers.
//!
//! - [`Source`]: one blog from the registry
//! - [`ExtractedArticle`]: a post found inside the recency window
//! - [`RunResult`]: every post found during one run
//! - [`Progress`]: emitted once per finished source

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A blog to scan.
///
/// Sources are loaded once from the registry file and never change during a
/// run. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Display name, e.g. `"Cisco Talos"`.
    pub name: String,
    /// Listing page that is fetched and scanned for posts.
    pub url: String,
    /// Id of a registered date strategy that runs before the generic cascade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_strategy: Option<String>,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            date_strategy: None,
        }
    }

    #[cfg(test)]
    pub fn with_date_strategy(mut self, id: impl Into<String>) -> Self {
        self.date_strategy = Some(id.into());
        self
    }
}

/// A post published today or yesterday.
///
/// Only built once a title, an absolute link and an in-window date have all
/// been found, so none of the fields is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExtractedArticle {
    /// Name of the [`Source`] the post was found on.
    pub source_name: String,
    pub title: String,
    /// Absolute http(s) URL of the post.
    pub url: String,
    /// Publication instant in the run's local timezone basis.
    pub published: NaiveDateTime,
}

impl ExtractedArticle {
    /// Calendar day of publication, used for grouping and sorting.
    pub fn published_date(&self) -> NaiveDate {
        self.published.date()
    }
}

/// Every article found during a run.
///
/// Behaves as a set: inserting an article identical to one already present is
/// a no-op. Ordering is not meaningful until [`RunResult::into_sorted`].
#[derive(Debug, Default)]
pub struct RunResult {
    articles: Vec<ExtractedArticle>,
    seen: HashSet<ExtractedArticle>,
}

impl RunResult {
    /// Add an article, returning `false` if it was already present.
    pub fn insert(&mut self, article: ExtractedArticle) -> bool {
        if self.seen.contains(&article) {
            return false;
        }
        self.seen.insert(article.clone());
        self.articles.push(article);
        true
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Consume the set and order it newest day first, then by source name,
    /// then by title.
    pub fn into_sorted(self) -> Vec<ExtractedArticle> {
        self.articles
            .into_iter()
            .sorted_by(|a, b| {
                b.published_date()
                    .cmp(&a.published_date())
                    .then_with(|| a.source_name.cmp(&b.source_name))
                    .then_with(|| a.title.cmp(&b.title))
            })
            .collect()
    }
}

impl Extend<ExtractedArticle> for RunResult {
    fn extend<T: IntoIterator<Item = ExtractedArticle>>(&mut self, iter: T) {
        for article in iter {
            self.insert(article);
        }
    }
}

/// Reported after each source finishes, successfully or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Number of sources finished so far, this one included.
    pub completed: usize,
    pub total: usize,
    pub source: String,
    /// Articles this source contributed.
    pub matches: usize,
    /// Human-readable cause when the source failed.
    pub error: Option<String>,
}
