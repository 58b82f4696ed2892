//! Human-readable summary printed at the end of a run.

use super::date_cell;
use crate::models::ExtractedArticle;
use crate::recency::RecencyWindow;
use itertools::Itertools;
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Build the summary for `articles` (already sorted). With `detailed`, every
/// post is listed after the counts.
pub fn render(articles: &[ExtractedArticle], window: &RecencyWindow, detailed: bool) -> String {
    let today = window.today_date();
    let yesterday = window.yesterday_date();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    if articles.is_empty() {
        out.push_str("\nNo blog posts found from today or yesterday.\n");
        return out;
    }

    let _ = writeln!(out, "\n{heavy}");
    let _ = writeln!(
        out,
        "FOUND {} BLOG POSTS PUBLISHED ON {} OR {}",
        articles.len(),
        today.format("%Y-%m-%d"),
        yesterday.format("%Y-%m-%d")
    );
    let _ = writeln!(out, "{heavy}");

    let today_count = articles.iter().filter(|a| a.published_date() == today).count();
    let yesterday_count = articles.iter().filter(|a| a.published_date() == yesterday).count();
    let _ = writeln!(out, "Posts from today ({}): {today_count}", today.format("%Y-%m-%d"));
    let _ = writeln!(out, "Posts from yesterday ({}): {yesterday_count}", yesterday.format("%Y-%m-%d"));
    let _ = writeln!(out, "{light}");

    // Busiest source first, ties alphabetical.
    out.push_str("\nPosts by source:\n");
    for (blog, count) in articles
        .iter()
        .counts_by(|a| a.source_name.as_str())
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
    {
        let _ = writeln!(out, "- {blog}: {count}");
    }

    if detailed {
        out.push_str("\nDETAILED RESULTS:\n");
        let _ = writeln!(out, "{light}");
        for (idx, article) in articles.iter().enumerate() {
            let _ = writeln!(out, "\n{}. {}", idx + 1, article.title);
            let _ = writeln!(out, "   Blog: {}", article.source_name);
            let _ = writeln!(out, "   Date: {}", date_cell(article));
            let _ = writeln!(out, "   URL:  {}", article.url);
            let _ = writeln!(out, "{light}");
        }
    }

    out
}
