//! Markdown report grouped by day, then by blog.
//!
//! ```markdown
//! # Recent Cybersecurity Blog Posts
//!
//! Generated on 2025-04-21 08:15:00
//!
//! Posts from: 2025-04-20 to 2025-04-21
//!
//! ## Posts from 2025-04-21
//!
//! ### Sophos
//!
//! **Patch now**
//!
//! [Read more](https://news.sophos.com/...)
//!
//! ---
//! ```

use crate::models::ExtractedArticle;
use crate::recency::RecencyWindow;
use chrono::NaiveDateTime;
use itertools::Itertools;
use std::fmt::Write;

/// Render the report. `articles` may be in any order; grouping sorts days
/// newest first and blogs alphabetically, keeping input order within a blog.
pub fn render(articles: &[ExtractedArticle], window: &RecencyWindow, generated: NaiveDateTime) -> String {
    let mut md = String::new();
    md.push_str("# Recent Cybersecurity Blog Posts\n\n");
    let _ = writeln!(md, "Generated on {}\n", generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(
        md,
        "Posts from: {} to {}\n",
        window.yesterday_date().format("%Y-%m-%d"),
        window.today_date().format("%Y-%m-%d")
    );

    let by_day = articles.iter().into_group_map_by(|a| a.published_date());
    for (day, posts) in by_day.into_iter().sorted_by(|a, b| b.0.cmp(&a.0)) {
        let _ = writeln!(md, "## Posts from {}\n", day.format("%Y-%m-%d"));

        let by_blog = posts.into_iter().into_group_map_by(|&a| a.source_name.as_str());
        for (blog, posts) in by_blog.into_iter().sorted_by_key(|(blog, _)| *blog) {
            let _ = writeln!(md, "### {blog}\n");
            for post in posts {
                let _ = writeln!(md, "**{}**\n", post.title);
                let _ = writeln!(md, "[Read more]({})\n", post.url);
            }
            md.push('\n');
        }

        md.push_str("---\n\n");
    }

    md
}
