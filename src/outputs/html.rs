//! HTML export: a standalone page with one table.

use super::date_cell;
use crate::models::ExtractedArticle;
use crate::recency::RecencyWindow;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

pub fn render(articles: &[ExtractedArticle], window: &RecencyWindow) -> String {
    let heading = format!(
        "Posts from {} to {}",
        window.yesterday_date().format("%Y-%m-%d"),
        window.today_date().format("%Y-%m-%d")
    );

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", encode_text(&heading));
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", encode_text(&heading));
    out.push_str("<table border=\"1\">\n<thead>\n<tr><th>Blog</th><th>Title</th><th>Date</th><th>URL</th></tr>\n</thead>\n<tbody>\n");

    for article in articles {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{}\">{}</a></td></tr>",
            encode_text(&article.source_name),
            encode_text(&article.title),
            date_cell(article),
            encode_double_quoted_attribute(&article.url),
            encode_text(&article.url),
        );
    }

    out.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    out
}
