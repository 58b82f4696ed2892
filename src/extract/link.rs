//! Canonical link extraction.
//!
//! Links are looked for in four places, in order: inside a title, a "read
//! more" anchor, any anchor, and finally the candidate itself when it is an
//! `<a>`. The first usable `href` is resolved against the source URL.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use url::Url;

const LINK_TIERS: [&str; 3] = [
    "h1 a, h2 a, h3 a, .title a, .post-title a, .entry-title a",
    "a.read-more, a.more-link, a.continue-reading",
    "a",
];

static TIERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    LINK_TIERS
        .iter()
        .map(|s| Selector::parse(s).expect("static link selector"))
        .collect()
});

/// Absolute http(s) URL of the post described by `candidate`.
pub fn extract_link(candidate: ElementRef<'_>, base: &Url) -> Option<String> {
    TIERS
        .iter()
        .find_map(|selector| candidate.select(selector).find_map(usable_href))
        .or_else(|| {
            (candidate.value().name() == "a")
                .then(|| usable_href(candidate))
                .flatten()
        })
        .and_then(|href| resolve(base, href))
}

/// The anchor's `href`, unless it is empty, an in-page fragment or script.
fn usable_href(anchor: ElementRef<'_>) -> Option<&str> {
    let href = anchor.value().attr("href")?.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty() || href.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    Some(href)
}

/// Resolve `href` against `base`, keeping only web URLs.
pub fn resolve(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn base() -> Url {
        Url::parse("https://blog.example.com/research/").unwrap()
    }

    fn link_of(body: &str, root: &str) -> Option<String> {
        let html = Html::parse_document(body);
        let selector = Selector::parse(root).unwrap();
        extract_link(html.select(&selector).next().unwrap(), &base())
    }

    #[test]
    fn test_title_link_beats_earlier_anchor() {
        assert_eq!(
            link_of(
                r#"<article><a href="/tag/malware">malware</a><h2><a href="/posts/one">One</a></h2></article>"#,
                "article"
            ),
            Some("https://blog.example.com/posts/one".to_string())
        );
    }

    #[test]
    fn test_read_more_beats_plain_anchor() {
        assert_eq!(
            link_of(
                r#"<article><a href="/author/x">X</a><a class="more-link" href="two">Read more</a></article>"#,
                "article"
            ),
            Some("https://blog.example.com/research/two".to_string())
        );
    }

    #[test]
    fn test_any_anchor_and_absolute_href_kept() {
        assert_eq!(
            link_of(
                r#"<div class="card"><a href="https://other.example.org/p?id=3">Post</a></div>"#,
                "div"
            ),
            Some("https://other.example.org/p?id=3".to_string())
        );
    }

    #[test]
    fn test_candidate_itself_is_anchor() {
        assert_eq!(
            link_of(r#"<a class="card" href="/posts/self"><h3>Self</h3></a>"#, "a.card"),
            Some("https://blog.example.com/posts/self".to_string())
        );
    }

    #[test]
    fn test_fragment_and_script_links_are_skipped() {
        assert_eq!(
            link_of(
                r##"<article><a href="#top">top</a><a href="javascript:void(0)">x</a><a href="/real">real</a></article>"##,
                "article"
            ),
            Some("https://blog.example.com/real".to_string())
        );
    }

    #[test]
    fn test_no_link_is_none() {
        assert_eq!(link_of("<article><h2>Orphan</h2></article>", "article"), None);
        assert_eq!(
            link_of(r#"<article><a href="mailto:press@example.com">Mail</a></article>"#, "article"),
            None
        );
    }

    #[test]
    fn test_protocol_relative_href() {
        assert_eq!(
            resolve(&base(), "//cdn.example.com/post"),
            Some("https://cdn.example.com/post".to_string())
        );
    }
}
