//! Title extraction.

use crate::utils::element_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

const TITLE_SELECTORS: [&str; 6] = ["h1", "h2", "h3", ".title", ".post-title", ".entry-title"];

static TITLES: Lazy<Vec<Selector>> = Lazy::new(|| {
    TITLE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("static title selector"))
        .collect()
});

/// First non-empty heading or title-class text inside `candidate`.
///
/// Selectors are tried in order and, within one selector, elements in document
/// order. `None` means the candidate has no usable title and is dropped.
pub fn extract_title(candidate: ElementRef<'_>) -> Option<String> {
    TITLES.iter().find_map(|selector| {
        candidate
            .select(selector)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn title_of(body: &str) -> Option<String> {
        let html = Html::parse_document(body);
        let selector = Selector::parse("article").unwrap();
        extract_title(html.select(&selector).next().unwrap())
    }

    #[test]
    fn test_heading_before_title_class() {
        assert_eq!(
            title_of(r#"<article><span class="title">Class title</span><h3>Heading</h3></article>"#),
            Some("Heading".to_string())
        );
    }

    #[test]
    fn test_skips_empty_headings() {
        assert_eq!(
            title_of(r#"<article><h2>  </h2><h2><a href="/p">  New   ransomware family </a></h2></article>"#),
            Some("New ransomware family".to_string())
        );
    }

    #[test]
    fn test_title_class_when_no_headings() {
        assert_eq!(
            title_of(r#"<article><div class="entry-title">Patch Tuesday</div></article>"#),
            Some("Patch Tuesday".to_string())
        );
    }

    #[test]
    fn test_titleless_candidate() {
        assert_eq!(title_of("<article><p>Just text</p></article>"), None);
    }
}
