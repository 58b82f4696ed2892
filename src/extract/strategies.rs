//! Named per-source date strategies.
//!
//! A source can name a strategy in the registry file (`date_strategy:
//! microsoft`). The strategy runs before the generic cascade and wins when it
//! returns a date. Unknown ids are ignored with a warning at start-up and
//! again at extraction time.

use super::dates::DateParser;
use crate::utils::element_text;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde_json::Value;
use std::collections::BTreeMap;

/// A source-specific way of finding a publication date.
pub trait DateStrategy: Send + Sync {
    /// Id used in the registry file.
    fn id(&self) -> &'static str;

    fn extract(&self, candidate: ElementRef<'_>, parser: &DateParser) -> Option<NaiveDateTime>;
}

/// Lookup from strategy id to implementation.
pub struct StrategyRegistry {
    strategies: BTreeMap<&'static str, Box<dyn DateStrategy>>,
}

impl StrategyRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Registry holding every strategy that ships with the binary.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(MicrosoftStrategy));
        registry.register(Box::new(JsonLdStrategy));
        registry
    }

    /// Add `strategy`, replacing any previous one with the same id.
    pub fn register(&mut self, strategy: Box<dyn DateStrategy>) {
        self.strategies.insert(strategy.id(), strategy);
    }

    pub fn get(&self, id: &str) -> Option<&dyn DateStrategy> {
        self.strategies.get(id).map(|s| s.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.strategies.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.keys().copied()
    }
}

static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").expect("static selector"));
static MS_DATE_CLASSES: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".blog-post-meta-date, .c-paragraph-4, .posted-date").expect("static selector")
});
static MS_TEXT_BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, span, div").expect("static selector"));
static LD_JSON: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});

/// Microsoft Security blog cards.
///
/// Checks, in order: the first `time` element (attribute, then text), the
/// blog's own date classes, short texts that mention publishing, and finally
/// JSON-LD.
pub struct MicrosoftStrategy;

impl DateStrategy for MicrosoftStrategy {
    fn id(&self) -> &'static str {
        "microsoft"
    }

    fn extract(&self, candidate: ElementRef<'_>, parser: &DateParser) -> Option<NaiveDateTime> {
        let from_time = || {
            let time = candidate.select(&TIME).next()?;
            time.value()
                .attr("datetime")
                .and_then(|value| parser.parse(value))
                .or_else(|| parser.parse(&element_text(time)))
        };
        let from_classes = || {
            let el = candidate.select(&MS_DATE_CLASSES).next()?;
            parser.parse(&element_text(el))
        };
        let from_mentions = || {
            candidate
                .select(&MS_TEXT_BLOCKS)
                .map(element_text)
                .filter(|text| {
                    let lower = text.to_lowercase();
                    ["published", "posted", "date"].iter().any(|k| lower.contains(k))
                })
                .find_map(|text| parser.scan(&text).map(|(at, _)| at))
        };

        from_time()
            .or_else(from_classes)
            .or_else(from_mentions)
            .or_else(|| json_ld_published(candidate, parser))
    }
}

/// `datePublished` from JSON-LD blocks inside the candidate.
pub struct JsonLdStrategy;

impl DateStrategy for JsonLdStrategy {
    fn id(&self) -> &'static str {
        "json_ld"
    }

    fn extract(&self, candidate: ElementRef<'_>, parser: &DateParser) -> Option<NaiveDateTime> {
        json_ld_published(candidate, parser)
    }
}

fn json_ld_published(candidate: ElementRef<'_>, parser: &DateParser) -> Option<NaiveDateTime> {
    candidate.select(&LD_JSON).find_map(|script| {
        let raw = script.text().collect::<String>();
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        find_date_published(&value).and_then(|s| parser.parse(s))
    })
}

/// First `datePublished` string in `value`, looking through `@graph` and
/// top-level arrays.
fn find_date_published(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map
            .get("datePublished")
            .and_then(Value::as_str)
            .or_else(|| map.get("@graph").and_then(find_date_published)),
        Value::Array(items) => items.iter().find_map(find_date_published),
        _ => None,
    }
}
