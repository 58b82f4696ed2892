//! Publication date extraction.
//!
//! Dates are recovered from a candidate block with a cascade where the first
//! successful stage wins:
//!
//! | Tier | Stage | Source of the value |
//! |------|-------|---------------------|
//! | 0 | per-source override | a [`DateStrategy`](super::strategies::DateStrategy) named in the registry |
//! | 1 | timestamp attributes | `datetime`, `itemprop="datePublished"` |
//! | 2 | labeled elements | text of `time`, `.date`, `.post-date`, ... parsed whole |
//! | 3 | labeled elements, scanned | the same text, searched for a date-shaped substring |
//! | 4 | free text | every short text block, searched in document order |
//!
//! Every stage returns `Option`; a parse failure is just `None` and the
//! cascade moves on.

use super::ArticleCandidate;
use super::strategies::StrategyRegistry;
use crate::utils::{collapse_whitespace, element_text};
use crate::recency::RecencyWindow;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::Arc;
use tracing::{trace, warn};

/// Texts this long or longer are treated as prose and skipped by tier 4.
pub const SHORT_TEXT_LIMIT: usize = 100;

/// Anything longer than this is not a date, whatever it contains.
const MAX_PARSE_LEN: usize = 64;

/// Elements whose text is usually a date, in priority order.
pub const LABELED_SELECTORS: [&str; 19] = [
    "time",
    ".date",
    ".post-date",
    ".entry-date",
    "#date",
    ".publish-date",
    ".meta-date",
    ".timestamp",
    ".c-blog-date",
    ".blog-date",
    ".meta",
    ".entry-meta",
    ".post-meta",
    ".blog-meta",
    "header",
    ".article-info",
    ".published",
    ".posted-on",
    ".byline",
];

static LABELED: Lazy<Vec<Selector>> = Lazy::new(|| {
    LABELED_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("static date selector"))
        .collect()
});
static DATETIME_ATTR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[datetime]").expect("static selector"));
static ITEMPROP_PUBLISHED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[itemprop="datePublished"]"#).expect("static selector"));
static TEXT_BLOCKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, span, div, h1, h2, h3, h4, h5, h6").expect("static selector")
});

/// Which stage of the cascade produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTier {
    Override,
    Attribute,
    Labeled,
    LabeledScan,
    FreeText,
}

/// A recovered publication instant and the stage that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedDate {
    pub at: NaiveDateTime,
    pub tier: DateTier,
}

/// The six date shapes the free-text scanner looks for, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// `Apr 21, 2025`
    AbbrevMonthDayYear,
    /// `April 21, 2025`
    MonthDayYear,
    /// `21 Apr 2025`
    DayAbbrevMonthYear,
    /// `21 April 2025`
    DayMonthYear,
    /// `2025-04-21`, `2025/04/21`, `2025.04.21`
    YearMonthDay,
    /// `04/21/2025`, `04-21-2025`, `04.21.2025`
    MonthDayYearNumeric,
}

static SHAPES: Lazy<Vec<(DateShape, Regex)>> = Lazy::new(|| {
    const ABBR: &str = "(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)";
    const FULL: &str = "(January|February|March|April|May|June|July|August|September|October|November|December)";
    [
        (DateShape::AbbrevMonthDayYear, format!(r"{ABBR}\s+(\d{{1,2}}),?\s+(\d{{4}})")),
        (DateShape::MonthDayYear, format!(r"{FULL}\s+(\d{{1,2}}),?\s+(\d{{4}})")),
        (DateShape::DayAbbrevMonthYear, format!(r"(\d{{1,2}})\s+{ABBR}\s+(\d{{4}})")),
        (DateShape::DayMonthYear, format!(r"(\d{{1,2}})\s+{FULL}\s+(\d{{4}})")),
        (DateShape::YearMonthDay, r"(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})".to_string()),
        (DateShape::MonthDayYearNumeric, r"(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})".to_string()),
    ]
    .into_iter()
    .map(|(shape, pattern)| (shape, Regex::new(&pattern).expect("static date regex")))
    .collect()
});

static WEEKDAY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)(day|nesday|rsday|urday)?\.?,?\s+")
        .expect("static regex")
});
static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})(st|nd|rd|th)\b").expect("static regex"));
static ABBR_DOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|jun|jul|aug|sep|sept|oct|nov|dec)\.").expect("static regex")
});
static SEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsept\b").expect("static regex"));
static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,4})[/\-.](\d{1,2})[/\-.](\d{1,4})$").expect("static regex")
});
static YEARLESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)([a-z]{3,9} \d{1,2}|\d{1,2} [a-z]{3,9})$").expect("static regex")
});
static TRAILING_ZULU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{4}-\d{2}-\d{2}[T ][\d:.]+)z$").expect("static regex"));

const ZONED_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: [&str; 14] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y at %I:%M %p",
    "%B %d, %Y, %I:%M %p",
    "%B %d, %Y, %H:%M",
    "%B %d, %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%d %B %Y, %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const NAMED_DATE_FORMATS: [&str; 7] = [
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d-%B-%Y",
    "%B %d,%Y",
    "%Y %B %d",
];

/// Lenient parser for the date strings found on blog pages.
///
/// Offset-bearing timestamps are converted into `basis`; everything else is
/// taken as wall-clock time already in `basis`. Month-and-day texts without a
/// year ("Apr 21") get the year of `today`, or the year before when that
/// would put them in the future.
#[derive(Debug, Clone, Copy)]
pub struct DateParser {
    basis: FixedOffset,
    today: NaiveDate,
}

impl DateParser {
    pub fn new(basis: FixedOffset, today: NaiveDate) -> Self {
        Self { basis, today }
    }

    /// Parser sharing the window's timezone basis and notion of today.
    pub fn for_window(window: &RecencyWindow) -> Self {
        Self::new(window.basis(), window.today_date())
    }

    /// Parse `raw` as a whole. Surrounding words make this fail; use
    /// [`DateParser::scan`] to search inside longer text.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let text = collapse_whitespace(raw);
        if text.is_empty() || text.len() > MAX_PARSE_LEN {
            return None;
        }

        if let Some(at) = self.parse_zoned(&text) {
            return Some(at);
        }

        let text = normalize(&text);
        parse_naive_datetime(&text)
            .or_else(|| parse_numeric_date(&text).map(|d| d.and_time(NaiveTime::MIN)))
            .or_else(|| parse_named_date(&text).map(|d| d.and_time(NaiveTime::MIN)))
            .or_else(|| self.parse_yearless(&text).map(|d| d.and_time(NaiveTime::MIN)))
    }

    /// Search `text` for the first date shape that both matches and parses.
    ///
    /// Shapes are tried in [`DateShape`] order; within a shape only the first
    /// match is considered.
    pub fn scan(&self, text: &str) -> Option<(NaiveDateTime, DateShape)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        SHAPES.iter().find_map(|(shape, regex)| {
            let found = regex.find(text)?;
            let at = self.parse(found.as_str())?;
            trace!(shape = ?shape, matched = found.as_str(), "Scanned date");
            Some((at, *shape))
        })
    }

    fn parse_zoned(&self, text: &str) -> Option<NaiveDateTime> {
        // `10:00Z` is valid in HTML `datetime` but not RFC 3339.
        let zulu = TRAILING_ZULU.replace(text, "${1}+00:00");
        let text = zulu.as_ref();
        DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_rfc2822(text))
            .ok()
            .or_else(|| {
                ZONED_FORMATS
                    .iter()
                    .find_map(|f| DateTime::parse_from_str(text, f).ok())
            })
            .map(|dt| dt.with_timezone(&self.basis).naive_local())
    }

    fn parse_yearless(&self, text: &str) -> Option<NaiveDate> {
        if !YEARLESS.is_match(text) {
            return None;
        }
        let in_year = |year: i32| parse_named_date(&format!("{text} {year}"));
        let year = self.today.year();
        match in_year(year) {
            Some(date) if date > self.today => in_year(year - 1),
            found => found,
        }
    }
}

/// Strip weekday prefixes, ordinal suffixes and abbreviation dots.
fn normalize(text: &str) -> String {
    let text = WEEKDAY_PREFIX.replace(text, "");
    let text = ORDINAL.replace_all(&text, "$1");
    let text = ABBR_DOT.replace_all(&text, "$1");
    let text = SEPT.replace_all(&text, "Sep");
    text.trim_end_matches(['.', ',', ';']).trim().to_string()
}

fn parse_naive_datetime(text: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
}

/// All-numeric dates: year first, otherwise month first with a day-first
/// fallback when the month would be out of range.
fn parse_numeric_date(text: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(text)?;
    let a = caps.get(1)?.as_str();
    let b: u32 = caps.get(2)?.as_str().parse().ok()?;
    let c = caps.get(3)?.as_str();

    if a.len() == 4 {
        let day: u32 = c.parse().ok()?;
        return NaiveDate::from_ymd_opt(a.parse().ok()?, b, day);
    }
    if c.len() != 4 {
        return None;
    }
    let a: u32 = a.parse().ok()?;
    let year: i32 = c.parse().ok()?;
    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

fn parse_named_date(text: &str) -> Option<NaiveDate> {
    NAMED_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
}

/// Runs the override strategy (if any) and then the generic cascade.
#[derive(Clone)]
pub struct DateExtractor {
    parser: DateParser,
    strategies: Arc<StrategyRegistry>,
}

impl DateExtractor {
    pub fn new(window: &RecencyWindow, strategies: Arc<StrategyRegistry>) -> Self {
        Self {
            parser: DateParser::for_window(window),
            strategies,
        }
    }

    /// Publication date of `candidate`.
    ///
    /// Runs the source's override strategy (if one is named and registered),
    /// then tiers 1 to 4. The first stage that yields a date wins.
    ///
    /// # Arguments
    ///
    /// * `candidate` - An article block and the source it came from
    ///
    /// # Returns
    ///
    /// The date with the [`DateTier`] that found it, or `None` when no stage
    /// finds one.
    pub fn extract(&self, candidate: &ArticleCandidate<'_>) -> Option<ExtractedDate> {
        let element = candidate.element;
        self.from_override(candidate)
            .or_else(|| self.from_attributes(element).map(|at| tier(at, DateTier::Attribute)))
            .or_else(|| self.from_labeled(element))
            .or_else(|| self.from_free_text(element).map(|at| tier(at, DateTier::FreeText)))
    }

    fn from_override(&self, candidate: &ArticleCandidate<'_>) -> Option<ExtractedDate> {
        let id = candidate.source.date_strategy.as_deref()?;
        let Some(strategy) = self.strategies.get(id) else {
            warn!(source = %candidate.source.name, strategy = id, "Unknown date strategy; using generic cascade");
            return None;
        };
        strategy
            .extract(candidate.element, &self.parser)
            .map(|at| tier(at, DateTier::Override))
    }

    /// Tier 1: machine-readable timestamp attributes.
    pub fn from_attributes(&self, element: ElementRef<'_>) -> Option<NaiveDateTime> {
        element
            .select(&DATETIME_ATTR)
            .filter_map(|el| el.value().attr("datetime"))
            .find_map(|value| self.parser.parse(value))
            .or_else(|| {
                element
                    .select(&ITEMPROP_PUBLISHED)
                    .filter_map(|el| el.value().attr("content").or_else(|| el.value().attr("datetime")))
                    .find_map(|value| self.parser.parse(value))
            })
    }

    /// Tiers 2 and 3: the first element of each labeled selector, parsed whole
    /// and then scanned.
    pub fn from_labeled(&self, element: ElementRef<'_>) -> Option<ExtractedDate> {
        LABELED.iter().find_map(|selector| {
            let labeled = element.select(selector).next()?;
            let text = element_text(labeled);
            self.parser
                .parse(&text)
                .map(|at| tier(at, DateTier::Labeled))
                .or_else(|| {
                    self.parser
                        .scan(&text)
                        .map(|(at, _)| tier(at, DateTier::LabeledScan))
                })
        })
    }

    /// Tier 4: every short text block in document order.
    pub fn from_free_text(&self, element: ElementRef<'_>) -> Option<NaiveDateTime> {
        element
            .select(&TEXT_BLOCKS)
            .map(element_text)
            .filter(|text| !text.is_empty() && text.chars().count() < SHORT_TEXT_LIMIT)
            .find_map(|text| self.parser.scan(&text).map(|(at, _)| at))
    }
}

fn tier(at: NaiveDateTime, tier: DateTier) -> ExtractedDate {
    ExtractedDate { at, tier }
}
