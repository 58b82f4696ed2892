//! The two-day recency window.
//!
//! A run looks for posts published "today" or "yesterday". Both days are
//! fixed when the run starts so every source is judged against the same pair,
//! even if the run crosses midnight.

use chrono::{Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset};

/// Yesterday-midnight and today-midnight in a fixed timezone basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
    basis: FixedOffset,
}

impl RecencyWindow {
    /// Window for the current local day, using the local UTC offset at this
    /// instant as the basis for the whole run.
    pub fn today() -> Self {
        let now = Local::now();
        Self::for_day(now.date_naive(), now.offset().fix())
    }

    /// Window whose "today" is `today`, interpreted in `basis`.
    pub fn for_day(today: NaiveDate, basis: FixedOffset) -> Self {
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        Self {
            start: yesterday.and_time(NaiveTime::MIN),
            end: today.and_time(NaiveTime::MIN),
            basis,
        }
    }

    /// Yesterday at midnight.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Today at midnight.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn today_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn yesterday_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// UTC offset that wall-clock instants are expressed in.
    pub fn basis(&self) -> FixedOffset {
        self.basis
    }

    /// True when `at` falls on yesterday or today.
    ///
    /// The window is two discrete days: 00:01 and 23:59 today both match, any
    /// instant the day before yesterday or tomorrow does not.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = truncate(at);
        day == self.start || day == self.end
    }
}

/// Drop the time of day, keeping the calendar date at midnight.
pub fn truncate(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn window() -> RecencyWindow {
        RecencyWindow::for_day(NaiveDate::from_ymd_opt(2025, 4, 21).unwrap(), utc())
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_window_bounds_are_midnights() {
        let w = window();
        assert_eq!(w.start(), at(2025, 4, 20, 0, 0));
        assert_eq!(w.end(), at(2025, 4, 21, 0, 0));
        assert!(w.start() < w.end());
        assert_eq!(truncate(w.start()), w.start());
        assert_eq!(truncate(w.end()), w.end());
    }

    #[test]
    fn test_truncate_is_idempotent() {
        for d in [at(2025, 4, 21, 23, 59), at(2024, 2, 29, 0, 1), at(1999, 12, 31, 12, 0)] {
            assert_eq!(truncate(truncate(d)), truncate(d));
        }
    }

    #[test]
    fn test_today_and_yesterday_are_in_window() {
        let w = window();
        assert!(w.contains(at(2025, 4, 21, 0, 1)));
        assert!(w.contains(at(2025, 4, 21, 23, 59)));
        assert!(w.contains(at(2025, 4, 20, 0, 0)));
        assert!(w.contains(at(2025, 4, 20, 18, 45)));
    }

    #[test]
    fn test_older_and_future_dates_are_out_of_window() {
        let w = window();
        assert!(!w.contains(at(2025, 4, 19, 23, 59)));
        assert!(!w.contains(at(2025, 4, 1, 12, 0)));
        assert!(!w.contains(at(2025, 4, 22, 0, 0)));
        assert!(!w.contains(at(2026, 4, 21, 12, 0)));
    }

    #[test]
    fn test_window_spans_month_and_year_boundaries() {
        let w = RecencyWindow::for_day(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), utc());
        assert_eq!(w.yesterday_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert!(w.contains(at(2024, 12, 31, 8, 0)));
    }
}
