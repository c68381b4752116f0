use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::ScanError;

/// Calendar date of an availability key.
///
/// Only the first 10 characters (`YYYY-MM-DD`) are read, so
/// `2021-06-01T00:00:00Z` and `2021-06-01` name the same night. The
/// time-of-day and any offset are ignored.
pub fn parse_day(key: &str) -> Option<NaiveDate> {
    let day = key.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// First day of the month containing `date`, at midnight.
pub fn month_anchor(date: NaiveDate) -> NaiveDateTime {
    date.with_day(1)
        .unwrap_or(date)
        .and_time(NaiveTime::MIN)
}

/// Whether `month` is the first day of a month at midnight.
pub fn is_month_anchor(month: NaiveDateTime) -> bool {
    month.day() == 1 && month.num_seconds_from_midnight() == 0 && month.nanosecond() == 0
}

/// Reject anything that is not a month anchor.
pub fn ensure_month_anchor(month: NaiveDateTime) -> Result<NaiveDateTime, ScanError> {
    if is_month_anchor(month) {
        Ok(month)
    } else {
        Err(ScanError::InvalidMonthAnchor(month))
    }
}

/// Anchor of the month after the one containing `month`.
pub fn next_month(month: NaiveDateTime) -> NaiveDateTime {
    let anchor = month_anchor(month.date());
    anchor
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Inclusive run of month anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    next: Option<NaiveDateTime>,
    last: NaiveDateTime,
}

impl MonthRange {
    /// Months from the one containing `first` through the one containing `last`.
    ///
    /// Empty when `last` falls in an earlier month than `first`.
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            next: Some(month_anchor(first)),
            last: month_anchor(last),
        }
    }

    /// The month containing `first` and the month after it.
    pub fn starting_at(first: NaiveDate) -> Self {
        let first = month_anchor(first);
        Self {
            next: Some(first),
            last: next_month(first),
        }
    }
}

impl Iterator for MonthRange {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|month| *month <= self.last)?;
        let following = next_month(current);
        self.next = (following > current).then_some(following);
        Some(current)
    }
}
