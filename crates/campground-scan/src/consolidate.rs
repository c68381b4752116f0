use std::fmt;

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use rec_gov::AVAILABLE;
use serde::Serialize;
use tracing::warn;

use crate::dates::parse_day;

/// Closed run of consecutive available nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DateRange {
    /// First available night.
    pub first: NaiveDate,
    /// Last available night, equal to `first` for a single night.
    pub last: NaiveDate,
}

impl DateRange {
    /// Number of nights covered.
    pub fn nights(&self) -> i64 {
        (self.last - self.first).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{} to {}", self.first, self.last)
        }
    }
}

/// Collapse a date to status map into ranges of consecutive available nights.
///
/// Only entries whose status is exactly `"Available"` count. Dates are sorted
/// by calendar day first, so the iteration order of the input does not matter.
/// Runs are found by grouping on `ordinal day - position`, which stays
/// constant while days are consecutive.
pub fn consolidate<I, K, V>(availabilities: I) -> Vec<DateRange>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut days: Vec<NaiveDate> = availabilities
        .into_iter()
        .filter(|(_, status)| status.as_ref() == AVAILABLE)
        .filter_map(|(key, _)| {
            let day = parse_day(key.as_ref());
            if day.is_none() {
                warn!("Skipping unparseable availability date: {}", key.as_ref());
            }
            day
        })
        .collect();

    days.sort_unstable();
    days.dedup();

    let runs = days
        .into_iter()
        .enumerate()
        .chunk_by(|&(position, day)| i64::from(day.num_days_from_ce()) - position as i64);

    runs.into_iter()
        .filter_map(|(_, run)| {
            let mut run = run.map(|(_, day)| day);
            let first = run.next()?;
            let last = run.last().unwrap_or(first);
            Some(DateRange { first, last })
        })
        .collect()
}
