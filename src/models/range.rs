//! Calendar date ranges
//!
//! Aggregators filter transactions by week, month or year. A `DateRange` is
//! half-open: `start` is included, `end` is not.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range of calendar days `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `end` is exclusive
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The single day containing `day`
    pub fn day_of(day: NaiveDate) -> Self {
        Self::new(day, day + Duration::days(1))
    }

    /// The seven-day week containing `day`, starting on `first_weekday`
    pub fn week_of(day: NaiveDate, first_weekday: Weekday) -> Self {
        let offset = days_after(day.weekday(), first_weekday);
        let start = day - Duration::days(offset);
        Self::new(start, start + Duration::days(7))
    }

    /// The calendar month containing `day`
    pub fn month_of(day: NaiveDate) -> Self {
        let start = first_of_month(day.year(), day.month());
        let end = if day.month() == 12 {
            first_of_month(day.year() + 1, 1)
        } else {
            first_of_month(day.year(), day.month() + 1)
        };
        Self::new(start, end)
    }

    /// The calendar year containing `day`
    pub fn year_of(day: NaiveDate) -> Self {
        Self::new(first_of_month(day.year(), 1), first_of_month(day.year() + 1, 1))
    }

    /// Whether a day falls inside the range
    pub fn contains_date(&self, day: NaiveDate) -> bool {
        day >= self.start && day < self.end
    }

    /// Whether a moment falls inside the range
    pub fn contains(&self, moment: NaiveDateTime) -> bool {
        self.contains_date(moment.date())
    }

    /// Number of days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    /// The last day inside the range
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    /// Each day in the range, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days()).map(move |offset| self.start + Duration::days(offset))
    }

    /// Split the range at week boundaries, clipping the first and last weeks
    pub fn week_slices(&self, first_weekday: Weekday) -> Vec<DateRange> {
        let mut slices = Vec::new();
        let mut cursor = self.start;

        while cursor < self.end {
            let week = Self::week_of(cursor, first_weekday);
            let start = week.start.max(self.start);
            let end = week.end.min(self.end);
            if start >= end {
                break;
            }
            slices.push(Self::new(start, end));
            cursor = end;
        }

        slices
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.last_day())
    }
}

fn days_after(day: Weekday, first: Weekday) -> i64 {
    let day = i64::from(day.num_days_from_monday());
    let first = i64::from(first.num_days_from_monday());
    (day - first).rem_euclid(7)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse a weekday name ("monday", "sun", ...)
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}
