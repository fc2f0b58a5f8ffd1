//! Composite (date, hour, weekday) key used across every stage of the pipeline.

use chrono::{NaiveDate, Weekday};
use serde::Serializer;
use std::cmp::Ordering;
use std::fmt;

/// Identifies one time slice: a calendar date, an hour of day and its weekday.
///
/// Ordering is lexicographic on (date, hour, weekday), with weekdays ordered
/// Monday first. Reports are emitted in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSliceKey {
    pub date: NaiveDate,
    pub hour: u8,
    pub weekday: Weekday,
}

impl TimeSliceKey {
    pub fn new(date: NaiveDate, hour: u8, weekday: Weekday) -> Self {
        Self {
            date,
            hour,
            weekday,
        }
    }
}

impl Ord for TimeSliceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then(self.hour.cmp(&other.hour))
            .then(
                self.weekday
                    .num_days_from_monday()
                    .cmp(&other.weekday.num_days_from_monday()),
            )
    }
}

impl PartialOrd for TimeSliceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeSliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.date.format("%Y-%m-%d"),
            self.hour,
            weekday_name(self.weekday)
        )
    }
}

/// Full English name of a weekday, as written in the input and output tables.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full or abbreviated English weekday name (case-insensitive).
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}

pub(crate) fn serialize_weekday<S: Serializer>(
    weekday: &Weekday,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*weekday))
}
