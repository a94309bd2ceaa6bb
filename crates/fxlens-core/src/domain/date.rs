use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::ValidationError;

const DAY_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Calendar date with day-level granularity and no time component.
///
/// Formats and parses as `YYYY-MM-DD`. Equality and ordering are by date
/// only, which makes this the join key for daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(Date);

impl Day {
    /// Current date in UTC.
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    /// Parse a strict `YYYY-MM-DD` string. Zero-padded component widths
    /// are enforced by the format description.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input, DAY_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// UTC calendar date of a Unix timestamp. Provider feeds key daily rows
    /// by a timestamp somewhere inside the trading day; only the date part
    /// matters here.
    pub fn from_unix_timestamp(value: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(value)
            .map(|dt| Self(dt.date()))
            .map_err(|_| ValidationError::TimestampOutOfRange { value })
    }

    /// Unix timestamp of this day's midnight, UTC.
    pub fn start_of_day_unix(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub fn minus_days(self, days: i64) -> Result<Self, ValidationError> {
        self.0
            .checked_sub(Duration::days(days))
            .map(Self)
            .ok_or(ValidationError::DateOutOfRange)
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.0.format(DAY_FORMAT).map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Caller-supplied date range with optional bounds.
///
/// Defaults follow the converted-series contract: end falls back to today,
/// start to end minus 30 calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Day>,
    pub end: Option<Day>,
}

impl DateRange {
    pub const fn new(start: Option<Day>, end: Option<Day>) -> Self {
        Self { start, end }
    }

    /// Apply the defaults against `today` and reject inverted ranges.
    pub fn resolve(self, today: Day) -> Result<(Day, Day), ValidationError> {
        let end = self.end.unwrap_or(today);
        let start = match self.start {
            Some(start) => start,
            None => end.minus_days(30)?,
        };

        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok((start, end))
    }
}
