//! Timeframe parsing and interval arithmetic.
//!
//! Timeframes are written as `YYYY`, `YYYY-MM` or `YYYY-MM-DD` and denote
//! an inclusive range of days.

use super::error::TimeframeError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timeframe {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Timeframe {
    /// Create a timeframe from two dates
    ///
    /// Returns `None` if `start` comes after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The full range of days a timeframe string covers
    ///
    /// `"2021"` covers 2021-01-01 to 2021-12-31, `"2020-02"` covers
    /// 2020-02-01 to 2020-02-29.
    pub fn parse(timeframe: &str) -> Result<Self, TimeframeError> {
        Ok(Self {
            start: parse_timeframe_start(timeframe)?,
            end: parse_timeframe_end(timeframe)?,
        })
    }

    /// From the first day of `start` to the last day of `end`
    pub fn between(start: &str, end: &str) -> Result<Self, TimeframeError> {
        let first = parse_timeframe_start(start)?;
        let last = parse_timeframe_end(end)?;
        Self::new(first, last)
            .ok_or_else(|| TimeframeError::InvalidFormat(format!("{} is after {}", start, end)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &Timeframe) -> bool {
        intervals_overlap(self, other)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// First day of a timeframe string
///
/// # Errors
/// * `TimeframeError::InvalidFormat` - not one of the three accepted shapes,
///   or not a real calendar date
pub fn parse_timeframe_start(timeframe: &str) -> Result<NaiveDate, TimeframeError> {
    let (year, month, day) = split_timeframe(timeframe)?;
    NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))
        .ok_or_else(|| TimeframeError::InvalidFormat(timeframe.to_string()))
}

/// Last day of a timeframe string
///
/// A missing month means December, a missing day means the last day of the
/// month.
pub fn parse_timeframe_end(timeframe: &str) -> Result<NaiveDate, TimeframeError> {
    let (year, month, day) = split_timeframe(timeframe)?;
    let month = month.unwrap_or(12);
    let invalid = || TimeframeError::InvalidFormat(timeframe.to_string());

    match day {
        Some(day) => NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid),
        None => last_day_of_month(year, month).ok_or_else(invalid),
    }
}

/// True if the two closed intervals share at least one day
///
/// An interval that ends before it starts is empty.
pub fn intervals_overlap(a: &Timeframe, b: &Timeframe) -> bool {
    if a.start > a.end || b.start > b.end {
        return false;
    }
    let checks = [
        a.start <= b.start && b.start <= a.end,
        a.start <= b.end && b.end <= a.end,
        b.start <= a.start && a.start <= b.end,
        b.start <= a.end && a.end <= b.end,
    ];
    checks.iter().any(|&overlap| overlap)
}

/// Validity window of an ownership claim
///
/// `from` is inclusive and `to` exclusive. An empty bound is unbounded on
/// that side. A window that ends before it starts is returned as-is and
/// simply never overlaps anything.
pub fn claim_window(from: &str, to: &str) -> Result<Timeframe, TimeframeError> {
    let start = if from.is_empty() {
        NaiveDate::MIN
    } else {
        parse_timeframe_start(from)?
    };

    let end = if to.is_empty() {
        NaiveDate::MAX
    } else {
        let first_excluded = parse_timeframe_start(to)?;
        first_excluded.pred_opt().unwrap_or(NaiveDate::MIN)
    };

    Ok(Timeframe { start, end })
}

/// Check a timeframe string without keeping the result
pub fn valid_timeframe(timeframe: &str) -> Result<(), TimeframeError> {
    parse_timeframe_start(timeframe).map(|_| ())
}

fn split_timeframe(timeframe: &str) -> Result<(i32, Option<u32>, Option<u32>), TimeframeError> {
    let invalid = || TimeframeError::InvalidFormat(timeframe.to_string());
    let parts: Vec<&str> = timeframe.split('-').collect();

    let field = |part: &str, width: usize| -> Result<u32, TimeframeError> {
        if part.len() != width || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    match parts.as_slice() {
        [year] => Ok((field(year, 4)? as i32, None, None)),
        [year, month] => Ok((field(year, 4)? as i32, Some(field(month, 2)?), None)),
        [year, month, day] => Ok((
            field(year, 4)? as i32,
            Some(field(month, 2)?),
            Some(field(day, 2)?),
        )),
        _ => Err(invalid()),
    }
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_month - Duration::days(1))
}
