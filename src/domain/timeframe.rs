//! Timeframes and calendar-aligned bucketing.
//!
//! Labels follow exchange conventions with the pandas aliases accepted too:
//! `1m`/`15min`, `1h`, `1d`, `1w`, `1M`/`1ME`/`3mo`. Lowercase `m` is minutes,
//! uppercase `M` is months.
//!
//! Buckets are left-closed and labelled by their start: weekly candles carry
//! the Monday, monthly candles the 1st. pandas `W` and `ME` label by the
//! period end (Sunday, last day of month) instead, so those labels differ by
//! up to one period; the candles they hold are the same.

use crate::domain::error::CandlelabError;
use chrono::{DateTime, Datelike, DurationRound, NaiveDate, NaiveTime, TimeDelta, Utc};
use std::fmt;
use std::str::FromStr;

/// Days from 0001-01-01 to 1969-12-29, the Monday before the Unix epoch.
const EPOCH_MONDAY_CE: i32 = 719_160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    count: u32,
    unit: TimeUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timeframe {input:?}: {reason}")]
pub struct ParseTimeframeError {
    pub input: String,
    pub reason: String,
}

impl Timeframe {
    pub fn new(count: u32, unit: TimeUnit) -> Result<Self, CandlelabError> {
        if count == 0 {
            return Err(CandlelabError::InvalidParameter {
                name: "timeframe".into(),
                reason: "count must be at least 1".into(),
            });
        }
        Ok(Self { count, unit })
    }

    /// Nominal span, 30 days per month.
    pub fn approx_duration(&self) -> TimeDelta {
        let count = i64::from(self.count);
        match self.unit {
            TimeUnit::Minute => TimeDelta::minutes(count),
            TimeUnit::Hour => TimeDelta::hours(count),
            TimeUnit::Day => TimeDelta::days(count),
            TimeUnit::Week => TimeDelta::weeks(count),
            TimeUnit::Month => TimeDelta::days(30 * count),
        }
    }

    /// Start of the bucket containing `ts`.
    ///
    /// Minute, hour and day buckets are multiples of the span since the Unix
    /// epoch. Weeks start Monday 00:00 UTC, months on the 1st at 00:00 UTC;
    /// multi-week and multi-month blocks are counted from the epoch.
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> Result<DateTime<Utc>, CandlelabError> {
        let out_of_range = || CandlelabError::MalformedInput {
            reason: format!("timestamp {ts} cannot be bucketed into {self}"),
        };

        match self.unit {
            TimeUnit::Minute | TimeUnit::Hour | TimeUnit::Day => ts
                .duration_trunc(self.approx_duration())
                .map_err(|_| out_of_range()),
            TimeUnit::Week => {
                let days = ts.date_naive().num_days_from_ce() - EPOCH_MONDAY_CE;
                let span = 7 * self.count as i32;
                let start = EPOCH_MONDAY_CE + days.div_euclid(span) * span;
                let date = NaiveDate::from_num_days_from_ce_opt(start).ok_or_else(out_of_range)?;
                Ok(date.and_time(NaiveTime::MIN).and_utc())
            }
            TimeUnit::Month => {
                let months = (ts.year() - 1970) * 12 + ts.month0() as i32;
                let span = self.count as i32;
                let block = months.div_euclid(span) * span;
                let year = 1970 + block.div_euclid(12);
                let month = block.rem_euclid(12) as u32 + 1;
                let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
                Ok(date.and_time(NaiveTime::MIN).and_utc())
            }
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.unit {
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Week => "w",
            TimeUnit::Month => "M",
        };
        write!(f, "{}{}", self.count, suffix)
    }
}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let err = |reason: &str| ParseTimeframeError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let split = input
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| err("missing unit"))?;
        let (digits, suffix) = input.split_at(split);

        let count = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| err("count out of range"))?
        };
        if count == 0 {
            return Err(err("count must be at least 1"));
        }

        let unit = match suffix {
            "m" | "min" | "T" => TimeUnit::Minute,
            "h" | "H" => TimeUnit::Hour,
            "d" | "D" => TimeUnit::Day,
            "w" | "W" => TimeUnit::Week,
            "M" | "ME" | "MS" | "mo" => TimeUnit::Month,
            _ => return Err(err("unknown unit")),
        };

        Ok(Timeframe { count, unit })
    }
}
