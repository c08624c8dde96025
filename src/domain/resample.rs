//! Candle resampling onto a coarser calendar grid.
//!
//! | field  | aggregate        |
//! |--------|------------------|
//! | open   | first in bucket  |
//! | high   | max in bucket    |
//! | low    | min in bucket    |
//! | close  | last in bucket   |
//! | volume | sum over bucket  |
//!
//! NaN field values do not contribute. A bucket that ends up without an
//! open, high, low or close is dropped, never filled. Buckets without any
//! contributing rows are never emitted.

use crate::domain::error::CandlelabError;
use crate::domain::ohlcv::{sort_and_check, Candle};
use crate::domain::timeframe::Timeframe;
use chrono::{DateTime, Utc};
use tracing::debug;

struct Bucket {
    start: DateTime<Utc>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: f64,
}

impl Bucket {
    fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: 0.0,
        }
    }

    fn push(&mut self, candle: &Candle) {
        if self.open.is_none() && !candle.open.is_nan() {
            self.open = Some(candle.open);
        }
        if !candle.high.is_nan() {
            self.high = Some(self.high.map_or(candle.high, |h| h.max(candle.high)));
        }
        if !candle.low.is_nan() {
            self.low = Some(self.low.map_or(candle.low, |l| l.min(candle.low)));
        }
        if !candle.close.is_nan() {
            self.close = Some(candle.close);
        }
        if !candle.volume.is_nan() {
            self.volume += candle.volume;
        }
    }

    fn finish(self) -> Option<Candle> {
        Some(Candle {
            timestamp: self.start,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume,
        })
    }
}

/// Aggregates `candles` into `timeframe` buckets labelled by bucket start.
///
/// The input is sorted first; duplicate timestamps are rejected with
/// `MalformedInput`. The returned index is strictly increasing.
pub fn resample(candles: &[Candle], timeframe: Timeframe) -> Result<Vec<Candle>, CandlelabError> {
    let mut sorted = candles.to_vec();
    sort_and_check(&mut sorted)?;

    let mut resampled = Vec::new();
    let mut dropped = 0usize;
    let mut current: Option<Bucket> = None;

    for candle in &sorted {
        let start = timeframe.bucket_start(candle.timestamp)?;

        if let Some(bucket) = current.as_mut() {
            if bucket.start == start {
                bucket.push(candle);
                continue;
            }
        }

        if let Some(done) = current.take() {
            match done.finish() {
                Some(c) => resampled.push(c),
                None => dropped += 1,
            }
        }
        let mut bucket = Bucket::new(start);
        bucket.push(candle);
        current = Some(bucket);
    }

    if let Some(done) = current {
        match done.finish() {
            Some(c) => resampled.push(c),
            None => dropped += 1,
        }
    }

    debug!(
        input = candles.len(),
        output = resampled.len(),
        dropped,
        %timeframe,
        "resampled candles"
    );
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn candle(minutes: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle {
            timestamp: base() + TimeDelta::minutes(minutes),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn tf(s: &str) -> Timeframe {
        s.parse().unwrap()
    }

    #[test]
    fn aggregates_ohlcv_per_bucket() {
        let candles = vec![
            candle(0, 10.0, 12.0, 9.0, 11.0, 100.0),
            candle(15, 11.0, 15.0, 10.0, 14.0, 50.0),
            candle(30, 14.0, 14.5, 8.0, 9.0, 25.0),
            candle(45, 9.0, 10.0, 8.5, 9.5, 25.0),
            candle(60, 9.5, 11.0, 9.0, 10.5, 10.0),
        ];
        let out = resample(&candles, tf("1h")).unwrap();

        assert_eq!(out.len(), 2);
        let first = &out[0];
        assert_eq!(first.timestamp, base());
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 15.0);
        assert_eq!(first.low, 8.0);
        assert_eq!(first.close, 9.5);
        assert_eq!(first.volume, 200.0);

        let second = &out[1];
        assert_eq!(second.timestamp, base() + TimeDelta::hours(1));
        assert_eq!(second.open, 9.5);
        assert_eq!(second.close, 10.5);
        assert_eq!(second.volume, 10.0);
    }

    #[test]
    fn gaps_are_dropped_not_filled() {
        let candles = vec![
            candle(0, 1.0, 1.0, 1.0, 1.0, 1.0),
            candle(180, 2.0, 2.0, 2.0, 2.0, 1.0),
        ];
        let out = resample(&candles, tf("1h")).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].timestamp - out[0].timestamp, TimeDelta::hours(3));
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let candles = vec![
            candle(30, 3.0, 3.0, 3.0, 3.0, 1.0),
            candle(0, 1.0, 1.0, 1.0, 1.0, 1.0),
            candle(15, 2.0, 2.0, 2.0, 2.0, 1.0),
        ];
        let out = resample(&candles, tf("1h")).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].open, 1.0);
        assert_eq!(out[0].close, 3.0);
    }

    #[test]
    fn duplicate_timestamps_are_rejected() {
        let candles = vec![
            candle(0, 1.0, 1.0, 1.0, 1.0, 1.0),
            candle(0, 2.0, 2.0, 2.0, 2.0, 1.0),
        ];
        let err = resample(&candles, tf("1h")).unwrap_err();
        assert!(matches!(err, CandlelabError::MalformedInput { .. }));
    }

    #[test]
    fn nan_fields_are_skipped() {
        let candles = vec![
            candle(0, f64::NAN, 5.0, 1.0, 3.0, f64::NAN),
            candle(15, 2.0, f64::NAN, 0.5, f64::NAN, 4.0),
        ];
        let out = resample(&candles, tf("1h")).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].open, 2.0);
        assert_eq!(out[0].high, 5.0);
        assert_eq!(out[0].low, 0.5);
        assert_eq!(out[0].close, 3.0);
        assert_eq!(out[0].volume, 4.0);
    }

    #[test]
    fn incomplete_bucket_is_dropped() {
        let candles = vec![
            candle(0, 1.0, 2.0, 0.5, 1.5, 3.0),
            candle(60, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 7.0),
        ];
        let out = resample(&candles, tf("1h")).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].timestamp, base());
    }

    #[test]
    fn finer_target_keeps_each_candle() {
        let candles = vec![
            candle(0, 1.0, 1.0, 1.0, 1.0, 1.0),
            candle(60, 2.0, 2.0, 2.0, 2.0, 1.0),
        ];
        let out = resample(&candles, tf("15min")).unwrap();
        assert_eq!(out, candles);
    }

    #[test]
    fn empty_input() {
        assert!(resample(&[], tf("1d")).unwrap().is_empty());
    }

    #[test]
    fn monthly_resample() {
        let days: Vec<Candle> = (0..60)
            .map(|d| candle(d * 24 * 60, d as f64, d as f64 + 1.0, d as f64 - 1.0, d as f64, 1.0))
            .collect();
        let out = resample(&days, tf("1ME")).unwrap();
        // January (31 days) and February 2024 (29 days).
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].volume, 31.0);
        assert_eq!(out[1].volume, 29.0);
        assert_eq!(out[1].open, 31.0);
        assert_eq!(out[1].close, 59.0);
    }
}
