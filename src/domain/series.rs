//! Time-indexed value series.
//!
//! - `Value`: a defined float or the explicit "no value" state
//! - `SeriesPoint`: one timestamped value
//! - `Series`: an ordered sequence of points sharing one time index

use crate::domain::ohlcv::{Candle, PriceField};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Defined(f64),
    Undefined,
}

impl Value {
    /// Maps non-finite arithmetic results (division by zero, NaN) to `Undefined`.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() {
            Value::Defined(v)
        } else {
            Value::Undefined
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Value::Defined(v) => Some(v),
            Value::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Value::Defined(_))
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Undefined, Value::Defined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    /// Raw candle column, every point defined.
    pub fn from_candles(candles: &[Candle], field: PriceField) -> Self {
        let points = candles
            .iter()
            .map(|c| SeriesPoint {
                timestamp: c.timestamp,
                value: Value::Defined(c.field(field)),
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<Value> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Drops indicator warmup: every point before the first defined one.
    pub fn skip_leading_undefined(&self) -> Series {
        let start = self
            .points
            .iter()
            .position(|p| p.value.is_defined())
            .unwrap_or(self.points.len());
        Series {
            points: self.points[start..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0).unwrap()
    }

    #[test]
    fn from_f64_rejects_non_finite() {
        assert_eq!(Value::from_f64(1.5), Value::Defined(1.5));
        assert_eq!(Value::from_f64(f64::NAN), Value::Undefined);
        assert_eq!(Value::from_f64(f64::INFINITY), Value::Undefined);
    }

    #[test]
    fn zero_is_a_defined_value() {
        assert!(Value::from_f64(0.0).is_defined());
        assert_eq!(Value::Defined(-0.0).as_f64(), Some(-0.0));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(Some(2.0)), Value::Defined(2.0));
        assert_eq!(Value::from(None), Value::Undefined);
    }

    #[test]
    fn from_candles_takes_requested_field() {
        let candles = vec![
            Candle {
                timestamp: ts(0),
                open: 1.0,
                high: 3.0,
                low: 0.5,
                close: 2.0,
                volume: 10.0,
            },
            Candle {
                timestamp: ts(1),
                open: 2.0,
                high: 4.0,
                low: 1.5,
                close: 3.5,
                volume: 12.0,
            },
        ];
        let series = Series::from_candles(&candles, PriceField::Close);
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), vec![Value::Defined(2.0), Value::Defined(3.5)]);
        assert_eq!(series.timestamps(), vec![ts(0), ts(1)]);
    }

    #[test]
    fn skip_leading_undefined_drops_warmup_only() {
        let series = Series::new(vec![
            SeriesPoint { timestamp: ts(0), value: Value::Undefined },
            SeriesPoint { timestamp: ts(1), value: Value::Undefined },
            SeriesPoint { timestamp: ts(2), value: Value::Defined(4.0) },
            SeriesPoint { timestamp: ts(3), value: Value::Undefined },
        ]);
        let trimmed = series.skip_leading_undefined();
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed.points[0].timestamp, ts(2));
        assert_eq!(trimmed.points[1].value, Value::Undefined);
    }

    #[test]
    fn skip_leading_undefined_all_undefined() {
        let series = Series::new(vec![SeriesPoint {
            timestamp: ts(0),
            value: Value::Undefined,
        }]);
        assert!(series.skip_leading_undefined().is_empty());
    }
}
