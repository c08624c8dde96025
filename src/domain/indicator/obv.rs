//! OBV (On-Balance Volume) indicator implementation.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

/// Calculate OBV (On-Balance Volume) indicator.
///
/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period; all bars are defined.
pub fn calculate_obv(candles: &[Candle]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());
    let mut obv: f64 = 0.0;
    let mut prev_close: f64 = 0.0;

    for (i, candle) in candles.iter().enumerate() {
        if i == 0 {
            obv = candle.volume;
        } else if candle.close > prev_close {
            obv += candle.volume;
        } else if candle.close < prev_close {
            obv -= candle.volume;
        }
        prev_close = candle.close;

        values.push(point(candle, Value::from_f64(obv)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Obv,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::{defined, make_candle};

    fn candles(rows: &[(f64, f64)]) -> Vec<Candle> {
        rows.iter()
            .enumerate()
            .map(|(i, &(close, volume))| make_candle(i, close, close, close, volume))
            .collect()
    }

    #[test]
    fn obv_first_bar_is_volume() {
        let series = calculate_obv(&candles(&[(100.0, 1000.0)]));
        assert_eq!(series.values.len(), 1);
        assert!((defined(&series.values, 0) - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn obv_adds_volume_on_up_bar() {
        let series = calculate_obv(&candles(&[(100.0, 1000.0), (105.0, 500.0)]));
        assert!((defined(&series.values, 1) - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn obv_subtracts_volume_on_down_bar() {
        let series = calculate_obv(&candles(&[(100.0, 1000.0), (95.0, 300.0)]));
        assert!((defined(&series.values, 1) - 700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn obv_unchanged_on_flat_bar() {
        let series = calculate_obv(&candles(&[(100.0, 1000.0), (100.0, 500.0)]));
        assert!((defined(&series.values, 1) - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn obv_all_bars_defined() {
        let series = calculate_obv(&candles(&[(100.0, 1000.0), (105.0, 500.0), (102.0, 200.0)]));
        assert!(series.values.iter().all(|p| p.value.is_defined()));
        assert_eq!(series.indicator_type, IndicatorType::Obv);
    }
}
