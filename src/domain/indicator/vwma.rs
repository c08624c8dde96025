//! VWMA (Volume Weighted Moving Average) indicator.
//!
//! VWMA = sum(C * V, n) / sum(V, n); zero window volume is undefined.
//! Warmup: first (n-1) bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub fn calculate_vwma(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(point(candle, Value::Undefined));
            continue;
        }

        let window = &candles[i + 1 - period..=i];
        let weighted: f64 = window.iter().map(|c| c.close * c.volume).sum();
        let volume: f64 = window.iter().map(|c| c.volume).sum();
        values.push(point(candle, Value::from_f64(weighted / volume)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Vwma(period as i64),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::{defined, make_candle};

    #[test]
    fn vwma_weights_by_volume() {
        let candles = vec![
            make_candle(0, 10.0, 10.0, 10.0, 1.0),
            make_candle(1, 20.0, 20.0, 20.0, 3.0),
            make_candle(2, 30.0, 30.0, 30.0, 1.0),
        ];
        let series = calculate_vwma(&candles, 2);
        assert!(!series.values[0].value.is_defined());
        assert!((defined(&series.values, 1) - 70.0 / 4.0).abs() < 1e-12);
        assert!((defined(&series.values, 2) - 90.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn vwma_zero_volume_undefined() {
        let candles = vec![
            make_candle(0, 10.0, 10.0, 10.0, 0.0),
            make_candle(1, 20.0, 20.0, 20.0, 0.0),
        ];
        let series = calculate_vwma(&candles, 2);
        assert_eq!(series.values[1].value, Value::Undefined);
    }

    #[test]
    fn vwma_volume_draining_to_zero() {
        let candles = vec![
            make_candle(0, 10.0, 10.0, 10.0, 0.1),
            make_candle(1, 11.0, 11.0, 11.0, 0.2),
            make_candle(2, 11.0, 11.0, 11.0, 0.0),
            make_candle(3, 12.0, 12.0, 12.0, 0.0),
        ];
        let series = calculate_vwma(&candles, 2);
        assert!((defined(&series.values, 2) - 11.0).abs() < 1e-12);
        assert_eq!(series.values[3].value, Value::Undefined);
    }

    #[test]
    fn vwma_recovers_after_nan_close() {
        let mut candles: Vec<Candle> = (0..6).map(|i| make_candle(i, 10.0, 10.0, 10.0, 2.0)).collect();
        candles[1].close = f64::NAN;
        let series = calculate_vwma(&candles, 2);
        assert_eq!(series.values[1].value, Value::Undefined);
        assert_eq!(series.values[2].value, Value::Undefined);
        assert_eq!(series.values[3].value, Value::Defined(10.0));
        assert_eq!(series.values[5].value, Value::Defined(10.0));
    }
}
