//! VWAP (Volume Weighted Average Price) indicator.
//!
//! Cumulative sum(TP * V) / sum(V), anchored to each UTC calendar day: the
//! accumulators reset on the first candle of a new day. Zero cumulative
//! volume is undefined. Parameterless.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub fn calculate_vwap(candles: &[Candle]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());
    let mut session = None;
    let mut price_volume = 0.0;
    let mut volume = 0.0;

    for candle in candles {
        let day = candle.timestamp.date_naive();
        if session != Some(day) {
            session = Some(day);
            price_volume = 0.0;
            volume = 0.0;
        }

        price_volume += candle.typical_price() * candle.volume;
        volume += candle.volume;
        values.push(point(candle, Value::from_f64(price_volume / volume)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Vwap,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::{defined, make_candle};
    use chrono::TimeDelta;

    #[test]
    fn vwap_accumulates_within_day() {
        let candles = vec![
            make_candle(0, 12.0, 8.0, 10.0, 100.0), // TP 10
            make_candle(1, 22.0, 18.0, 20.0, 300.0), // TP 20
        ];
        let series = calculate_vwap(&candles);
        assert!((defined(&series.values, 0) - 10.0).abs() < 1e-12);
        assert!((defined(&series.values, 1) - 7000.0 / 400.0).abs() < 1e-12);
    }

    #[test]
    fn vwap_resets_each_day() {
        let mut next_day = make_candle(0, 32.0, 28.0, 30.0, 50.0);
        next_day.timestamp += TimeDelta::days(1);
        let candles = vec![make_candle(0, 12.0, 8.0, 10.0, 100.0), next_day];
        let series = calculate_vwap(&candles);
        assert!((defined(&series.values, 1) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn vwap_zero_volume_undefined() {
        let candles = vec![make_candle(0, 12.0, 8.0, 10.0, 0.0)];
        let series = calculate_vwap(&candles);
        assert_eq!(series.values[0].value, Value::Undefined);
        assert_eq!(series.indicator_type, IndicatorType::Vwap);
    }
}
