//! Williams %R indicator.
//!
//! %R = -100 * (HH - C) / (HH - LL) over the last n bars.
//! A flat window (HH == LL) is undefined.
//! Warmup: first (n-1) bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub fn calculate_willr(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(point(candle, Value::Undefined));
            continue;
        }

        let window = &candles[i + 1 - period..=i];
        let highest = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let willr = -100.0 * (highest - candle.close) / (highest - lowest);
        values.push(point(candle, Value::from_f64(willr)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::WilliamsR(period as i64),
        values,
    }
}
