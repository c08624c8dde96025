//! Simple Moving Average indicator.
//!
//! Rolling mean of the last n closes. Warmup: first (n-1) bars undefined.
//! A NaN close leaves only the windows containing it undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub fn calculate_sma(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(point(candle, Value::Undefined));
            continue;
        }

        let sum: f64 = candles[i + 1 - period..=i].iter().map(|c| c.close).sum();
        values.push(point(candle, Value::from_f64(sum / period as f64)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period as i64),
        values,
    }
}
