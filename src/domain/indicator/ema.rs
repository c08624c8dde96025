//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar is defined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub fn calculate_ema(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;

    for (i, candle) in candles.iter().enumerate() {
        ema = if i == 0 {
            candle.close
        } else {
            candle.close * k + ema * (1.0 - k)
        };
        values.push(point(candle, Value::from_f64(ema)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period as i64),
        values,
    }
}
