//! ATR (Average True Range) indicator.
//!
//! TR[0] = high - low, TR[i] = true_range(close[i-1]).
//! Seed: mean of the first n TRs, then ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n.
//! Warmup: first (n-1) bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub(crate) fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.high - c.low
            } else {
                c.true_range(candles[i - 1].close)
            }
        })
        .collect()
}

pub fn calculate_atr(candles: &[Candle], period: usize) -> IndicatorSeries {
    let tr_values = true_ranges(candles);
    let mut values = Vec::with_capacity(candles.len());
    let mut atr = 0.0;

    for (i, candle) in candles.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(point(candle, Value::Undefined));
            continue;
        }

        atr = if i + 1 == period {
            tr_values[..=i].iter().sum::<f64>() / period as f64
        } else {
            (atr * (period - 1) as f64 + tr_values[i]) / period as f64
        };
        values.push(point(candle, Value::from_f64(atr)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period as i64),
        values,
    }
}
