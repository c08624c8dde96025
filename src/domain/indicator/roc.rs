//! ROC (Rate of Change) indicator implementation.
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100
//! If C[i-n] == 0: ROC = 0
//! Warmup: first n bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

pub fn calculate_roc(candles: &[Candle], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        let value = if period > 0 && i >= period {
            let prev_close = candles[i - period].close;
            if prev_close == 0.0 {
                Value::Defined(0.0)
            } else {
                Value::from_f64(((candle.close - prev_close) / prev_close) * 100.0)
            }
        } else {
            Value::Undefined
        };

        values.push(point(candle, value));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period as i64),
        values,
    }
}
