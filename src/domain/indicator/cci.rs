//! CCI (Commodity Channel Index) indicator.
//!
//! CCI = (TP - SMA(TP, n)) / (0.015 * mean absolute deviation of TP)
//! Zero deviation yields an undefined value.
//! Warmup: first (n-1) bars undefined.

use crate::domain::indicator::{point, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Candle;
use crate::domain::series::Value;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn calculate_cci(candles: &[Candle], period: usize) -> IndicatorSeries {
    let typical: Vec<f64> = candles.iter().map(Candle::typical_price).collect();
    let mut values = Vec::with_capacity(candles.len());

    for (i, candle) in candles.iter().enumerate() {
        if period == 0 || i + 1 < period {
            values.push(point(candle, Value::Undefined));
            continue;
        }

        let window = &typical[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let deviation = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
        let cci = (typical[i] - mean) / (LAMBERT_CONSTANT * deviation);
        values.push(point(candle, Value::from_f64(cci)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Cci(period as i64),
        values,
    }
}
